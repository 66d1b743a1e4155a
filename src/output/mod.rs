//! Dataset sink: JSON file first, console as last resort.
//!
//! Serialization is plumbing around the core; the pipeline hands over one
//! [`DatasetOutput`](crate::pipeline::DatasetOutput) value and this module
//! decides where it lands, reporting which sink accepted it.

use crate::pipeline::DatasetOutput;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("serializing datasets failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no sink accepted the output (last error: {0})")]
    Exhausted(std::io::Error),
}

/// Where the output actually landed.
#[derive(Debug, PartialEq, Eq)]
pub enum SinkOutcome {
    File(PathBuf),
    Console,
}

pub struct DatasetSink;

impl DatasetSink {
    /// Write datasets as JSON to `path`; on file failure, emit to stdout.
    /// Serialization failure is fatal (nothing sensible to fall back to).
    pub fn write(output: &DatasetOutput, path: &Path) -> Result<SinkOutcome, SinkError> {
        let json = serde_json::to_string(output)?;

        match std::fs::write(path, &json) {
            Ok(()) => Ok(SinkOutcome::File(path.to_path_buf())),
            Err(file_err) => {
                warn!(path = %path.display(), error = %file_err, "file sink failed; writing to console");
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                match handle
                    .write_all(json.as_bytes())
                    .and_then(|_| handle.write_all(b"\n"))
                {
                    Ok(()) => Ok(SinkOutcome::Console),
                    Err(console_err) => Err(SinkError::Exhausted(console_err)),
                }
            }
        }
    }
}
