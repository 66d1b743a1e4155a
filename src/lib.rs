//! authfeat — Auth-log feature sequence generator.
//!
//! Turns a time-ordered authentication log into per-user numeric feature
//! sequences and batch-aligned train/test datasets for sequence models.
//!
//! Modular structure:
//! - [`ingest`] — Event parsing, CSV reading, order-preserving user grouping
//! - [`features`] — Per-user running statistics and feature matrix extraction
//! - [`split`] — Batch-aligned train/test split arithmetic (standard + meganet)
//! - [`pipeline`] — Orchestration of both dataset modes
//! - [`output`] — Dataset sink with console fallback
//! - [`logging`] — Structured logging and progress/ETA reporting

pub mod config;
pub mod ingest;
pub mod features;
pub mod split;
pub mod pipeline;
pub mod output;
pub mod logging;

pub use config::GeneratorConfig;
pub use ingest::{EventRecord, IngestError};
pub use features::{BaselineExtractor, FeatureExtract, RunningUserFeatures};
pub use pipeline::DatasetOutput;
pub use logging::StructuredLogger;
