//! authfeat entrypoint: read the configured auth log, generate per-user
//! feature datasets in the configured mode, and hand them to the sink.
//! Ctrl+C requests cooperative cancellation between user groups.

use authfeat::{
    config::GeneratorConfig,
    features::BaselineExtractor,
    logging::StructuredLogger,
    output::{DatasetSink, SinkOutcome},
    pipeline,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

static STOP: AtomicBool = AtomicBool::new(false);

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("AUTHFEAT_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = GeneratorConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        input = %config.input.display(),
        max_rows = ?config.max_rows,
        batch_size = config.split.batch_size,
        meganet = config.meganet,
        "gathering features"
    );

    let _ = ctrlc::set_handler(|| {
        STOP.store(true, Ordering::Relaxed);
    });

    let extractor = BaselineExtractor;
    let output = pipeline::run(&config, &extractor, &STOP)?;

    match DatasetSink::write(&output, &config.output)? {
        SinkOutcome::File(path) => info!(path = %path.display(), "datasets written"),
        SinkOutcome::Console => info!("datasets emitted to console"),
    }

    Ok(())
}
