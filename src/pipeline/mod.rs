//! Dataset generation orchestrator.
//!
//! Standard mode splits each qualifying user's feature matrix proportionally;
//! meganet mode decile-partitions the whole event table first and grows one
//! training corpus plus a per-user test list. Group rejection (too small,
//! excluded user, degenerate split) is an expected outcome, not an error;
//! per-group feature failures are logged and skip only that group.

use crate::config::GeneratorConfig;
use crate::features::{user_feature_matrix, FeatureExtract};
use crate::ingest::{self, group_by_user, is_excluded_user, EventRecord};
use crate::logging::ProgressTimer;
use crate::split::{lower_multiple, partition_deciles, split_matrix};
use ndarray::{s, Array2};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

/// Feature matrix in output form: one row of floats per event.
pub type MatrixRows = Vec<Vec<f64>>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] ingest::IngestError),
}

/// The two dataset shapes, tagged so consumers match exhaustively.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DatasetOutput {
    Standard { users: Vec<UserDatasets> },
    Meganet { training: Vec<MatrixRows>, test: Vec<UserMatrix> },
}

#[derive(Debug, Serialize)]
pub struct UserDatasets {
    pub user_name: String,
    pub datasets: SplitSets,
}

#[derive(Debug, Serialize)]
pub struct SplitSets {
    pub training: MatrixRows,
    pub test: MatrixRows,
}

#[derive(Debug, Serialize)]
pub struct UserMatrix {
    pub user_name: String,
    pub dataset: MatrixRows,
}

/// Read the configured input and generate the configured dataset shape.
pub fn run<E: FeatureExtract + ?Sized>(
    config: &GeneratorConfig,
    extractor: &E,
    cancel: &AtomicBool,
) -> Result<DatasetOutput, PipelineError> {
    let events = ingest::read_events(&config.input, config.max_rows)?;
    info!(rows = events.len(), "input materialized");
    Ok(generate(events, extractor, config, cancel))
}

/// Generate datasets from an already-materialized event table.
pub fn generate<E: FeatureExtract + ?Sized>(
    events: Vec<EventRecord>,
    extractor: &E,
    config: &GeneratorConfig,
    cancel: &AtomicBool,
) -> DatasetOutput {
    if config.meganet {
        generate_meganet(events, extractor, config, cancel)
    } else {
        DatasetOutput::Standard {
            users: generate_standard(events, extractor, config, cancel),
        }
    }
}

fn qualifies(user: &str, group_len: usize, min_group_size: usize) -> bool {
    group_len > min_group_size && !is_excluded_user(user)
}

fn to_rows(matrix: &Array2<f64>) -> MatrixRows {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

/// Drop the trailing partial batch: keep the largest batch-multiple of rows
/// (measured on len − 1) plus the one-row head offset.
fn truncate_to_batches(matrix: &Array2<f64>, batch_size: usize) -> Array2<f64> {
    let keep = lower_multiple(matrix.nrows().saturating_sub(1), batch_size) + 1;
    matrix.slice(s![..keep.min(matrix.nrows()), ..]).to_owned()
}

fn generate_standard<E: FeatureExtract + ?Sized>(
    events: Vec<EventRecord>,
    extractor: &E,
    config: &GeneratorConfig,
    cancel: &AtomicBool,
) -> Vec<UserDatasets> {
    let min_group_size = config.split.min_group_size();
    let report_every = config.report_every.max(1);

    info!("grouping users");
    let groups = group_by_user(events);
    info!(groups = groups.len(), "starting feature generation");

    let mut timer = ProgressTimer::new(groups.len());
    let mut users = Vec::new();
    let mut processed = 0usize;

    for (user_name, group) in &groups {
        if cancel.load(Ordering::Relaxed) {
            warn!(done = timer.done(), "cancelled; returning partial output");
            break;
        }
        if qualifies(user_name, group.len(), min_group_size) {
            match user_feature_matrix(group, extractor) {
                Ok(matrix) => {
                    if let Some((training, test)) = split_matrix(&matrix, &config.split) {
                        users.push(UserDatasets {
                            user_name: user_name.clone(),
                            datasets: SplitSets {
                                training: to_rows(&training),
                                test: to_rows(&test),
                            },
                        });
                    }
                    processed += 1;
                    if processed % report_every == 0 {
                        info!(
                            processed,
                            total = groups.len(),
                            eta = %timer.eta(),
                            "feature generation progress"
                        );
                    }
                }
                Err(e) => warn!(user = %user_name, error = %e, "skipping group"),
            }
        }
        timer.advance(1);
    }

    info!(users = users.len(), "done gathering datasets");
    users
}

fn generate_meganet<E: FeatureExtract + ?Sized>(
    events: Vec<EventRecord>,
    extractor: &E,
    config: &GeneratorConfig,
    cancel: &AtomicBool,
) -> DatasetOutput {
    let min_group_size = config.split.min_group_size();
    let report_every = config.report_every.max(1);
    let batch_size = config.split.batch_size;

    info!("partitioning dataset into deciles");
    let (training_rows, test_rows) = partition_deciles(&events, config.split.training_pct);
    drop(events);

    let grouped_training = group_by_user(training_rows);
    let grouped_test = group_by_user(test_rows);

    let mut training_features: Vec<MatrixRows> = Vec::new();
    let mut training_users: HashSet<String> = HashSet::new();
    let mut timer = ProgressTimer::new(grouped_training.len());
    let mut processed = 0usize;

    info!(groups = grouped_training.len(), "training partition");
    for (user_name, group) in &grouped_training {
        if cancel.load(Ordering::Relaxed) {
            warn!(done = timer.done(), "cancelled; returning partial output");
            break;
        }
        if qualifies(user_name, group.len(), min_group_size) {
            match user_feature_matrix(group, extractor) {
                Ok(matrix) => {
                    training_features.push(to_rows(&truncate_to_batches(&matrix, batch_size)));
                    training_users.insert(user_name.clone());
                    processed += 1;
                    if processed % report_every == 0 {
                        info!(
                            processed,
                            total = grouped_training.len(),
                            eta = %timer.eta(),
                            "training partition progress"
                        );
                    }
                }
                Err(e) => warn!(user = %user_name, error = %e, "skipping group"),
            }
        }
        timer.advance(1);
    }

    let mut test_features: Vec<UserMatrix> = Vec::new();
    let mut timer = ProgressTimer::new(grouped_test.len());
    processed = 0;

    info!(groups = grouped_test.len(), "test partition");
    for (user_name, group) in &grouped_test {
        if cancel.load(Ordering::Relaxed) {
            warn!(done = timer.done(), "cancelled; returning partial output");
            break;
        }
        // Test output only for users that made it into the training output
        if qualifies(user_name, group.len(), min_group_size)
            && training_users.contains(user_name)
        {
            match user_feature_matrix(group, extractor) {
                Ok(matrix) => {
                    test_features.push(UserMatrix {
                        user_name: user_name.clone(),
                        dataset: to_rows(&truncate_to_batches(&matrix, batch_size)),
                    });
                    processed += 1;
                    if processed % report_every == 0 {
                        info!(
                            processed,
                            total = grouped_test.len(),
                            eta = %timer.eta(),
                            "test partition progress"
                        );
                    }
                }
                Err(e) => warn!(user = %user_name, error = %e, "skipping group"),
            }
        }
        timer.advance(1);
    }

    info!(
        training = training_features.len(),
        test = test_features.len(),
        "done generating meganet datasets"
    );
    DatasetOutput::Meganet {
        training: training_features,
        test: test_features,
    }
}
