//! Group → normalized feature matrix.

use super::extract::FeatureExtract;
use super::running::RunningUserFeatures;
use super::FeatureError;
use crate::ingest::EventRecord;
use ndarray::{Array2, Axis};

/// Build the normalized feature matrix for one user's event group.
///
/// Extraction for event *i* sees the aggregator state reflecting events
/// `0..i-1`; the event is folded in only afterwards. This ordering is
/// load-bearing for reproducibility.
pub fn user_feature_matrix<E: FeatureExtract + ?Sized>(
    events: &[EventRecord],
    extractor: &E,
) -> Result<Array2<f64>, FeatureError> {
    let dim = extractor.dim();
    let mut flat = Vec::with_capacity(events.len() * dim);
    let mut history = RunningUserFeatures::new();

    for event in events {
        let row = extractor.extract(event, &history);
        if row.len() != dim {
            return Err(FeatureError::WrongWidth {
                expected: dim,
                got: row.len(),
            });
        }
        flat.extend(row);
        history.update(event);
    }

    let mut matrix = Array2::from_shape_vec((events.len(), dim), flat)?;
    normalize_columns(&mut matrix);
    Ok(matrix)
}

/// Column-wise max-normalization: each entry is divided by its column's
/// maximum, computed before any division. A column whose maximum is exactly
/// 0.0 passes through unchanged (zero-variance policy; see DESIGN.md).
pub fn normalize_columns(matrix: &mut Array2<f64>) {
    for mut column in matrix.axis_iter_mut(Axis(1)) {
        let col_max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if col_max == 0.0 {
            continue;
        }
        column.mapv_inplace(|v| v / col_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn normalized_columns_peak_at_one_and_keep_order() {
        let mut m = array![[2.0, 10.0], [4.0, 5.0], [1.0, 20.0]];
        normalize_columns(&mut m);
        assert_eq!(m.column(0).to_vec(), vec![0.5, 1.0, 0.25]);
        assert_eq!(m.column(1).to_vec(), vec![0.5, 0.25, 1.0]);
        for col in m.columns() {
            let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(max, 1.0);
        }
    }

    #[test]
    fn zero_max_column_passes_through() {
        let mut m = array![[0.0, 2.0], [0.0, 4.0]];
        normalize_columns(&mut m);
        assert_eq!(m.column(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(m.column(1).to_vec(), vec![0.5, 1.0]);
    }

    #[test]
    fn extraction_sees_pre_update_state() {
        use crate::ingest::EventRecord;

        struct AttemptCounter;
        impl FeatureExtract for AttemptCounter {
            fn dim(&self) -> usize {
                1
            }
            fn extract(&self, _ev: &EventRecord, h: &RunningUserFeatures) -> Vec<f64> {
                vec![h.login_attempts() as f64]
            }
        }

        let events: Vec<EventRecord> = (0..3)
            .map(|i| EventRecord {
                time: i as f64,
                user: "u".into(),
                domain: "D".into(),
                dest_user: "v".into(),
                src_computer: "C1".into(),
                dest_computer: "C2".into(),
                auth_type: "K".into(),
                logon_type: "N".into(),
                auth_orientation: "LogOn".into(),
                status: "Success".into(),
            })
            .collect();

        let m = user_feature_matrix(&events, &AttemptCounter).unwrap();
        // Pre-normalization attempts column is [0, 1, 2]; max 2 scales it.
        assert_eq!(m.column(0).to_vec(), vec![0.0, 0.5, 1.0]);
    }
}
