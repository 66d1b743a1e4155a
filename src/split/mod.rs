//! Batch-aligned train/test split arithmetic.
//!
//! Two modes: a per-user proportional split of one feature matrix, and the
//! whole-dataset "meganet" decile partition applied before user grouping.
//! Rejected splits are decisions, not errors: callers get `None` and skip the
//! group.

use crate::config::SplitConfig;
use crate::ingest::EventRecord;
use ndarray::{s, Array2};

/// Multiple of `base` nearest to `target`. The remainder rounds up only when
/// it exceeds `base / 2`; an exact half rounds down. Result is always within
/// `[target - base, target + base]`.
pub fn closest_multiple(target: usize, base: usize) -> usize {
    let lower = (target / base) * base;
    let remainder = target - lower;
    if remainder * 2 > base {
        lower + base
    } else {
        lower
    }
}

/// Largest multiple of `base` not exceeding `maximum`.
pub fn lower_multiple(maximum: usize, base: usize) -> usize {
    (maximum / base) * base
}

/// Split a normalized feature matrix into contiguous (training, test) row
/// ranges, both sized to a multiple of the batch size plus a one-row overlap
/// at each boundary. Returns `None` when the group cannot yield two
/// non-degenerate segments within bounds.
pub fn split_matrix(
    matrix: &Array2<f64>,
    config: &SplitConfig,
) -> Option<(Array2<f64>, Array2<f64>)> {
    let (training_len, test_len) =
        split_lengths(matrix.nrows(), config.training_pct, config.batch_size)?;
    let training = matrix.slice(s![..training_len, ..]).to_owned();
    let test = matrix
        .slice(s![training_len..training_len + test_len, ..])
        .to_owned();
    Some((training, test))
}

/// The alignment arithmetic behind [`split_matrix`], on lengths alone.
pub fn split_lengths(len: usize, training_pct: u32, batch_size: usize) -> Option<(usize, usize)> {
    let target = ((training_pct as f64 / 100.0) * len as f64).ceil() as usize;
    let mut training_len = closest_multiple(target, batch_size) + 1;

    let remaining = (len as i64 - 1) - training_len as i64;
    if remaining < 0 {
        return None;
    }
    let mut test_len = remaining as usize;
    test_len -= test_len % batch_size;

    if test_len == 0 {
        // Shift one batch from training to test
        if training_len < batch_size {
            return None;
        }
        training_len -= batch_size;
        test_len += batch_size;
    }
    test_len += 1;

    if training_len <= 1 || test_len <= 1 {
        return None;
    }
    // Segments must stay inside the matrix; an overrun rejects the split.
    if training_len + test_len > len {
        return None;
    }
    Some((training_len, test_len))
}

/// Partition the whole ordered event table into 10 contiguous equal-sized
/// buckets and assign the leading buckets to training: bucket `k` trains
/// while the running index `10 * (k + 1)` stays at or below the training
/// percentage. Each partition keeps original row order.
pub fn partition_deciles(
    events: &[EventRecord],
    training_pct: u32,
) -> (Vec<EventRecord>, Vec<EventRecord>) {
    let mut training = Vec::new();
    let mut test = Vec::new();
    if events.is_empty() {
        return (training, test);
    }

    let bucket_span = events.len() as f64 / 10.0;
    for (i, event) in events.iter().enumerate() {
        let bucket = (i as f64 / bucket_span) as usize;
        let index = 10 * (bucket as u32 + 1);
        if index <= training_pct {
            training.push(event.clone());
        } else {
            test.push(event.clone());
        }
    }
    (training, test)
}
