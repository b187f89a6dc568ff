// Per-column z-scores over a whole dataset.

use tracing::warn;

use crate::config::StatColumn;
use crate::dataset::{zscore_column, Dataset, DatasetError};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical column across all rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator): every player
/// returned by the service is part of the pool.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

impl PoolStats {
    pub fn is_degenerate(&self) -> bool {
        self.stdev < STDEV_EPSILON
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero, so a column
/// where every player has the same value contributes nothing.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.is_degenerate() {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Z-scores for every value of one column, sign-flipped when `invert` is set.
pub fn column_zscores(values: &[f64], invert: bool) -> Vec<f64> {
    let stats = compute_pool_stats(values);
    let sign = if invert { -1.0 } else { 1.0 };
    values
        .iter()
        .map(|v| compute_zscore(*v, &stats) * sign)
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset entry point
// ---------------------------------------------------------------------------

/// Append a `{COL}_ZSCORE` column for every selected column.
///
/// The input dataset is left as is; the returned dataset carries the original
/// columns followed by the derived ones, in selection order.
pub fn normalize(dataset: &Dataset, columns: &[StatColumn]) -> Result<Dataset, DatasetError> {
    let mut out = dataset.clone();
    for column in columns {
        let values = dataset.numeric_column(&column.name)?;
        let stats = compute_pool_stats(&values);
        if !values.is_empty() && stats.is_degenerate() {
            warn!(
                "column {} has zero standard deviation over {} rows; z-scores set to 0",
                column.name,
                values.len()
            );
        }
        let zscores = column_zscores(&values, column.invert);
        out = out.with_numeric_column(&zscore_column(&column.name), &zscores)?;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn dataset(pts: &[f64], tov: &[f64]) -> Dataset {
        let rows = pts
            .iter()
            .zip(tov)
            .enumerate()
            .map(|(i, (p, t))| vec![json!(i as i64 + 1), json!(p), json!(t)])
            .collect();
        Dataset::new(
            vec!["PLAYER_ID".into(), "PTS".into(), "TOV".into()],
            rows,
        )
        .unwrap()
    }

    // ---- compute_pool_stats tests ----

    #[test]
    fn pool_stats_known_values() {
        // Mean = 40/8 = 5.0, population variance = 32/8 = 4.0
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = compute_pool_stats(&values);
        assert!(approx_eq(stats.mean, 5.0, 1e-10));
        assert!(approx_eq(stats.stdev, 2.0, 1e-10));
    }

    #[test]
    fn pool_stats_single_value() {
        let stats = compute_pool_stats(&[42.0]);
        assert!(approx_eq(stats.mean, 42.0, 1e-10));
        assert!(approx_eq(stats.stdev, 0.0, 1e-10));
    }

    #[test]
    fn pool_stats_empty() {
        let stats = compute_pool_stats(&[]);
        assert_eq!(stats, PoolStats { mean: 0.0, stdev: 0.0 });
    }

    // ---- compute_zscore tests ----

    #[test]
    fn zscore_known_inputs() {
        let stats = PoolStats {
            mean: 5.0,
            stdev: 2.0,
        };
        assert!(approx_eq(compute_zscore(9.0, &stats), 2.0, 1e-10));
        assert!(approx_eq(compute_zscore(3.0, &stats), -1.0, 1e-10));
    }

    #[test]
    fn zscore_zero_stdev_returns_zero() {
        let stats = PoolStats {
            mean: 5.0,
            stdev: 0.0,
        };
        assert_eq!(compute_zscore(5.0, &stats), 0.0);
    }

    #[test]
    fn constant_column_yields_zeros_not_nan() {
        let z = column_zscores(&[3.0, 3.0, 3.0], false);
        assert_eq!(z, vec![0.0, 0.0, 0.0]);
        assert!(z.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn inverted_column_is_negated() {
        let raw = [1.0, 2.5, 4.0, 8.0];
        let plain = column_zscores(&raw, false);
        let inverted = column_zscores(&raw, true);
        for (p, i) in plain.iter().zip(&inverted) {
            assert_eq!(*i, -*p);
        }
    }

    #[test]
    fn inverting_matches_negated_input() {
        let raw = [1.0, 2.5, 4.0, 8.0];
        let negated: Vec<f64> = raw.iter().map(|v| -v).collect();
        let inverted = column_zscores(&raw, true);
        let from_negated = column_zscores(&negated, false);
        for (a, b) in inverted.iter().zip(&from_negated) {
            assert!(approx_eq(*a, *b, 1e-12));
        }
    }

    // ---- normalize tests ----

    #[test]
    fn normalize_appends_derived_columns() {
        let ds = dataset(&[10.0, 20.0], &[2.0, 4.0]);
        let cols = vec![StatColumn::new("PTS", false), StatColumn::new("TOV", true)];
        let out = normalize(&ds, &cols).unwrap();

        assert_eq!(ds.columns().len(), 3);
        assert_eq!(
            out.columns(),
            &["PLAYER_ID", "PTS", "TOV", "PTS_ZSCORE", "TOV_ZSCORE"]
        );
        assert_eq!(out.numeric_column("PTS_ZSCORE").unwrap(), vec![-1.0, 1.0]);
        assert_eq!(out.numeric_column("TOV_ZSCORE").unwrap(), vec![1.0, -1.0]);
    }

    #[test]
    fn normalize_zscores_have_zero_mean_unit_stdev() {
        let ds = dataset(&[3.0, 7.0, 11.0, 19.0, 25.0], &[1.0, 1.5, 2.0, 3.5, 4.0]);
        let out = normalize(&ds, &[StatColumn::new("PTS", false)]).unwrap();
        let z = out.numeric_column("PTS_ZSCORE").unwrap();
        let stats = compute_pool_stats(&z);
        assert!(approx_eq(stats.mean, 0.0, 1e-10));
        assert!(approx_eq(stats.stdev, 1.0, 1e-10));
    }

    #[test]
    fn normalize_constant_column() {
        let ds = dataset(&[10.0, 20.0], &[2.0, 2.0]);
        let out = normalize(&ds, &[StatColumn::new("TOV", true)]).unwrap();
        // -0.0 compares equal to 0.0
        assert_eq!(out.numeric_column("TOV_ZSCORE").unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn normalize_missing_column_fails() {
        let ds = dataset(&[10.0], &[1.0]);
        let err = normalize(&ds, &[StatColumn::new("REB", false)]).unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("REB".into()));
    }

    #[test]
    fn normalize_empty_dataset() {
        let ds = dataset(&[], &[]);
        let out = normalize(&ds, &[StatColumn::new("PTS", false)]).unwrap();
        assert!(out.is_empty());
        assert!(out.has_column("PTS_ZSCORE"));
    }
}
