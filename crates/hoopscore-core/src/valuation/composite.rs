// Composite score: unweighted sum of a row's selected z-scores.

use crate::config::StatColumn;
use crate::dataset::{zscore_column, Dataset, DatasetError, COMPOSITE};

/// Sum the `{COL}_ZSCORE` values of each row.
///
/// The z-score columns must already exist (see `zscore::normalize`); a missing
/// one is reported as `DatasetError::MissingColumn`.
pub fn composite_scores(dataset: &Dataset, columns: &[StatColumn]) -> Result<Vec<f64>, DatasetError> {
    let mut totals = vec![0.0; dataset.len()];
    for column in columns {
        let zscores = dataset.numeric_column(&zscore_column(&column.name))?;
        for (total, z) in totals.iter_mut().zip(zscores) {
            *total += z;
        }
    }
    Ok(totals)
}

/// Return a new dataset with the composite appended as `ZSCORE`.
pub fn with_composite(dataset: &Dataset, columns: &[StatColumn]) -> Result<Dataset, DatasetError> {
    let totals = composite_scores(dataset, columns)?;
    dataset.with_numeric_column(COMPOSITE, &totals)
}
