use crate::error::{QueryError, Result};
use crate::models::{AverageResult, ColumnMean, DistrictDataset};

/// Unweighted column means over a selection of dataset rows.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Mean of each requested column over exactly `rows`, in request order.
    ///
    /// Rows are used as given, repeats included. Missing readings are
    /// skipped; a column with no readings among the rows averages to `NaN`.
    /// A column requested twice is reported once.
    pub fn average<S: AsRef<str>>(
        &self,
        dataset: &DistrictDataset,
        rows: &[usize],
        columns: &[S],
    ) -> Result<AverageResult> {
        let mut selected_columns: Vec<(&str, usize)> = Vec::with_capacity(columns.len());
        for column in columns {
            let name = column.as_ref();
            let index = dataset.column_index(name)?;
            if !selected_columns.iter().any(|(seen, _)| *seen == name) {
                selected_columns.push((name, index));
            }
        }

        if rows.is_empty() {
            return Err(QueryError::InvalidNeighborCount {
                requested: 0,
                available: dataset.len(),
            });
        }

        let records = rows
            .iter()
            .map(|&row| dataset.record(row))
            .collect::<Result<Vec<_>>>()?;

        let averages = selected_columns
            .into_iter()
            .map(|(name, index)| {
                let (sum, samples) = records
                    .iter()
                    .filter_map(|r| r.reading(index))
                    .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

                ColumnMean {
                    column: name.to_string(),
                    mean: if samples > 0 {
                        sum / samples as f64
                    } else {
                        f64::NAN
                    },
                    samples,
                }
            })
            .collect();

        Ok(AverageResult {
            averages,
            districts: records.iter().map(|r| r.district.clone()).collect(),
        })
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
