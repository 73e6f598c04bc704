//! CSV series reader with input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use resemble_lcss::TimeSeries;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Dataset, SeriesId};

/// Reads series from a CSV file.
///
/// Expected format:
/// - Header row required: `id,t0,t1,...,tn`
/// - One row per series; the first column is the id, the rest are values
/// - Rows may end early or carry trailing empty cells, so series of
///   different lengths can share a file
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::MissingId`] | Id column is blank |
/// | [`IoError::EmptyRow`] | Row has an id but no values |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, unparseable, or a gap before the last value |
/// | [`IoError::DuplicateId`] | Same id appears twice |
pub struct SeriesReader {
    path: PathBuf,
}

impl SeriesReader {
    /// Create a reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // Rows are allowed to differ in length.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let n_columns = rdr.headers().map_err(|e| self.csv_error(e))?.len();
        debug!(n_columns, "read CSV header");

        let mut ids = Vec::new();
        let mut series = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let id = record.get(0).unwrap_or("").to_string();
            if id.is_empty() {
                return Err(IoError::MissingId {
                    path: self.path.clone(),
                    row_index,
                });
            }
            if let Some(&first_row) = seen.get(&id) {
                return Err(IoError::DuplicateId {
                    path: self.path.clone(),
                    series_id: id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(id.clone(), row_index);

            let cells: Vec<&str> = record.iter().skip(1).collect();
            let n_values = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |p| p + 1);
            if n_values == 0 {
                return Err(IoError::EmptyRow {
                    path: self.path.clone(),
                    row_index,
                    series_id: id,
                });
            }

            let mut values = Vec::with_capacity(n_values);
            for (col_index, raw) in cells[..n_values].iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: (*raw).to_string(),
                    })?;
                values.push(value);
            }

            // Values are non-empty and finite at this point.
            let ts = TimeSeries::new(values).map_err(|_| IoError::EmptyRow {
                path: self.path.clone(),
                row_index,
                series_id: id.clone(),
            })?;

            ids.push(SeriesId::new(id));
            series.push(ts);
        }

        if ids.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_series = ids.len(),
            min_len = series.iter().map(TimeSeries::len).min().unwrap_or(0),
            max_len = series.iter().map(TimeSeries::len).max().unwrap_or(0),
            "dataset loaded"
        );

        Ok(Dataset { ids, series })
    }
}
