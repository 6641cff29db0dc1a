//! Column selection, label coercion, and missing-value cleaning.

use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::{ColumnKind, Dataset, Label, RawTable, Value};

/// Identifier and bookkeeping columns removed before modeling.
pub const DEFAULT_DROP_COLUMNS: [&str; 5] =
    ["prospect_id", "enrolling_stage", "year", "period", "location"];

/// Default outcome column.
pub const DEFAULT_LABEL_COLUMN: &str = "enrollment";

/// Cell spellings treated as missing (compared case-insensitively).
const MISSING_MARKERS: [&str; 5] = ["", "na", "n/a", "nan", "null"];

fn is_missing(cell: &str) -> bool {
    let lower = cell.trim().to_ascii_lowercase();
    MISSING_MARKERS.contains(&lower.as_str())
}

/// Settings that turn a [`RawTable`] into a modeling [`Dataset`].
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `label_column` | `enrollment` |
/// | `drop_columns` | `prospect_id`, `enrolling_stage`, `year`, `period`, `location` |
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    label_column: String,
    drop_columns: Vec<String>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            drop_columns: DEFAULT_DROP_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl PrepareConfig {
    /// Create a config with the default label column and drop list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outcome column.
    #[must_use]
    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    /// Replace the list of columns to drop.
    #[must_use]
    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    /// Return the outcome column.
    #[must_use]
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Return the columns to drop.
    #[must_use]
    pub fn drop_columns(&self) -> &[String] {
        &self.drop_columns
    }

    /// Build a [`Dataset`] from raw cells.
    ///
    /// Drops the configured columns, coerces the label, removes rows with a
    /// missing predictor value, and infers each predictor's [`ColumnKind`]
    /// (numeric when every cell parses as a finite number).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::MissingColumn`] | Label column not in header |
    /// | [`IoError::NoPredictorColumns`] | Nothing left after dropping |
    /// | [`IoError::RaggedRow`] | Row width differs from the header |
    /// | [`IoError::MissingLabel`] | Empty or NA label cell |
    /// | [`IoError::InvalidLabel`] | Label cell is not a recognized spelling |
    /// | [`IoError::AllRowsRemoved`] | Every row has a missing predictor |
    /// | [`IoError::SingleClass`] | Only one outcome remains |
    #[instrument(skip_all, fields(label = %self.label_column, n_rows = table.n_rows()))]
    pub fn prepare(&self, table: &RawTable) -> Result<Dataset, IoError> {
        let label_idx = table
            .column_index(&self.label_column)
            .ok_or_else(|| IoError::MissingColumn {
                column: self.label_column.clone(),
            })?;

        for col in &self.drop_columns {
            if table.column_index(col).is_none() {
                warn!(column = %col, "drop column not present in header");
            }
        }

        let predictor_idx: Vec<usize> = (0..table.header.len())
            .filter(|&j| j != label_idx && !self.drop_columns.contains(&table.header[j]))
            .collect();
        if predictor_idx.is_empty() {
            return Err(IoError::NoPredictorColumns);
        }
        let columns: Vec<String> = predictor_idx.iter().map(|&j| table.header[j].clone()).collect();
        debug!(?columns, "predictor columns selected");

        let mut labels = Vec::with_capacity(table.n_rows());
        let mut kept: Vec<&[String]> = Vec::with_capacity(table.n_rows());
        let mut removed = 0usize;
        let width = table.header.len();
        for (row_index, row) in table.rows.iter().enumerate() {
            if row.len() != width {
                return Err(IoError::RaggedRow {
                    row_index,
                    expected: width,
                    got: row.len(),
                });
            }
            let raw = &row[label_idx];
            if is_missing(raw) {
                return Err(IoError::MissingLabel { row_index });
            }
            let label = Label::parse(raw).ok_or_else(|| IoError::InvalidLabel {
                row_index,
                raw: raw.clone(),
            })?;
            if predictor_idx.iter().any(|&j| is_missing(&row[j])) {
                removed += 1;
                continue;
            }
            labels.push(label);
            kept.push(row);
        }
        if removed > 0 {
            warn!(removed, "rows with missing predictor values removed");
        }
        if kept.is_empty() {
            return Err(IoError::AllRowsRemoved { removed });
        }
        if let Some(&first) = labels.first() {
            if labels.iter().all(|&l| l == first) {
                return Err(IoError::SingleClass {
                    label: first.index(),
                });
            }
        }

        let kinds: Vec<ColumnKind> = predictor_idx
            .iter()
            .map(|&j| {
                let numeric = kept
                    .iter()
                    .all(|row| row[j].parse::<f64>().is_ok_and(f64::is_finite));
                if numeric {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                }
            })
            .collect();

        let rows: Vec<Vec<Value>> = kept
            .iter()
            .map(|row| {
                predictor_idx
                    .iter()
                    .zip(&kinds)
                    .map(|(&j, kind)| match kind {
                        // Kind inference guarantees the parse succeeds.
                        ColumnKind::Numeric => Value::Number(row[j].parse().unwrap_or(f64::NAN)),
                        ColumnKind::Categorical => Value::Level(row[j].clone()),
                    })
                    .collect()
            })
            .collect();

        let n_numeric = kinds.iter().filter(|k| **k == ColumnKind::Numeric).count();
        info!(
            n_samples = rows.len(),
            n_removed = removed,
            n_predictors = columns.len(),
            n_numeric,
            n_categorical = columns.len() - n_numeric,
            "dataset prepared"
        );
        Ok(Dataset::new(columns, kinds, rows, labels))
    }
}
