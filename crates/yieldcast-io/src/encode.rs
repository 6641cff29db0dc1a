//! Treatment (dummy) coding of predictor columns.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::IoError;
use crate::domain::{ColumnKind, Dataset, Value};

#[derive(Debug, Clone)]
enum EncodedColumn {
    Numeric { name: String },
    /// `levels[0]` is the reference level and gets no indicator column.
    Categorical { name: String, levels: Vec<String> },
}

impl EncodedColumn {
    fn name(&self) -> &str {
        match self {
            Self::Numeric { name } | Self::Categorical { name, .. } => name,
        }
    }
}

/// Numeric design matrix with labels and column names.
#[derive(Debug, Clone)]
pub struct EncodedData {
    /// Row-major feature matrix.
    pub features: Vec<Vec<f64>>,
    /// Class indices (1 = enrolled).
    pub labels: Vec<usize>,
    /// One name per feature column.
    pub feature_names: Vec<String>,
}

/// Maps predictor rows to numeric feature vectors.
///
/// Numeric columns pass through. Each categorical column's levels are sorted;
/// the first becomes the reference level and every other level becomes a 0/1
/// indicator named `{column}{level}`. Levels are learned from the rows passed
/// to [`Encoder::fit`] only.
#[derive(Debug, Clone)]
pub struct Encoder {
    columns: Vec<EncodedColumn>,
}

impl Encoder {
    /// Learn categorical levels from `dataset`.
    #[instrument(skip_all, fields(n_samples = dataset.n_samples()))]
    pub fn fit(dataset: &Dataset) -> Self {
        let columns = dataset
            .columns()
            .iter()
            .zip(dataset.kinds())
            .enumerate()
            .map(|(j, (name, kind))| match kind {
                ColumnKind::Numeric => EncodedColumn::Numeric { name: name.clone() },
                ColumnKind::Categorical => {
                    let levels: BTreeSet<&str> = dataset
                        .rows()
                        .iter()
                        .filter_map(|row| match &row[j] {
                            Value::Level(level) => Some(level.as_str()),
                            Value::Number(_) => None,
                        })
                        .collect();
                    debug!(column = %name, n_levels = levels.len(), "levels learned");
                    EncodedColumn::Categorical {
                        name: name.clone(),
                        levels: levels.into_iter().map(String::from).collect(),
                    }
                }
            })
            .collect();
        Self { columns }
    }

    /// Return the encoded feature names in column order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for col in &self.columns {
            match col {
                EncodedColumn::Numeric { name } => names.push(name.clone()),
                EncodedColumn::Categorical { name, levels } => {
                    names.extend(levels.iter().skip(1).map(|level| format!("{name}{level}")));
                }
            }
        }
        names
    }

    /// Return the number of encoded feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.columns
            .iter()
            .map(|col| match col {
                EncodedColumn::Numeric { .. } => 1,
                EncodedColumn::Categorical { levels, .. } => levels.len().saturating_sub(1),
            })
            .sum()
    }

    /// Return the reference level of a categorical column.
    #[must_use]
    pub fn reference_level(&self, column: &str) -> Option<&str> {
        self.columns.iter().find_map(|col| match col {
            EncodedColumn::Categorical { name, levels } if name == column => {
                levels.first().map(String::as_str)
            }
            _ => None,
        })
    }

    /// Encode every row of `dataset`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ColumnMismatch`] | Dataset has a different column count |
    /// | [`IoError::KindMismatch`] | A column's kind differs from the fitted one |
    /// | [`IoError::UnseenLevel`] | A categorical level was absent when fitting |
    #[instrument(skip_all, fields(n_samples = dataset.n_samples()))]
    pub fn transform(&self, dataset: &Dataset) -> Result<EncodedData, IoError> {
        if dataset.columns().len() != self.columns.len() {
            return Err(IoError::ColumnMismatch {
                expected: self.columns.len(),
                got: dataset.columns().len(),
            });
        }
        let width = self.n_features();
        let features = dataset
            .rows()
            .iter()
            .map(|row| self.encode_row(row, width))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodedData {
            features,
            labels: dataset.label_indices(),
            feature_names: self.feature_names(),
        })
    }

    fn encode_row(&self, row: &[Value], width: usize) -> Result<Vec<f64>, IoError> {
        let mut out = Vec::with_capacity(width);
        for (col, value) in self.columns.iter().zip(row) {
            match (col, value) {
                (EncodedColumn::Numeric { .. }, Value::Number(x)) => out.push(*x),
                (EncodedColumn::Categorical { name, levels }, Value::Level(level)) => {
                    let pos = levels
                        .binary_search(level)
                        .map_err(|_| IoError::UnseenLevel {
                            column: name.clone(),
                            level: level.clone(),
                        })?;
                    out.extend((1..levels.len()).map(|k| if k == pos { 1.0 } else { 0.0 }));
                }
                (col, _) => {
                    return Err(IoError::KindMismatch {
                        column: col.name().to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}
