//! Domain types for yieldcast-io.

use std::fmt;

use crate::describe::ClassCounts;

/// Header and string cells exactly as read from the CSV file.
///
/// Produced by [`EnrollmentReader`](crate::EnrollmentReader). Every row has
/// `header.len()` cells.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Column names from the header row.
    pub header: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Return the position of a column by exact name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// The binary enrollment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Prospect did not enroll (0).
    NotEnrolled,
    /// Prospect enrolled (1); the positive class.
    Enrolled,
}

impl Label {
    /// Parse a label cell. Accepts `0/1`, `false/true`, `no/yes`, and `n/y`,
    /// trimmed and case-insensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "no" | "n" => Some(Self::NotEnrolled),
            "1" | "true" | "yes" | "y" => Some(Self::Enrolled),
            _ => None,
        }
    }

    /// Return the numeric class index (0 or 1).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::NotEnrolled => 0,
            Self::Enrolled => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// How a predictor column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every cell parses as a finite number.
    Numeric,
    /// Free-form levels, dummy-coded for modeling.
    Categorical,
}

/// One predictor cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A finite number from a numeric column.
    Number(f64),
    /// A level from a categorical column.
    Level(String),
}

/// Cleaned predictors and labels.
///
/// `rows[i][j]` is the value of `columns[j]` for record `i`, and
/// `labels[i]` is its outcome. Every `rows[i][j]` matches `kinds[j]`.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<Value>>,
    labels: Vec<Label>,
}

impl Dataset {
    pub(crate) fn new(
        columns: Vec<String>,
        kinds: Vec<ColumnKind>,
        rows: Vec<Vec<Value>>,
        labels: Vec<Label>,
    ) -> Self {
        debug_assert_eq!(columns.len(), kinds.len());
        debug_assert_eq!(rows.len(), labels.len());
        Self {
            columns,
            kinds,
            rows,
            labels,
        }
    }

    /// Return the predictor column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the kind of each predictor column.
    #[must_use]
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Return the predictor rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Return the outcome of each row.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Return the outcomes as class indices.
    #[must_use]
    pub fn label_indices(&self) -> Vec<usize> {
        self.labels.iter().map(|l| l.index()).collect()
    }

    /// Return the number of records.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the per-class record counts.
    #[must_use]
    pub fn class_counts(&self) -> ClassCounts {
        ClassCounts::from_labels(&self.labels)
    }

    /// Copy the given rows, in the given order, into a new dataset.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            kinds: self.kinds.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}
