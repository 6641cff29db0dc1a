//! File I/O, cleaning, encoding, and reporting for the yieldcast pipeline.

mod describe;
mod domain;
mod encode;
mod error;
mod prepare;
mod reader;
mod writer;

pub use describe::ClassCounts;
pub use domain::{ColumnKind, Dataset, Label, RawTable, Value};
pub use encode::{EncodedData, Encoder};
pub use error::IoError;
pub use prepare::{DEFAULT_DROP_COLUMNS, DEFAULT_LABEL_COLUMN, PrepareConfig};
pub use reader::EnrollmentReader;
pub use writer::{BranchSummary, ReportWriter, RunSummary, render_json};
