//! JSON report writer for branch comparisons.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::describe::ClassCounts;

/// Dataset-level facts shared by every branch of one run.
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    /// Input CSV path.
    pub data_path: &'a Path,
    /// Global seed.
    pub seed: u64,
    /// Outcome counts after cleaning.
    pub class_counts: ClassCounts,
    /// Rows removed for missing predictor values.
    pub n_removed: usize,
    /// Training rows.
    pub n_train: usize,
    /// Test rows.
    pub n_test: usize,
    /// Encoded feature names.
    pub feature_names: &'a [String],
}

/// Outcome of one branch, as primitives.
#[derive(Debug, Clone)]
pub struct BranchSummary {
    /// Branch name (`undersample`, `smote`, `weighted`).
    pub branch: String,
    /// `[not_enrolled, enrolled]` rows in the branch's training set.
    pub train_counts: [usize; 2],
    /// Synthetic rows added to the training set.
    pub n_synthetic: usize,
    /// IRLS iterations used.
    pub iterations: usize,
    /// Whether IRLS met its tolerance.
    pub converged: bool,
    /// Fitted intercept.
    pub intercept: f64,
    /// Fitted coefficients by feature name.
    pub coefficients: Vec<(String, f64)>,
    /// Confusion counts laid out `[[tn, fp], [fn, tp]]`.
    pub confusion: [[usize; 2]; 2],
    /// Named scalar metrics; `NaN` is written as `null`.
    pub metrics: Vec<(&'static str, f64)>,
}

/// Writes the comparison report to a JSON file.
///
/// Creates the parent directory on construction if it does not exist.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create a new writer targeting `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the parent directory cannot be created.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn new(path: &Path) -> Result<Self, IoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| IoError::OutputDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
            debug!("output directory ready");
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Return the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the run and its branches and write them to the target path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n_branches = branches.len()))]
    pub fn write(&self, run: &RunSummary<'_>, branches: &[BranchSummary]) -> Result<(), IoError> {
        let json = render_json(run, branches)?;
        fs::write(&self.path, &json).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        info!(path = %self.path.display(), "report written");
        Ok(())
    }
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::Serialize`] if encoding fails.
pub fn render_json(run: &RunSummary<'_>, branches: &[BranchSummary]) -> Result<String, IoError> {
    let artifact = ReportArtifact {
        data: run.data_path.display().to_string(),
        seed: run.seed,
        n_rows: run.class_counts.total(),
        n_removed: run.n_removed,
        class_counts: CountsEntry::from(run.class_counts.as_array()),
        n_train: run.n_train,
        n_test: run.n_test,
        features: run.feature_names,
        branches: branches.iter().map(BranchArtifact::from).collect(),
    };
    serde_json::to_string_pretty(&artifact).map_err(|source| IoError::Serialize { source })
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct ReportArtifact<'a> {
    data: String,
    seed: u64,
    n_rows: usize,
    n_removed: usize,
    class_counts: CountsEntry,
    n_train: usize,
    n_test: usize,
    features: &'a [String],
    branches: Vec<BranchArtifact<'a>>,
}

#[derive(Serialize)]
struct CountsEntry {
    not_enrolled: usize,
    enrolled: usize,
}

impl From<[usize; 2]> for CountsEntry {
    fn from([not_enrolled, enrolled]: [usize; 2]) -> Self {
        Self {
            not_enrolled,
            enrolled,
        }
    }
}

#[derive(Serialize)]
struct BranchArtifact<'a> {
    branch: &'a str,
    train_class_counts: CountsEntry,
    n_synthetic: usize,
    iterations: usize,
    converged: bool,
    intercept: f64,
    coefficients: Vec<CoefficientEntry<'a>>,
    confusion_matrix: ConfusionEntry,
    metrics: BTreeMap<&'static str, Option<f64>>,
}

#[derive(Serialize)]
struct CoefficientEntry<'a> {
    name: &'a str,
    estimate: f64,
}

#[derive(Serialize)]
struct ConfusionEntry {
    tn: usize,
    fp: usize,
    #[serde(rename = "fn")]
    fn_: usize,
    tp: usize,
}

impl<'a> From<&'a BranchSummary> for BranchArtifact<'a> {
    fn from(b: &'a BranchSummary) -> Self {
        let [[tn, fp], [fn_, tp]] = b.confusion;
        Self {
            branch: &b.branch,
            train_class_counts: CountsEntry::from(b.train_counts),
            n_synthetic: b.n_synthetic,
            iterations: b.iterations,
            converged: b.converged,
            intercept: b.intercept,
            coefficients: b
                .coefficients
                .iter()
                .map(|(name, estimate)| CoefficientEntry {
                    name,
                    estimate: *estimate,
                })
                .collect(),
            confusion_matrix: ConfusionEntry { tn, fp, fn_, tp },
            metrics: b.metrics.iter().map(|&(k, v)| (k, finite(v))).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn branch(name: &str) -> BranchSummary {
        BranchSummary {
            branch: name.to_string(),
            train_counts: [21, 21],
            n_synthetic: 0,
            iterations: 5,
            converged: true,
            intercept: -0.4,
            coefficients: vec![("gpa".into(), 1.2), ("programNursing".into(), 0.3)],
            confusion: [[50, 10], [3, 7]],
            metrics: vec![("accuracy", 0.81), ("precision", f64::NAN)],
        }
    }

    fn run<'a>(path: &'a Path, names: &'a [String]) -> RunSummary<'a> {
        RunSummary {
            data_path: path,
            seed: 42,
            class_counts: ClassCounts {
                not_enrolled: 70,
                enrolled: 30,
            },
            n_removed: 2,
            n_train: 70,
            n_test: 30,
            feature_names: names,
        }
    }

    #[test]
    fn report_json_structure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let names = vec!["gpa".to_string(), "programNursing".to_string()];
        let writer = ReportWriter::new(&path).unwrap();
        writer
            .write(&run(Path::new("data.csv"), &names), &[branch("undersample"), branch("smote")])
            .unwrap();

        let content: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content["seed"], 42);
        assert_eq!(content["n_rows"], 100);
        assert_eq!(content["class_counts"]["enrolled"], 30);
        assert_eq!(content["features"].as_array().unwrap().len(), 2);

        let branches = content["branches"].as_array().unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0]["branch"], "undersample");
        assert_eq!(branches[0]["confusion_matrix"]["fn"], 3);
        assert_eq!(branches[0]["confusion_matrix"]["tp"], 7);
        assert_eq!(branches[0]["coefficients"][0]["name"], "gpa");
        assert!(branches[0]["metrics"]["precision"].is_null());
        assert!((branches[0]["metrics"]["accuracy"].as_f64().unwrap() - 0.81).abs() < 1e-12);
    }

    #[test]
    fn creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("report.json");
        let names: Vec<String> = Vec::new();
        ReportWriter::new(&path)
            .unwrap()
            .write(&run(Path::new("x.csv"), &names), &[])
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn render_matches_written_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.json");
        let names = vec!["gpa".to_string()];
        let summary = run(Path::new("d.csv"), &names);
        let branches = [branch("weighted")];
        ReportWriter::new(&path).unwrap().write(&summary, &branches).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            render_json(&summary, &branches).unwrap()
        );
    }
}
