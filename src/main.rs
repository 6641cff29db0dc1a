use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use yieldcast_io::{
    BranchSummary, ColumnKind, DEFAULT_DROP_COLUMNS, Dataset, EncodedData, Encoder,
    EnrollmentReader, PrepareConfig, ReportWriter, RunSummary, render_json,
};
use yieldcast_logit::{Evaluation, FitResult, LogisticConfig, evaluate, format_metric};
use yieldcast_sample::{
    ClassWeights, Origin, Resampled, Smote, Standardizer, StratifiedSplit, Undersampler, class_counts,
};

#[derive(Parser)]
#[command(name = "yieldcast")]
#[command(about = "Enrollment prediction under class imbalance: undersampling, SMOTE, and class weighting compared")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input file and column selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Path to the enrollment CSV file
    #[arg(long)]
    data: PathBuf,

    /// Outcome column
    #[arg(long, default_value = "enrollment")]
    label: String,

    /// Columns to drop before modeling (repeatable; replaces the default list)
    #[arg(long = "drop", num_args = 1..)]
    drop: Vec<String>,

    /// Keep every column except the label
    #[arg(long, conflicts_with = "drop")]
    no_drop: bool,
}

impl DataArgs {
    fn prepare_config(&self) -> PrepareConfig {
        let drop = if self.no_drop {
            Vec::new()
        } else if self.drop.is_empty() {
            DEFAULT_DROP_COLUMNS.iter().map(|c| (*c).to_string()).collect()
        } else {
            self.drop.clone()
        };
        PrepareConfig::new()
            .with_label_column(self.label.clone())
            .with_drop_columns(drop)
    }
}

/// Logistic regression settings.
#[derive(Args, Debug, Clone)]
struct FitArgs {
    /// Probability above which a prospect is predicted to enroll
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Maximum IRLS iterations
    #[arg(long, default_value_t = 25)]
    max_iter: usize,

    /// Relative deviance change at which IRLS stops
    #[arg(long, default_value_t = 1e-8)]
    tol: f64,

    /// Ridge penalty on the coefficients (intercept excluded)
    #[arg(long, default_value_t = 1e-8)]
    l2: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Print the class distribution and the predictor columns
    Describe {
        #[command(flatten)]
        data: DataArgs,

        /// Print a JSON summary on stdout instead of the chart
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Split, rebalance, fit, and score each balancing strategy
    Compare {
        #[command(flatten)]
        data: DataArgs,

        /// Fraction of each class assigned to training
        #[arg(long, default_value_t = 0.7)]
        train_fraction: f64,

        /// Strategy to run: "all", "undersample", "smote", or "weighted"
        #[arg(long, default_value = "all")]
        branch: String,

        /// SMOTE nearest-neighbor count
        #[arg(long, default_value_t = 5)]
        neighbors: usize,

        /// SMOTE target minority size as a multiple of the majority count
        #[arg(long, default_value_t = 1.0)]
        over_ratio: f64,

        #[command(flatten)]
        fit: FitArgs,

        /// Also write the comparison to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print a JSON summary on stdout instead of tables
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Undersample,
    Smote,
    Weighted,
}

impl Branch {
    fn name(self) -> &'static str {
        match self {
            Self::Undersample => "undersample",
            Self::Smote => "smote",
            Self::Weighted => "weighted",
        }
    }
}

fn parse_branches(s: &str) -> Result<Vec<Branch>> {
    match s {
        "all" => Ok(vec![Branch::Undersample, Branch::Smote, Branch::Weighted]),
        "undersample" => Ok(vec![Branch::Undersample]),
        "smote" => Ok(vec![Branch::Smote]),
        "weighted" => Ok(vec![Branch::Weighted]),
        other => anyhow::bail!("unknown branch: {other} (expected all, undersample, smote, or weighted)"),
    }
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DescribeOutput<'a> {
    n_rows: usize,
    n_removed: usize,
    not_enrolled: usize,
    enrolled: usize,
    columns: Vec<ColumnOutput<'a>>,
}

#[derive(Serialize)]
struct ColumnOutput<'a> {
    name: &'a str,
    kind: &'static str,
}

/// Everything one branch produced, kept until reporting.
struct BranchRun {
    branch: Branch,
    train_counts: [usize; 2],
    n_synthetic: usize,
    fit: FitResult,
    evaluation: Evaluation,
}

impl BranchRun {
    fn summary(&self) -> BranchSummary {
        let model = self.fit.model();
        BranchSummary {
            branch: self.branch.name().to_string(),
            train_counts: self.train_counts,
            n_synthetic: self.n_synthetic,
            iterations: self.fit.diagnostics().iterations,
            converged: self.fit.diagnostics().converged,
            intercept: model.intercept(),
            coefficients: model
                .feature_names()
                .iter()
                .cloned()
                .zip(model.coefficients().iter().copied())
                .collect(),
            confusion: self.evaluation.confusion.as_rows(),
            metrics: self.evaluation.metrics.named_values(),
        }
    }
}

fn load(args: &DataArgs) -> Result<(Dataset, usize)> {
    let table = EnrollmentReader::new(&args.data)
        .read()
        .context("failed to read input CSV")?;
    let dataset = args
        .prepare_config()
        .prepare(&table)
        .context("failed to prepare dataset")?;
    let n_removed = table.n_rows() - dataset.n_samples();
    Ok((dataset, n_removed))
}

fn counts_of(labels: &[usize]) -> [usize; 2] {
    let counts = class_counts(labels);
    [
        counts.first().copied().unwrap_or(0),
        counts.get(1).copied().unwrap_or(0),
    ]
}

/// Test rows every branch is scored on.
struct Holdout<'a> {
    features: &'a [Vec<f64>],
    labels: &'a [usize],
    threshold: f64,
}

fn fit_and_score(
    branch: Branch,
    config: &LogisticConfig,
    training: &Resampled,
    weights: Option<&[f64]>,
    feature_names: &[String],
    holdout: &Holdout<'_>,
) -> Result<BranchRun> {
    let fit = match weights {
        Some(w) => config.fit_weighted(&training.features, &training.labels, w, feature_names),
        None => config.fit(&training.features, &training.labels, feature_names),
    }
    .with_context(|| format!("{} branch: model fit failed", branch.name()))?;
    if !fit.diagnostics().converged {
        warn!(branch = branch.name(), "IRLS did not converge; results may be unstable");
    }
    let evaluation = evaluate(fit.model(), holdout.features, holdout.labels, holdout.threshold)
        .with_context(|| format!("{} branch: evaluation failed", branch.name()))?;
    Ok(BranchRun {
        branch,
        train_counts: counts_of(&training.labels),
        n_synthetic: training.n_synthetic(),
        fit,
        evaluation,
    })
}

#[instrument(skip_all, fields(branch = branch.name()))]
fn run_branch(
    branch: Branch,
    seed: u64,
    train: &EncodedData,
    test: &EncodedData,
    config: &LogisticConfig,
    smote: &Smote,
    threshold: f64,
) -> Result<BranchRun> {
    let holdout = Holdout {
        features: &test.features,
        labels: &test.labels,
        threshold,
    };
    match branch {
        Branch::Undersample => {
            let sampler = Undersampler::new().with_seed(seed.wrapping_add(1));
            debug!(seed = sampler.seed(), "undersampling majority class");
            let balanced = sampler
                .resample(&train.features, &train.labels)
                .context("undersampling failed")?;
            fit_and_score(branch, config, &balanced, None, &train.feature_names, &holdout)
        }
        Branch::Smote => {
            let scaler = Standardizer::fit(&train.features).context("standardization failed")?;
            let z_train = scaler.transform(&train.features)?;
            let z_test = scaler.transform(&test.features)?;
            let smote = smote.clone().with_seed(seed.wrapping_add(2));
            debug!(
                k = smote.k_neighbors(),
                over_ratio = smote.over_ratio(),
                seed = smote.seed(),
                "oversampling minority class"
            );
            let augmented = smote
                .resample(&z_train, &train.labels)
                .context("SMOTE failed")?;
            let scaled_holdout = Holdout {
                features: &z_test,
                ..holdout
            };
            fit_and_score(branch, config, &augmented, None, &train.feature_names, &scaled_holdout)
        }
        Branch::Weighted => {
            let weights = ClassWeights::inverse_frequency(&train.labels)
                .context("class weighting failed")?;
            let mass = weights.class_mass(&train.labels);
            info!(?mass, "class weight totals");
            let full = Resampled {
                features: train.features.clone(),
                labels: train.labels.clone(),
                origins: (0..train.labels.len()).map(Origin::Original).collect(),
            };
            fit_and_score(
                branch,
                config,
                &full,
                Some(&weights.sample_weights(&train.labels)),
                &train.feature_names,
                &holdout,
            )
        }
    }
}

fn print_branch(run: &BranchRun) {
    let diag = run.fit.diagnostics();
    println!("=== {} ===", run.branch.name());
    println!(
        "training rows: 0 = {}, 1 = {} ({} synthetic)",
        run.train_counts[0], run.train_counts[1], run.n_synthetic
    );
    println!(
        "IRLS: {} iterations, {}, deviance {:.4}, AIC {}",
        diag.iterations,
        if diag.converged { "converged" } else { "NOT converged" },
        diag.deviance,
        aic_label(&run.fit)
    );
    println!();
    println!("Confusion Matrix and Statistics");
    println!();
    print!("{}", run.evaluation.confusion);
    println!();
    print!("{}", run.evaluation.metrics);
    println!();
}

/// Weighted fits have no comparable AIC.
fn aic_label(fit: &FitResult) -> String {
    fit.aic()
        .map_or_else(|| "NA (weighted fit)".to_string(), |aic| format!("{aic:.4}"))
}

fn print_comparison(runs: &[BranchRun]) {
    if runs.is_empty() {
        return;
    }
    print!("{:<22}", "metric");
    for run in runs {
        print!("{:>13}", run.branch.name());
    }
    println!();
    let tables: Vec<Vec<(&str, f64)>> = runs
        .iter()
        .map(|r| r.evaluation.metrics.named_values())
        .collect();
    for (row, (name, _)) in tables[0].iter().enumerate() {
        print!("{name:<22}");
        for table in &tables {
            print!("{:>13}", table.get(row).map_or("NA".to_string(), |&(_, v)| format_metric(v)));
        }
        println!();
    }
}

fn kind_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "numeric",
        ColumnKind::Categorical => "categorical",
    }
}

fn describe(args: &DataArgs, json: bool) -> Result<()> {
    let (dataset, n_removed) = load(args)?;
    let counts = dataset.class_counts();

    if json {
        let output = DescribeOutput {
            n_rows: counts.total(),
            n_removed,
            not_enrolled: counts.not_enrolled,
            enrolled: counts.enrolled,
            columns: dataset
                .columns()
                .iter()
                .zip(dataset.kinds())
                .map(|(name, kind)| ColumnOutput {
                    name,
                    kind: kind_name(*kind),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Class distribution ({})", args.label);
    print!("{counts}");
    println!(
        "rows: {} ({} removed for missing values), imbalance ratio {:.2}:1",
        counts.total(),
        n_removed,
        counts.imbalance_ratio()
    );
    println!();
    println!("Predictors");
    for (name, kind) in dataset.columns().iter().zip(dataset.kinds()) {
        println!("  {name:<24} {}", kind_name(*kind));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn compare(
    seed: u64,
    data: &DataArgs,
    train_fraction: f64,
    branch: &str,
    neighbors: usize,
    over_ratio: f64,
    fit: &FitArgs,
    report: Option<&Path>,
    json: bool,
) -> Result<()> {
    let branches = parse_branches(branch)?;
    let config = LogisticConfig::new()
        .with_max_iter(fit.max_iter)?
        .with_tol(fit.tol)?
        .with_l2(fit.l2)?;
    let smote = Smote::new(neighbors)?.with_over_ratio(over_ratio)?;

    // 1. Load and clean
    let (dataset, n_removed) = load(data)?;
    let counts = dataset.class_counts();
    info!(
        n_rows = counts.total(),
        not_enrolled = counts.not_enrolled,
        enrolled = counts.enrolled,
        "dataset loaded"
    );

    // 2. Stratified split
    let splitter = StratifiedSplit::new(train_fraction)?.with_seed(seed);
    let split = splitter
        .split(&dataset.label_indices())
        .context("stratified split failed")?;
    info!(
        train_fraction = splitter.train_fraction(),
        n_train = split.train.len(),
        n_test = split.test.len(),
        "stratified split"
    );

    // 3. Encode with levels learned from Train only
    let train_ds = dataset.subset(&split.train);
    let test_ds = dataset.subset(&split.test);
    let encoder = Encoder::fit(&train_ds);
    for column in dataset.columns() {
        if let Some(reference) = encoder.reference_level(column) {
            debug!(column = %column, reference, "reference level");
        }
    }
    let train = encoder.transform(&train_ds).context("failed to encode training rows")?;
    let test = encoder.transform(&test_ds).context("failed to encode test rows")?;
    info!(
        n_train = train.labels.len(),
        n_test = test.labels.len(),
        n_features = train.feature_names.len(),
        "design matrices built"
    );

    if !json {
        println!("Class distribution ({})", data.label);
        print!("{counts}");
        println!();
    }

    // 4. One model per branch
    let mut runs = Vec::with_capacity(branches.len());
    for branch in branches {
        let run = run_branch(branch, seed, &train, &test, &config, &smote, fit.threshold)?;
        if !json {
            print_branch(&run);
        }
        runs.push(run);
    }
    if !json {
        print_comparison(&runs);
    }

    // 5. Optional machine-readable output
    let summaries: Vec<BranchSummary> = runs.iter().map(BranchRun::summary).collect();
    let run_summary = RunSummary {
        data_path: &data.data,
        seed,
        class_counts: counts,
        n_removed,
        n_train: split.train.len(),
        n_test: split.test.len(),
        feature_names: &train.feature_names,
    };
    if let Some(path) = report {
        ReportWriter::new(path)?
            .write(&run_summary, &summaries)
            .context("failed to write report")?;
    }
    if json {
        println!("{}", render_json(&run_summary, &summaries)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Describe { data, json } => describe(&data, json)?,

        Command::Compare {
            data,
            train_fraction,
            branch,
            neighbors,
            over_ratio,
            fit,
            report,
            json,
        } => compare(
            cli.seed,
            &data,
            train_fraction,
            &branch,
            neighbors,
            over_ratio,
            &fit,
            report.as_deref(),
            json,
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_names_parse() {
        assert_eq!(parse_branches("all").unwrap().len(), 3);
        assert_eq!(parse_branches("smote").unwrap(), vec![Branch::Smote]);
        assert!(parse_branches("oversample").is_err());
    }

    #[test]
    fn default_drop_list_applies_when_none_given() {
        let args = DataArgs {
            data: PathBuf::from("x.csv"),
            label: "enrollment".into(),
            drop: Vec::new(),
            no_drop: false,
        };
        assert_eq!(args.prepare_config().drop_columns().len(), DEFAULT_DROP_COLUMNS.len());
    }

    #[test]
    fn no_drop_keeps_every_column() {
        let cli = Cli::try_parse_from(["yieldcast", "describe", "--data", "d.csv", "--no-drop"])
            .unwrap();
        let Command::Describe { data, .. } = cli.command else {
            panic!("expected describe");
        };
        assert!(data.no_drop);
        assert!(data.prepare_config().drop_columns().is_empty());

        let clash = Cli::try_parse_from([
            "yieldcast", "describe", "--data", "d.csv", "--no-drop", "--drop", "year",
        ]);
        assert!(clash.is_err());
    }

    #[test]
    fn weighted_fit_has_no_aic() {
        let features = vec![vec![-1.0], vec![-0.5], vec![0.2], vec![0.4], vec![1.0], vec![-0.1]];
        let labels = vec![0, 0, 1, 0, 1, 1];
        let names = vec!["x".to_string()];
        let config = LogisticConfig::new();

        let plain = config.fit(&features, &labels, &names).unwrap();
        assert!(!aic_label(&plain).starts_with("NA"));

        let weights = ClassWeights::inverse_frequency(&labels).unwrap();
        let weighted = config
            .fit_weighted(&features, &labels, &weights.sample_weights(&labels), &names)
            .unwrap();
        assert_eq!(aic_label(&weighted), "NA (weighted fit)");
    }

    #[test]
    fn cli_parses_compare_flags() {
        let cli = Cli::try_parse_from([
            "yieldcast",
            "--seed",
            "7",
            "compare",
            "--data",
            "d.csv",
            "--branch",
            "weighted",
            "--drop",
            "prospect_id",
            "year",
            "--threshold",
            "0.4",
        ])
        .unwrap();
        assert_eq!(cli.seed, 7);
        let Command::Compare {
            data, branch, fit, ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(branch, "weighted");
        assert_eq!(data.drop, vec!["prospect_id", "year"]);
        assert!((fit.threshold - 0.4).abs() < 1e-12);
    }
}
