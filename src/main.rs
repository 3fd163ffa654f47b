//! Command-line evaluation driver
//!
//! Usage:
//!   foa-eval --generated-path gen/ --reference-path ref/ --split-path split.txt
//!
//! Emits the KLpasst, FDopenl3 and spatial metrics to standard output in a
//! fixed textual order; `--json` additionally writes a structured record.

use anyhow::Result;
use clap::Parser;
use foa_eval::{ErrorKind, EvalConfig, Evaluator, ReportFormat};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "foa-eval",
    about = "Objective evaluation metrics for generative spatial audio"
)]
struct Cli {
    /// Directory with the generated audio to evaluate
    #[arg(long)]
    generated_path: PathBuf,

    /// Directory with the reference/ground-truth audio
    #[arg(long)]
    reference_path: PathBuf,

    /// CSV with id correspondences (column 'ytid')
    #[arg(long, conflicts_with = "split_path")]
    csv_file_path: Option<PathBuf>,

    /// Split file with one filename per line
    #[arg(long)]
    split_path: Option<PathBuf>,

    /// Precomputed reference probabilities for KLpasst
    #[arg(long)]
    kl_ref_prob: Option<PathBuf>,

    /// Precomputed reference embeddings for FDopenl3
    #[arg(long)]
    fd_ref_embeddings: Option<PathBuf>,

    /// Extension of the generated audio files
    #[arg(long, default_value = ".flac")]
    eval_files_extension: String,

    /// Extension of the reference audio files
    #[arg(long, default_value = ".flac")]
    ref_files_extension: String,

    /// Spatial error reduction: MAE or MSE
    #[arg(long, default_value = "MAE")]
    error_type: ErrorKind,

    /// Per-file decode budget in seconds
    #[arg(long)]
    decode_timeout_secs: Option<u64>,

    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = EvalConfig::new(cli.generated_path, cli.reference_path);
    config.csv_path = cli.csv_file_path;
    config.split_path = cli.split_path;
    config.kl_ref_probabilities = cli.kl_ref_prob;
    config.fd_ref_embeddings = cli.fd_ref_embeddings;
    config.eval_extension = cli.eval_files_extension;
    config.ref_extension = cli.ref_files_extension;
    config.error_kind = cli.error_type;
    config.decode_timeout = cli.decode_timeout_secs.map(Duration::from_secs);

    let report = Evaluator::new(config).run()?;

    print!("{}", report.generate(ReportFormat::Text));
    if let Some(path) = cli.json {
        report.save(&path, ReportFormat::Json)?;
    }

    Ok(())
}
