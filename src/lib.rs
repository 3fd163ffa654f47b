//! # foa-eval
//!
//! Objective evaluation metrics comparing generated audio recordings against
//! matched ground-truth references, for benchmarking generative audio models.
//!
//! ## Features
//!
//! - **Spatial Metrics**: azimuth, elevation and great-circle localization
//!   error for First-Order-Ambisonics (W, X, Y, Z) material
//! - **Pair Matching**: basename matching across `.flac`/`.wav` with optional
//!   split allow-lists
//! - **Collaborator Contracts**: pluggable FDopenl3 and KLpasst backends
//! - **Report Generation**: fixed-order textual report plus JSON records
//!
//! ## Example
//!
//! ```rust,ignore
//! use foa_eval::{calculate_spatial_metrics, SpatialOptions};
//!
//! let scores = calculate_spatial_metrics(
//!     "reference/".as_ref(),
//!     "generated/".as_ref(),
//!     None,
//!     &SpatialOptions::default(),
//! )?;
//! println!("spatial angle error: {} rad", scores.spatial_angle);
//! ```

pub mod collab;
pub mod eval;
pub mod ids;
pub mod loader;
pub mod matcher;
pub mod report;
pub mod spatial;

pub use eval::{EvalConfig, Evaluator};
pub use ids::IdSelector;
pub use loader::AudioData;
pub use matcher::{match_pairs, MatchedPair, SUPPORTED_EXTENSIONS};
pub use report::{EvalReport, ReportFormat};
pub use spatial::{calculate_spatial_metrics, ErrorKind, SpatialOptions, SpatialScores};

use thiserror::Error;

/// Errors that can occur during an evaluation run
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("failed to load audio file: {0}")]
    Load(String),

    #[error("{path}: insufficient channels, at least 4 (W, X, Y, Z) required, got {got}")]
    InsufficientChannels { path: String, got: usize },

    #[error("error type must be one of ['MAE', 'MSE'], got '{0}'")]
    InvalidErrorType(String),

    #[error("either a csv id file or a split list must be provided")]
    MissingSelector,

    #[error("csv id file and split list are mutually exclusive, provide exactly one")]
    ConflictingSelectors,

    #[error("invalid id file: {0}")]
    InvalidIdFile(String),

    #[error("no matched file pairs found between the reference and generated directories")]
    NoMatchedPairs,

    #[error("decoding '{path}' exceeded the per-file budget of {secs}s")]
    DecodeTimeout { path: String, secs: u64 },

    #[error("collaborator error: {0}")]
    Collaborator(anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
