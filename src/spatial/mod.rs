//! Spatial localization metrics for First-Order-Ambisonics audio.
//!
//! The pipeline per matched pair: intensity extraction ([`Intensity`]),
//! angle derivation ([`Direction`]), circular-aware error measurement, then a
//! corpus-level mean reduction.

pub mod aggregate;
pub mod direction;
pub mod intensity;

pub use aggregate::{aggregate, ErrorKind, SpatialOptions};
pub use direction::{circular_diff, spatial_angle, Direction, INTENSITY_FLOOR};
pub use intensity::Intensity;

use crate::matcher;
use crate::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Corpus-level spatial error means, radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpatialScores {
    /// Mean azimuth error.
    pub theta: f64,

    /// Mean elevation error.
    pub phi: f64,

    /// Mean great-circle angular error.
    pub spatial_angle: f64,
}

/// Compute spatial metrics between reference and generated audio directories.
///
/// Composes pair matching and error aggregation; failures from either
/// sub-component surface unchanged. With `split` given, only base names listed
/// there are considered; otherwise both directory listings are intersected.
pub fn calculate_spatial_metrics(
    reference_dir: &Path,
    generated_dir: &Path,
    split: Option<&Path>,
    options: &SpatialOptions,
) -> Result<SpatialScores> {
    let pairs = matcher::match_pairs(reference_dir, generated_dir, split)?;
    info!(
        "scoring {} matched pairs from '{}' vs '{}'",
        pairs.len(),
        reference_dir.display(),
        generated_dir.display()
    );
    aggregate::aggregate(&pairs, options)
}
