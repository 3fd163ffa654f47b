//! Corpus-level error aggregation over matched file pairs

use super::direction::{circular_diff, spatial_angle, Direction};
use super::intensity::Intensity;
use super::SpatialScores;
use crate::loader::AudioData;
use crate::matcher::MatchedPair;
use crate::{EvalError, Result};
use log::debug;
use rayon::prelude::*;
use std::str::FromStr;
use std::time::Duration;

/// Error reduction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    /// Mean absolute error.
    #[default]
    Mae,

    /// Mean squared error.
    Mse,
}

impl FromStr for ErrorKind {
    type Err = EvalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MAE" => Ok(Self::Mae),
            "MSE" => Ok(Self::Mse),
            other => Err(EvalError::InvalidErrorType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Mae => "MAE",
            Self::Mse => "MSE",
        })
    }
}

/// Aggregation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialOptions {
    pub error_kind: ErrorKind,

    /// Optional per-file decode budget, so one corrupt or oversized file
    /// fails the run instead of stalling it indefinitely.
    pub decode_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct ErrorSample {
    theta: f64,
    phi: f64,
    spatial: f64,
}

/// Measure the three error components for one reference/generated pair.
fn pair_errors(pair: &MatchedPair, options: &SpatialOptions) -> Result<ErrorSample> {
    let reference = AudioData::load_with_timeout(&pair.reference, options.decode_timeout)?;
    let generated = AudioData::load_with_timeout(&pair.generated, options.decode_timeout)?;

    let gt = Direction::from_intensity(Intensity::from_audio(&reference)?);
    let gen = Direction::from_intensity(Intensity::from_audio(&generated)?);

    // All three measures are non-negative by construction, so the MAE branch
    // records them as-is.
    let theta = circular_diff(gt.theta, gen.theta);
    let phi = (gt.phi - gen.phi).abs();
    let spatial = spatial_angle(gt, gen);

    debug!(
        "pair '{}': theta_err={:.6} phi_err={:.6} spatial_err={:.6}",
        pair.base, theta, phi, spatial
    );

    Ok(match options.error_kind {
        ErrorKind::Mae => ErrorSample { theta, phi, spatial },
        ErrorKind::Mse => ErrorSample {
            theta: theta * theta,
            phi: phi * phi,
            spatial: spatial * spatial,
        },
    })
}

/// Reduce all matched pairs to corpus-level means.
///
/// Each pair is scored independently and the reduction is a commutative,
/// associative mean, so pairs run in parallel with no ordering requirement.
/// A single failing file aborts the whole run; there are no partial results.
pub fn aggregate(pairs: &[MatchedPair], options: &SpatialOptions) -> Result<SpatialScores> {
    if pairs.is_empty() {
        return Err(EvalError::NoMatchedPairs);
    }

    let samples: Vec<ErrorSample> = pairs
        .par_iter()
        .map(|pair| pair_errors(pair, options))
        .collect::<Result<_>>()?;

    let n = samples.len() as f64;
    Ok(SpatialScores {
        theta: samples.iter().map(|s| s.theta).sum::<f64>() / n,
        phi: samples.iter().map(|s| s.phi).sum::<f64>() / n,
        spatial_angle: samples.iter().map(|s| s.spatial).sum::<f64>() / n,
    })
}
