//! Acoustic intensity extraction from FOA buffers

use crate::loader::AudioData;
use crate::{EvalError, Result};

/// Scalar sound-intensity components along the three Cartesian axes.
///
/// Each component is the mean frame-wise product of the omnidirectional W
/// channel with one of the directional X, Y, Z channels. A scalar proxy for
/// the acoustic intensity vector, not a full vector field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Intensity {
    /// Extract the intensity components from a decoded FOA buffer.
    ///
    /// Channels 0-3 are taken as W, X, Y, Z. Fails with
    /// [`EvalError::InsufficientChannels`] when fewer than four channels are
    /// present, which covers mono as well as 2-3 channel material.
    pub fn from_audio(audio: &AudioData) -> Result<Self> {
        if audio.num_channels() < 4 {
            return Err(EvalError::InsufficientChannels {
                path: audio.source_path.clone(),
                got: audio.num_channels(),
            });
        }

        let w = &audio.planes[0];
        Ok(Self {
            x: mean_product(w, &audio.planes[1]),
            y: mean_product(w, &audio.planes[2]),
            z: mean_product(w, &audio.planes[3]),
        })
    }
}

/// Mean of the element-wise product of two sample planes.
fn mean_product(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let sum: f64 = a.iter().zip(b).map(|(&x, &y)| x * y).sum();
    sum / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_audio(planes: Vec<Vec<f64>>) -> AudioData {
        AudioData {
            planes,
            sample_rate: 48_000,
            source_path: "test.wav".into(),
        }
    }

    #[test]
    fn test_known_intensity() {
        // W = 1 everywhere, so each component is just the mean of that plane.
        let audio = quad_audio(vec![
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            vec![-1.0, 1.0],
        ]);

        let intensity = Intensity::from_audio(&audio).unwrap();
        assert!((intensity.x - 0.5).abs() < 1e-12);
        assert!((intensity.y - 0.5).abs() < 1e-12);
        assert!(intensity.z.abs() < 1e-12);
    }

    #[test]
    fn test_mono_rejected() {
        let audio = quad_audio(vec![vec![1.0, 0.5]]);
        let err = Intensity::from_audio(&audio).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InsufficientChannels { got: 1, .. }
        ));
    }

    #[test]
    fn test_three_channels_rejected() {
        let audio = quad_audio(vec![vec![1.0], vec![0.0], vec![0.0]]);
        let err = Intensity::from_audio(&audio).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InsufficientChannels { got: 3, .. }
        ));
    }

    #[test]
    fn test_extra_channels_ignored() {
        let audio = quad_audio(vec![
            vec![1.0],
            vec![0.25],
            vec![0.0],
            vec![0.0],
            vec![99.0],
        ]);

        let intensity = Intensity::from_audio(&audio).unwrap();
        assert!((intensity.x - 0.25).abs() < 1e-12);
    }
}
