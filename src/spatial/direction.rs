//! Direction-of-arrival angles and angular distance primitives

use super::intensity::Intensity;
use std::f64::consts::TAU;

/// Floor applied under the horizontal intensity magnitude before the elevation
/// atan2, so a near-silent horizontal plane cannot produce a NaN.
pub const INTENSITY_FLOOR: f64 = 1e-6;

/// Estimated source direction: azimuth `theta` and elevation `phi`, radians.
///
/// `theta` follows the atan2 convention and lies in (-pi, pi]; `phi` is
/// bounded by the same convention and practically falls in [-pi/2, pi/2].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub theta: f64,
    pub phi: f64,
}

impl Direction {
    /// Derive azimuth and elevation from an intensity triple.
    pub fn from_intensity(i: Intensity) -> Self {
        let horizontal = (i.x * i.x + i.y * i.y).max(INTENSITY_FLOOR).sqrt();
        Self {
            theta: i.y.atan2(i.x),
            phi: i.z.atan2(horizontal),
        }
    }
}

/// Absolute difference between two circular angles, wraparound-aware.
///
/// The distance between 179 and -179 degrees is 2 degrees, not 358.
pub fn circular_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(TAU - diff)
}

/// Great-circle angular distance between two direction estimates.
///
/// Haversine form; the intermediate term is clamped to [0, 1] to guard
/// against floating-point overshoot before the final atan2.
pub fn spatial_angle(gt: Direction, gen: Direction) -> f64 {
    let delta_phi = gt.phi - gen.phi;
    let delta_theta = gt.theta - gen.theta;

    let a = (delta_phi / 2.0).sin().powi(2)
        + gt.phi.cos() * gen.phi.cos() * (delta_theta / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angles_from_axis_aligned_intensity() {
        let east = Direction::from_intensity(Intensity { x: 1.0, y: 0.0, z: 0.0 });
        assert_abs_diff_eq!(east.theta, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.phi, 0.0, epsilon = 1e-12);

        let north = Direction::from_intensity(Intensity { x: 0.0, y: 1.0, z: 0.0 });
        assert_abs_diff_eq!(north.theta, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_phi_at_horizontal_silence() {
        // With Ix = Iy = 0 the floor takes over: phi = atan2(Iz, sqrt(1e-6)).
        let d = Direction::from_intensity(Intensity { x: 0.0, y: 0.0, z: 0.5 });
        assert_abs_diff_eq!(d.phi, 0.5f64.atan2(1e-3), epsilon = 1e-12);

        let down = Direction::from_intensity(Intensity { x: 0.0, y: 0.0, z: -2.0 });
        assert_abs_diff_eq!(down.phi, (-2.0f64).atan2(1e-3), epsilon = 1e-12);
    }

    #[test]
    fn test_circular_diff_identity() {
        for theta in [-PI, -1.3, 0.0, 0.7, PI] {
            assert_abs_diff_eq!(circular_diff(theta, theta), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_circular_diff_wraparound() {
        // 179 deg vs -179 deg is a 2 deg separation.
        let diff = circular_diff(3.124139, -3.124139);
        assert_abs_diff_eq!(diff, TAU - 2.0 * 3.124139, epsilon = 1e-12);
        assert_abs_diff_eq!(diff, 0.0349, epsilon = 1e-3);
    }

    #[test]
    fn test_spatial_angle_identical_directions() {
        for (theta, phi) in [(0.0, 0.0), (2.1, -0.4), (-3.0, 1.2)] {
            let d = Direction { theta, phi };
            assert_abs_diff_eq!(spatial_angle(d, d), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_spatial_angle_quarter_turn() {
        let east = Direction { theta: 0.0, phi: 0.0 };
        let north = Direction { theta: FRAC_PI_2, phi: 0.0 };
        assert_abs_diff_eq!(spatial_angle(east, north), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_spatial_angle_nonnegative() {
        let a = Direction { theta: -3.0, phi: 0.9 };
        let b = Direction { theta: 3.0, phi: -0.9 };
        assert!(spatial_angle(a, b) >= 0.0);
        assert!(spatial_angle(b, a) >= 0.0);
    }
}
