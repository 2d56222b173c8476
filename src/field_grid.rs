// field_grid.rs
// Samples the superposed field on a regular lattice. The renderer turns
// these into oriented arrows and a color ramp; none of that lives here.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::config;
use crate::configuration::ChargeConfiguration;
use crate::profile_scope;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FieldSample {
    pub pos: Vec2,
    pub e: Vec2,
    /// Field magnitude normalized for color mapping
    pub intensity: f32,
}

/// Field samples on a `(divisions + 1)²` lattice of side `grid_size`
/// centered on the origin. Lattice points with no usable direction are
/// skipped: zero field, and non-finite values where a point lands
/// exactly on a charge.
pub fn sample_grid(
    configuration: &ChargeConfiguration,
    grid_size: f32,
    divisions: usize,
) -> Vec<FieldSample> {
    profile_scope!("field_grid");

    let divisions = divisions.max(1);
    let step = grid_size / divisions as f32;
    let half = grid_size / 2.0;

    let mut samples = Vec::with_capacity((divisions + 1) * (divisions + 1));
    for i in 0..=divisions {
        let x = -half + i as f32 * step;
        for j in 0..=divisions {
            let y = -half + j as f32 * step;
            let pos = Vec2::new(x, y);
            let e = configuration.field_at(pos);
            let mag = e.mag();
            if mag == 0.0 || !mag.is_finite() {
                continue;
            }
            samples.push(FieldSample { pos, e, intensity: mag / config::INTENSITY_SCALE });
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_point_on_a_charge_is_skipped() {
        let mut configuration = ChargeConfiguration::new();
        // charge exactly on the central lattice point of a 4x4 grid
        configuration.add_charge(0.0, 0.0, 2.0);

        let samples = sample_grid(&configuration, 4.0, 4);
        assert_eq!(samples.len(), 5 * 5 - 1);
        for s in &samples {
            assert!(s.e.x.is_finite() && s.e.y.is_finite());
            assert!(s.intensity > 0.0);
        }
    }

    #[test]
    fn empty_configuration_yields_no_samples() {
        let configuration = ChargeConfiguration::new();
        let samples = sample_grid(&configuration, 10.0, 8);
        assert!(samples.is_empty());
    }

    #[test]
    fn symmetric_charges_give_symmetric_intensities() {
        let mut configuration = ChargeConfiguration::new();
        configuration.add_charge(-1.0, 0.0, 3.0);
        configuration.add_charge(1.0, 0.0, -3.0);

        let samples = sample_grid(&configuration, 6.0, 6);
        let at = |x: f32, y: f32| {
            samples
                .iter()
                .find(|s| s.pos.x == x && s.pos.y == y)
                .expect("sample exists")
        };
        // mirror across the x axis
        let up = at(0.0, 1.0);
        let down = at(0.0, -1.0);
        assert!((up.intensity - down.intensity).abs() < 1e-6);
        assert!((up.e.y + down.e.y).abs() < 1e-3);
    }
}
