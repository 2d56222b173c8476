// integrator.rs
// Adaptive-step RK4 integration of streamlines through the normalized
// field. The integrator never raises errors: singular field values show
// up as non-finite coordinates and truncate the trace.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::config::TraceConfig;
use crate::configuration::ChargeConfiguration;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// Along the field (out of positive charges)
    Forward,
    /// Against the field (into positive charges)
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Unit direction of the field at `point`; zero where there is no field
/// (a stalled line keeps stepping in place until its budget runs out).
fn direction_at(configuration: &ChargeConfiguration, point: Vec2) -> Vec2 {
    let e = configuration.field_at(point);
    let mag = e.mag();
    if mag == 0.0 {
        Vec2::zero()
    } else {
        e / mag
    }
}

/// Step length at `p`: the nominal step grows where the field is weak
/// and is capped at `max_step` so a line cannot jump across a
/// strong-field region.
fn adaptive_step(configuration: &ChargeConfiguration, p: Vec2, cfg: &TraceConfig) -> f32 {
    let strength = configuration.field_at(p).mag();
    let scaled = cfg.base_step * (1.0 + cfg.adapt_gain / (strength + cfg.adapt_softening));
    scaled.min(cfg.max_step)
}

/// One RK4 step of the normalized field from `p`. `sign` selects
/// integration with or against the field.
fn rk4_step(configuration: &ChargeConfiguration, p: Vec2, sign: f32, cfg: &TraceConfig) -> Vec2 {
    let h = adaptive_step(configuration, p, cfg) * sign;
    let f = |q: Vec2| direction_at(configuration, q);

    let k1 = f(p) * h;
    let k2 = f(p + k1 * 0.5) * h;
    let k3 = f(p + k2 * 0.5) * h;
    let k4 = f(p + k3) * h;

    p + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0
}

/// Integrate a streamline from `seed` for up to `max_steps` steps.
///
/// The returned points start one step away from the seed; the caller
/// prepends the seed when stitching. Stops early when a step produces a
/// non-finite coordinate (blow-up near a charge), keeping everything up
/// to the last finite point. Deterministic for identical inputs.
pub fn trace(
    configuration: &ChargeConfiguration,
    seed: Vec2,
    max_steps: usize,
    direction: Direction,
    cfg: &TraceConfig,
) -> Vec<Vec2> {
    let sign = direction.sign();
    let mut points = Vec::new();
    let mut p = seed;

    for _ in 0..max_steps {
        let next = rk4_step(configuration, p, sign, cfg);
        if !next.x.is_finite() || !next.y.is_finite() {
            break;
        }
        points.push(next);
        p = next;
    }

    points
}
