// Centralized configuration for field and tracing parameters

// ====================
// Field Constants
// ====================
/// Coulomb constant in simulation units. Magnitudes are in units of the
/// elementary charge; the constant keeps the 8.988 mantissa of the real
/// one but is scaled so typical fields land in the integrator's working
/// range (illustrative, not SI-calibrated).
pub const K_E: f32 = 8.988e1;

// ====================
// Integrator Parameters
// ====================
/// Nominal RK4 step length
pub const BASE_STEP: f32 = 0.01;
/// Gain of the adaptive step-size term (larger = longer steps in weak field)
pub const ADAPT_GAIN: f32 = 0.1;
/// Softening added to the field strength in the adaptive term
pub const ADAPT_SOFTENING: f32 = 0.01;
/// Upper bound on the adaptive step length
pub const MAX_STEP: f32 = 0.05;

// ====================
// Trace Parameters
// ====================
/// Radius of the seed circle around each charge
pub const SEED_RADIUS: f32 = 0.1;
/// Seed points per charge, evenly spaced on the seed circle
pub const SEEDS_PER_CHARGE: usize = 8;
/// Step budget per half-trace
pub const STEP_BUDGET: usize = 2000;
/// A trace terminates once its tail is this close to a neighboring charge.
/// Slightly larger than SEED_RADIUS so incoming lines stop just outside
/// the neighbor's own seed circle.
pub const PROXIMITY_EPS: f32 = 0.15;
/// Steps requested per extension batch
pub const EXTENSION_BATCH: usize = 250;
/// Total extension steps allowed per trace
pub const EXTENSION_CEILING: usize = 2000;

// ====================
// Field Grid Parameters
// ====================
/// Divisor mapping field magnitude to a 0..~1 color intensity
pub const INTENSITY_SCALE: f32 = 500.0;

use serde::{Deserialize, Serialize};

/// Runtime-tunable tracing parameters. Defaults mirror the constants
/// above; the UI may hand in an edited copy per retrace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Nominal RK4 step length
    pub base_step: f32,
    /// Gain of the adaptive step-size term
    pub adapt_gain: f32,
    /// Softening added to field strength in the adaptive term
    pub adapt_softening: f32,
    /// Upper bound on the adaptive step length
    pub max_step: f32,
    /// Radius of the seed circle around each charge
    pub seed_radius: f32,
    /// Seed points per charge
    pub seeds_per_charge: usize,
    /// Step budget per half-trace
    pub step_budget: usize,
    /// Proximity radius terminating an extended trace at a neighbor
    pub proximity_eps: f32,
    /// Steps requested per extension batch
    pub extension_batch: usize,
    /// Total extension steps allowed per trace
    pub extension_ceiling: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            base_step: BASE_STEP,
            adapt_gain: ADAPT_GAIN,
            adapt_softening: ADAPT_SOFTENING,
            max_step: MAX_STEP,
            seed_radius: SEED_RADIUS,
            seeds_per_charge: SEEDS_PER_CHARGE,
            step_budget: STEP_BUDGET,
            proximity_eps: PROXIMITY_EPS,
            extension_batch: EXTENSION_BATCH,
            extension_ceiling: EXTENSION_CEILING,
        }
    }
}
