// charge.rs
// Point charge and the generational handle used to reference it.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::config;

/// Stable reference to a charge inside a `ChargeConfiguration`.
///
/// Removal invalidates only the removed handle. A vacated slot may be
/// reused by a later add, but reuse bumps the generation, so a stale id
/// is rejected instead of resolving to the wrong charge.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct ChargeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// A zero-size field source fixed in the plane. The position is set once
/// at creation; the magnitude changes only through
/// `ChargeConfiguration::set_magnitude`.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Charge {
    pos: Vec2,
    magnitude: f32,
}

impl Charge {
    pub fn new(pos: Vec2, magnitude: f32) -> Self {
        Self { pos, magnitude }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub(crate) fn set_magnitude(&mut self, magnitude: f32) {
        self.magnitude = magnitude;
    }

    /// Coulomb field contribution at `point`: E = k q / r², directed
    /// along the separation vector.
    ///
    /// Singular at the charge's own position. Querying there yields
    /// non-finite components, which are valid output: the integrator
    /// truncates on them, nothing here clamps or panics.
    pub fn field_at(&self, point: Vec2) -> Vec2 {
        let d = point - self.pos;
        let r_sq = d.mag_sq();
        let r = r_sq.sqrt();
        let e = config::K_E * self.magnitude / r_sq;
        Vec2::new(e * d.x / r, e * d.y / r)
    }
}
