// configuration.rs
// Owns the set of point charges and computes the superposed field.
// Charges are kept in a slot arena so external references stay valid
// across removals (see ChargeId).

use std::fmt;

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::charge::{Charge, ChargeId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConfigError {
    /// The handle refers to a removed charge or a reused slot.
    StaleHandle(ChargeId),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::StaleHandle(id) => {
                write!(f, "stale charge handle (slot {}, generation {})", id.index, id.generation)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    charge: Option<Charge>,
}

/// The session's charge collection. Single-writer: mutations run to
/// completion before any retrace reads the configuration, and no
/// mutation may interleave with an in-flight trace.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChargeConfiguration {
    slots: Vec<Slot>,
    /// Vacant slot indices, reused LIFO
    free: Vec<u32>,
    len: usize,
}

impl ChargeConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a charge and returns its handle. Always succeeds.
    pub fn add_charge(&mut self, x: f32, y: f32, magnitude: f32) -> ChargeId {
        let charge = Charge::new(Vec2::new(x, y), magnitude);
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.charge = Some(charge);
                ChargeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, charge: Some(charge) });
                ChargeId { index, generation: 0 }
            }
        }
    }

    pub fn get(&self, id: ChargeId) -> Option<&Charge> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.charge.as_ref())
    }

    pub fn set_magnitude(&mut self, id: ChargeId, magnitude: f32) -> Result<(), ConfigError> {
        let charge = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.charge.as_mut())
            .ok_or(ConfigError::StaleHandle(id))?;
        charge.set_magnitude(magnitude);
        Ok(())
    }

    /// Removes the charge behind `id` and returns it. Every other
    /// handle stays valid; only `id` itself becomes stale.
    pub fn remove_charge(&mut self, id: ChargeId) -> Result<Charge, ConfigError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or(ConfigError::StaleHandle(id))?;
        let charge = slot.charge.take().ok_or(ConfigError::StaleHandle(id))?;
        self.free.push(id.index);
        self.len -= 1;
        Ok(charge)
    }

    /// Removes every charge. Handles held before the call all become
    /// stale; slot generations are kept so they cannot resolve again.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.charge.take().is_some() {
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live charges in slot order (insertion order until a removed slot
    /// is reused).
    pub fn charges(&self) -> impl Iterator<Item = (ChargeId, &Charge)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let charge = slot.charge.as_ref()?;
            Some((ChargeId { index: index as u32, generation: slot.generation }, charge))
        })
    }

    /// Superposed field at `point`: the vector sum of every live
    /// charge's contribution, in iteration order. Zero-magnitude charges
    /// add the zero vector; they are summed, not skipped. Summation
    /// order only matters at the last floating-point bit.
    pub fn field_at(&self, point: Vec2) -> Vec2 {
        let mut total = Vec2::zero();
        for (_, charge) in self.charges() {
            total += charge.field_at(point);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn field_is_superposition_of_contributions() {
        let mut configuration = ChargeConfiguration::new();
        let a = configuration.add_charge(-1.0, 0.0, 3.0);
        let b = configuration.add_charge(1.0, 0.0, -2.0);
        let p = Vec2::new(0.3, 0.8);

        let total = configuration.field_at(p);
        let sum = configuration.get(a).unwrap().field_at(p) + configuration.get(b).unwrap().field_at(p);
        assert!((total.x - sum.x).abs() < 1e-4);
        assert!((total.y - sum.y).abs() < 1e-4);
    }

    #[test]
    fn single_charge_scenario() {
        let mut configuration = ChargeConfiguration::new();
        configuration.add_charge(0.0, 0.0, 5.0);

        let e = configuration.field_at(Vec2::new(1.0, 0.0));
        assert!((e.x - config::K_E * 5.0).abs() < 1e-3);
        assert!(e.y.abs() < 1e-6);

        let singular = configuration.field_at(Vec2::zero());
        assert!(!singular.x.is_finite() || !singular.y.is_finite());
    }

    #[test]
    fn dipole_midline_scenario() {
        let mut configuration = ChargeConfiguration::new();
        configuration.add_charge(-1.0, 0.0, 3.0);
        configuration.add_charge(1.0, 0.0, -3.0);

        // midpoint: finite, nonzero, along the axis joining the charges
        let mid = configuration.field_at(Vec2::zero());
        assert!(mid.x.is_finite() && mid.y.is_finite());
        assert!(mid.x > 0.0);
        assert!(mid.y.abs() < 1e-4);

        // mirror points above and below: equal magnitude, mirrored y
        let up = configuration.field_at(Vec2::new(0.0, 1.0));
        let down = configuration.field_at(Vec2::new(0.0, -1.0));
        assert!((up.mag() - down.mag()).abs() < 1e-4);
        assert!((up.x - down.x).abs() < 1e-4);
        assert!((up.y + down.y).abs() < 1e-4);
    }

    #[test]
    fn zero_magnitude_charge_is_inert() {
        let mut configuration = ChargeConfiguration::new();
        configuration.add_charge(-1.0, 0.0, 3.0);
        let p = Vec2::new(0.5, 0.5);
        let before = configuration.field_at(p);

        let neutral = configuration.add_charge(0.2, 0.2, 0.0);
        let with_neutral = configuration.field_at(p);
        assert_eq!(before.x, with_neutral.x);
        assert_eq!(before.y, with_neutral.y);

        configuration.remove_charge(neutral).unwrap();
        let after = configuration.field_at(p);
        assert_eq!(before.x, after.x);
        assert_eq!(before.y, after.y);
    }

    #[test]
    fn removal_invalidates_only_the_removed_handle() {
        let mut configuration = ChargeConfiguration::new();
        let a = configuration.add_charge(0.0, 0.0, 1.0);
        let b = configuration.add_charge(1.0, 0.0, 2.0);
        let c = configuration.add_charge(2.0, 0.0, 3.0);

        configuration.remove_charge(b).unwrap();
        assert_eq!(configuration.len(), 2);
        assert!(configuration.get(b).is_none());
        assert_eq!(configuration.get(a).unwrap().magnitude(), 1.0);
        assert_eq!(configuration.get(c).unwrap().magnitude(), 3.0);
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut configuration = ChargeConfiguration::new();
        let old = configuration.add_charge(0.0, 0.0, 1.0);
        configuration.remove_charge(old).unwrap();

        // the freed slot is reused, with a newer generation
        let new = configuration.add_charge(5.0, 5.0, -4.0);
        assert_eq!(old.index, new.index);
        assert_ne!(old.generation, new.generation);

        assert!(configuration.get(old).is_none());
        assert_eq!(configuration.set_magnitude(old, 9.0), Err(ConfigError::StaleHandle(old)));
        assert_eq!(configuration.remove_charge(old), Err(ConfigError::StaleHandle(old)));
        // the resident charge was never touched
        assert_eq!(configuration.get(new).unwrap().magnitude(), -4.0);
    }

    #[test]
    fn double_remove_fails_cleanly() {
        let mut configuration = ChargeConfiguration::new();
        let id = configuration.add_charge(0.0, 0.0, 1.0);
        configuration.remove_charge(id).unwrap();
        assert_eq!(configuration.remove_charge(id), Err(ConfigError::StaleHandle(id)));
        assert!(configuration.is_empty());
    }

    #[test]
    fn set_magnitude_is_the_only_mutation_path() {
        let mut configuration = ChargeConfiguration::new();
        let id = configuration.add_charge(1.0, 2.0, 1.0);
        configuration.set_magnitude(id, -2.5).unwrap();
        let charge = configuration.get(id).unwrap();
        assert_eq!(charge.magnitude(), -2.5);
        // position is fixed at creation
        assert_eq!(charge.pos(), Vec2::new(1.0, 2.0));
    }
}
