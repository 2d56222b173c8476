// commands.rs
// Handles processing of ConfigCommand messages from the UI layer.
// Every configuration mutation funnels through here so the single-writer
// discipline has one chokepoint: a command completes before the caller
// can ask for a retrace.

use serde::{Deserialize, Serialize};

use crate::charge::ChargeId;
use crate::configuration::{ChargeConfiguration, ConfigError};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConfigCommand {
    /// Place a new charge at a clicked position
    AddCharge { x: f32, y: f32, magnitude: f32 },
    /// Slider edit of an existing charge's magnitude
    SetMagnitude { id: ChargeId, magnitude: f32 },
    RemoveCharge { id: ChargeId },
    ClearAll,
}

/// Process a single ConfigCommand. `AddCharge` reports the handle of
/// the new charge; stale handles surface as `ConfigError`.
pub fn process_command(
    configuration: &mut ChargeConfiguration,
    cmd: ConfigCommand,
) -> Result<Option<ChargeId>, ConfigError> {
    match cmd {
        ConfigCommand::AddCharge { x, y, magnitude } => {
            Ok(Some(configuration.add_charge(x, y, magnitude)))
        }

        ConfigCommand::SetMagnitude { id, magnitude } => {
            configuration.set_magnitude(id, magnitude)?;
            Ok(None)
        }

        ConfigCommand::RemoveCharge { id } => {
            configuration.remove_charge(id)?;
            Ok(None)
        }

        ConfigCommand::ClearAll => {
            configuration.clear();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edit_remove_round_trip() {
        let mut configuration = ChargeConfiguration::new();

        let id = process_command(
            &mut configuration,
            ConfigCommand::AddCharge { x: 0.5, y: -0.5, magnitude: -1.0 },
        )
        .unwrap()
        .expect("AddCharge reports a handle");

        process_command(&mut configuration, ConfigCommand::SetMagnitude { id, magnitude: 2.0 })
            .unwrap();
        assert_eq!(configuration.get(id).unwrap().magnitude(), 2.0);

        process_command(&mut configuration, ConfigCommand::RemoveCharge { id }).unwrap();
        assert!(configuration.is_empty());
    }

    #[test]
    fn stale_handle_surfaces_as_error() {
        let mut configuration = ChargeConfiguration::new();
        let id = configuration.add_charge(0.0, 0.0, 1.0);
        configuration.remove_charge(id).unwrap();

        let err = process_command(
            &mut configuration,
            ConfigCommand::SetMagnitude { id, magnitude: 3.0 },
        );
        assert_eq!(err, Err(ConfigError::StaleHandle(id)));
    }

    #[test]
    fn clear_all_invalidates_every_handle() {
        let mut configuration = ChargeConfiguration::new();
        let a = configuration.add_charge(0.0, 0.0, 1.0);
        let b = configuration.add_charge(1.0, 1.0, -1.0);

        process_command(&mut configuration, ConfigCommand::ClearAll).unwrap();
        assert!(configuration.is_empty());
        assert!(configuration.get(a).is_none());
        assert!(configuration.get(b).is_none());
    }
}
