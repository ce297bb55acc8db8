mod estimator;
mod models;
mod settings;

pub use crate::estimator::{estimate, estimate_with};
pub use crate::models::*;
pub use crate::settings::*;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Inverter {index}: {field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Inverter {index}: {field} must be a finite number")]
    NonFinite { index: usize, field: &'static str },
    #[error("Inverter {index} is grid-following and cannot carry droop coefficients")]
    DroopOnGridFollowing { index: usize },
    #[error("{count} inverters configured, expected between {min} and {max}")]
    InverterCount { count: usize, min: usize, max: usize },
    #[error("Inverter {index} not found")]
    InverterNotFound { index: usize },
    #[error("Invalid grid settings: {field} = {value}")]
    InvalidSettings { field: &'static str, value: f64 },
}

/// The current inverter list of the microgrid and the nominal values it is
/// estimated against.
///
/// Nothing derived is stored here: every call to [`MicrogridState::grid_state`]
/// runs the estimator again.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrogridState {
    settings: GridSettings,
    inverters: Vec<InverterConfig>,
}

impl MicrogridState {
    pub fn new(
        settings: GridSettings,
        inverters: Vec<InverterConfig>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        validate_inverters(&inverters)?;
        Ok(MicrogridState {
            settings,
            inverters,
        })
    }

    pub fn get_settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn get_inverters(&self) -> &[InverterConfig] {
        &self.inverters
    }

    pub fn grid_state(&self) -> GridState {
        estimate_with(&self.inverters, &self.settings)
    }

    /// Replace the whole inverter list.
    ///
    /// The previous list is kept if the new one fails validation.
    pub fn replace_inverters(
        &mut self,
        inverters: Vec<InverterConfig>,
    ) -> Result<GridState, ConfigError> {
        tracing::info!("Replacing inverter configuration ({} inverters)", inverters.len());
        validate_inverters(&inverters)?;
        self.inverters = inverters;
        Ok(self.grid_state())
    }

    /// Replace the configuration of a single inverter.
    pub fn update_inverter(
        &mut self,
        index: usize,
        config: InverterConfig,
    ) -> Result<GridState, ConfigError> {
        tracing::info!("Updating inverter {} ({})", index, config.role);
        let Some(slot) = self.inverters.get_mut(index) else {
            return Err(ConfigError::InverterNotFound { index });
        };
        config.validate(index)?;
        *slot = config;
        Ok(self.grid_state())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn default_inverters() -> Vec<InverterConfig> {
        vec![
            InverterConfig::grid_forming(1000.0, 200.0, 0.05, 0.5),
            InverterConfig::grid_following(500.0, 100.0),
            InverterConfig::grid_forming(600.0, -200.0, 0.1, 0.5),
        ]
    }

    fn default_state() -> MicrogridState {
        MicrogridState::new(GridSettings::default(), default_inverters())
            .expect("Could not create the state")
    }

    #[test]
    fn test_new_rejects_invalid_configuration() {
        let result = MicrogridState::new(
            GridSettings::default(),
            vec![InverterConfig::grid_following(0.0, 0.0)],
        );
        assert!(matches!(
            result,
            Err(ConfigError::InverterCount { count: 1, .. })
        ));

        let result = MicrogridState::new(
            GridSettings {
                nominal_frequency: -50.0,
                nominal_voltage: 230.0,
            },
            default_inverters(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidSettings { .. })));
    }

    #[test]
    fn test_grid_state() {
        let state = default_state();
        let grid = state.grid_state();

        assert_eq!(grid.total_real_power, 2100.0);
        assert_eq!(grid.total_reactive_power, 100.0);
        assert_eq!(grid.nominal_frequency, 60.0);
        assert_eq!(grid.inverters.len(), 3);
        assert!(grid.is_stable());
        assert!(grid.frequency < 60.0);
    }

    #[test]
    fn test_replace_inverters() {
        let mut state = default_state();

        let grid = state
            .replace_inverters(vec![
                InverterConfig::grid_forming(2000.0, 0.0, 1.0, 0.0),
                InverterConfig::grid_forming(1000.0, 0.0, 1.0, 0.0),
            ])
            .expect("Could not replace inverters");

        assert_eq!(grid.frequency, 57.0);
        assert!(grid.frequency_unstable);
        assert_eq!(state.get_inverters().len(), 2);
    }

    #[test]
    fn test_replace_inverters_keeps_previous_on_error() {
        let mut state = default_state();

        let result = state.replace_inverters(vec![
            InverterConfig::grid_forming(0.0, 0.0, 0.05, 0.05),
            InverterConfig::grid_following(0.0, -1500.0),
        ]);

        match result {
            Err(ConfigError::OutOfRange { index, field, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "reactivePowerSetpoint");
            }
            _ => panic!("Expected OutOfRange error"),
        }
        assert_eq!(state.get_inverters(), default_inverters().as_slice());
    }

    #[test]
    fn test_update_inverter() {
        let mut state = default_state();

        let grid = state
            .update_inverter(1, InverterConfig::grid_following(-500.0, 0.0))
            .expect("Could not update inverter");
        assert_eq!(grid.total_real_power, 1100.0);
        assert_eq!(grid.total_reactive_power, 0.0);
        assert_eq!(grid.inverters[1].real_power, -500.0);

        let result = state.update_inverter(3, InverterConfig::grid_following(0.0, 0.0));
        assert_eq!(result, Err(ConfigError::InverterNotFound { index: 3 }));

        let mut follower = InverterConfig::grid_following(0.0, 0.0);
        follower.voltage_droop = 0.2;
        let result = state.update_inverter(1, follower);
        assert_eq!(result, Err(ConfigError::DroopOnGridFollowing { index: 1 }));
        assert_eq!(state.get_inverters()[1].real_power_setpoint, -500.0);
    }
}
