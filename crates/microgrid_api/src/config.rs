use microgrid_core::{ConfigError, GridSettings, InverterConfig, MicrogridState};
use serde::{Deserialize, Serialize};

/// Contents of the JSON configuration file passed with `--config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrogridConfig {
    #[serde(default)]
    pub settings: GridSettings,
    pub inverters: Vec<InverterConfig>,
}

impl Default for MicrogridConfig {
    /// Two idle inverters on default nominal values.
    fn default() -> Self {
        MicrogridConfig {
            settings: GridSettings::default(),
            inverters: vec![
                InverterConfig::grid_forming(0.0, 0.0, 0.05, 0.05),
                InverterConfig::grid_following(0.0, 0.0),
            ],
        }
    }
}

impl MicrogridConfig {
    pub fn into_state(self) -> Result<MicrogridState, ConfigError> {
        MicrogridState::new(self.settings, self.inverters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microgrid_core::InverterRole;

    #[test]
    fn test_json_deserialization() {
        let json = r#"
        {
          "settings": { "nominalFrequency": 50.0 },
          "inverters": [
            {"role": "gridForming", "realPowerSetpoint": 500, "reactivePowerSetpoint": 0,
             "frequencyDroop": 0.05, "voltageDroop": 0.1},
            {"role": "gridFollowing", "realPowerSetpoint": 250, "reactivePowerSetpoint": 50}
          ]
        }
        "#;

        let config: MicrogridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.settings.nominal_frequency, 50.0);
        assert_eq!(config.settings.nominal_voltage, 230.0);
        assert_eq!(config.inverters.len(), 2);
        assert_eq!(config.inverters[1].role, InverterRole::GridFollowing);
        assert_eq!(config.inverters[1].frequency_droop, 0.0);

        let state = config.into_state().unwrap();
        assert_eq!(state.grid_state().total_real_power, 750.0);
    }

    #[test]
    fn test_settings_are_optional() {
        let json = r#"
        {
          "inverters": [
            {"role": "gridForming", "realPowerSetpoint": 0, "reactivePowerSetpoint": 0},
            {"role": "gridForming", "realPowerSetpoint": 0, "reactivePowerSetpoint": 0}
          ]
        }
        "#;

        let config: MicrogridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.settings, GridSettings::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let json = r#"
        {
          "inverters": [
            {"role": "gridFollowing", "realPowerSetpoint": 0, "reactivePowerSetpoint": 0,
             "frequencyDroop": 0.2}
          ]
        }
        "#;

        let config: MicrogridConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.into_state(),
            Err(ConfigError::InverterCount { count: 1, .. })
        ));
    }

    #[test]
    fn test_default_is_valid() {
        let state = MicrogridConfig::default()
            .into_state()
            .expect("Default configuration should be valid");
        let grid = state.grid_state();
        assert_eq!(grid.frequency, 60.0);
        assert_eq!(grid.voltage, 230.0);
    }
}
