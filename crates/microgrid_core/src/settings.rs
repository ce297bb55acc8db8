use serde::{Deserialize, Serialize};

use crate::{ConfigError, InverterConfig};

pub const DEFAULT_NOMINAL_FREQUENCY: f64 = 60.0;
pub const DEFAULT_NOMINAL_VOLTAGE: f64 = 230.0;

/// Deviations strictly above these limits flag the grid as unstable.
pub const FREQUENCY_DEVIATION_LIMIT: f64 = 2.0;
pub const VOLTAGE_DEVIATION_LIMIT: f64 = 20.0;

pub const REAL_POWER_RANGE: (f64, f64) = (-2000.0, 2000.0);
pub const REACTIVE_POWER_RANGE: (f64, f64) = (-1000.0, 1000.0);
pub const DROOP_RANGE: (f64, f64) = (0.0, 1.0);
pub const INVERTER_COUNT_RANGE: (usize, usize) = (2, 10);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Nominal frequency in Hz
    #[serde(default = "default_nominal_frequency")]
    pub nominal_frequency: f64,
    /// Nominal voltage in V
    #[serde(default = "default_nominal_voltage")]
    pub nominal_voltage: f64,
}

fn default_nominal_frequency() -> f64 {
    DEFAULT_NOMINAL_FREQUENCY
}

fn default_nominal_voltage() -> f64 {
    DEFAULT_NOMINAL_VOLTAGE
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            nominal_frequency: DEFAULT_NOMINAL_FREQUENCY,
            nominal_voltage: DEFAULT_NOMINAL_VOLTAGE,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("nominalFrequency", self.nominal_frequency),
            ("nominalVoltage", self.nominal_voltage),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSettings { field, value });
            }
        }
        Ok(())
    }
}

fn check_range(
    index: usize,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { index, field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            index,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl InverterConfig {
    /// Check the declared ranges of every field.
    ///
    /// `index` is only used to locate the offending inverter in the error.
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        check_range(
            index,
            "realPowerSetpoint",
            self.real_power_setpoint,
            REAL_POWER_RANGE,
        )?;
        check_range(
            index,
            "reactivePowerSetpoint",
            self.reactive_power_setpoint,
            REACTIVE_POWER_RANGE,
        )?;
        check_range(index, "frequencyDroop", self.frequency_droop, DROOP_RANGE)?;
        check_range(index, "voltageDroop", self.voltage_droop, DROOP_RANGE)?;

        if !self.role.is_grid_forming() && (self.frequency_droop != 0.0 || self.voltage_droop != 0.0)
        {
            return Err(ConfigError::DroopOnGridFollowing { index });
        }
        Ok(())
    }
}

/// Validate a full inverter list, including the number of inverters.
pub fn validate_inverters(inverters: &[InverterConfig]) -> Result<(), ConfigError> {
    let (min, max) = INVERTER_COUNT_RANGE;
    if inverters.len() < min || inverters.len() > max {
        return Err(ConfigError::InverterCount {
            count: inverters.len(),
            min,
            max,
        });
    }
    inverters
        .iter()
        .enumerate()
        .try_for_each(|(index, inverter)| inverter.validate(index))
}
