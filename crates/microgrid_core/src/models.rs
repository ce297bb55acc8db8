use serde::{Deserialize, Serialize};

/// Role an inverter plays on the shared bus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum InverterRole {
    /// Sets the grid reference and responds to load through droop.
    GridForming,
    /// Tracks the reference set by the forming units.
    GridFollowing,
}

impl InverterRole {
    pub fn is_grid_forming(self) -> bool {
        matches!(self, InverterRole::GridForming)
    }
}

impl std::fmt::Display for InverterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InverterRole::GridForming => write!(f, "grid-forming"),
            InverterRole::GridFollowing => write!(f, "grid-following"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InverterConfig {
    pub role: InverterRole,
    /// Real power setpoint in W
    pub real_power_setpoint: f64,
    /// Reactive power setpoint in VAR
    pub reactive_power_setpoint: f64,
    /// Hz per kW
    #[serde(default)]
    pub frequency_droop: f64,
    /// V per kVAR
    #[serde(default)]
    pub voltage_droop: f64,
}

impl InverterConfig {
    pub fn grid_forming(
        real_power_setpoint: f64,
        reactive_power_setpoint: f64,
        frequency_droop: f64,
        voltage_droop: f64,
    ) -> Self {
        InverterConfig {
            role: InverterRole::GridForming,
            real_power_setpoint,
            reactive_power_setpoint,
            frequency_droop,
            voltage_droop,
        }
    }

    /// A following unit never carries droop coefficients.
    pub fn grid_following(real_power_setpoint: f64, reactive_power_setpoint: f64) -> Self {
        InverterConfig {
            role: InverterRole::GridFollowing,
            real_power_setpoint,
            reactive_power_setpoint,
            frequency_droop: 0.0,
            voltage_droop: 0.0,
        }
    }
}

/// One point of the per-inverter series shown next to the totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InverterContribution {
    pub index: usize,
    pub role: InverterRole,
    pub real_power: f64,
    pub reactive_power: f64,
    /// Hz subtracted from nominal by this inverter
    pub frequency_shift: f64,
    /// V subtracted from nominal by this inverter
    pub voltage_shift: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    pub nominal_frequency: f64,
    pub nominal_voltage: f64,
    pub total_real_power: f64,
    pub total_reactive_power: f64,
    pub frequency: f64,
    pub voltage: f64,
    pub frequency_unstable: bool,
    pub voltage_unstable: bool,
    pub inverters: Vec<InverterContribution>,
}

impl GridState {
    pub fn frequency_deviation(&self) -> f64 {
        self.frequency - self.nominal_frequency
    }

    pub fn voltage_deviation(&self) -> f64 {
        self.voltage - self.nominal_voltage
    }

    pub fn is_stable(&self) -> bool {
        !self.frequency_unstable && !self.voltage_unstable
    }
}
