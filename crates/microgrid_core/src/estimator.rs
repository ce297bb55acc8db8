use crate::settings::{FREQUENCY_DEVIATION_LIMIT, VOLTAGE_DEVIATION_LIMIT};
use crate::{GridSettings, GridState, InverterConfig, InverterContribution};

/// Estimate the steady-state grid frequency and voltage of a single-bus microgrid.
///
/// Every grid-forming inverter independently subtracts its own droop response
/// (`droop * setpoint / 1000`) from the nominal values; grid-following units only
/// count towards the power totals. Inverters are visited in the given order so the
/// floating-point result is reproducible.
///
/// The result is never clamped: a large enough droop response can push frequency
/// or voltage below zero.
pub fn estimate(
    configs: &[InverterConfig],
    nominal_frequency: f64,
    nominal_voltage: f64,
) -> GridState {
    let mut total_real_power = 0.0;
    let mut total_reactive_power = 0.0;
    let mut frequency = nominal_frequency;
    let mut voltage = nominal_voltage;
    let mut inverters = Vec::with_capacity(configs.len());

    for (index, config) in configs.iter().enumerate() {
        total_real_power += config.real_power_setpoint;
        total_reactive_power += config.reactive_power_setpoint;

        let (frequency_shift, voltage_shift) = if config.role.is_grid_forming() {
            (
                config.frequency_droop * (config.real_power_setpoint / 1000.0),
                config.voltage_droop * (config.reactive_power_setpoint / 1000.0),
            )
        } else {
            (0.0, 0.0)
        };
        frequency -= frequency_shift;
        voltage -= voltage_shift;

        inverters.push(InverterContribution {
            index,
            role: config.role,
            real_power: config.real_power_setpoint,
            reactive_power: config.reactive_power_setpoint,
            frequency_shift,
            voltage_shift,
        });
    }

    let state = GridState {
        nominal_frequency,
        nominal_voltage,
        total_real_power,
        total_reactive_power,
        frequency,
        voltage,
        frequency_unstable: (frequency - nominal_frequency).abs() > FREQUENCY_DEVIATION_LIMIT,
        voltage_unstable: (voltage - nominal_voltage).abs() > VOLTAGE_DEVIATION_LIMIT,
        inverters,
    };

    tracing::debug!(
        inverters = configs.len(),
        total_real_power,
        total_reactive_power,
        frequency,
        voltage,
        "Estimated grid state"
    );
    if state.frequency_unstable {
        tracing::warn!(
            "Frequency {:.3} Hz deviates more than {} Hz from nominal {} Hz",
            frequency,
            FREQUENCY_DEVIATION_LIMIT,
            nominal_frequency
        );
    }
    if state.voltage_unstable {
        tracing::warn!(
            "Voltage {:.2} V deviates more than {} V from nominal {} V",
            voltage,
            VOLTAGE_DEVIATION_LIMIT,
            nominal_voltage
        );
    }

    state
}

/// Same as [`estimate`], taking the nominal values from `settings`.
pub fn estimate_with(configs: &[InverterConfig], settings: &GridSettings) -> GridState {
    estimate(configs, settings.nominal_frequency, settings.nominal_voltage)
}
