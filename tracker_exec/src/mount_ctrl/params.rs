//! Parameters structure for MountCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use util::params::{self, LoadError};

use crate::hw_output::NUM_STEPPER_LINES;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for mount control.
///
/// Any field missing from the parameter file takes its default value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MountParams {
    // ---- WIRING ----
    /// BCM numbers of the GPIO pins connected to the stepper driver inputs, in coil order.
    pub stepper_pins: [u8; NUM_STEPPER_LINES],

    /// BCM number of the GPIO pin connected to the servo signal line.
    pub servo_pin: u8,

    /// Reverse the stepper direction, for motors wired the other way round.
    pub invert_stepper: bool,

    // ---- STEPPER ----
    /// Number of steps (each a full pass through the half-step sequence) for one revolution of the
    /// pan axis.
    pub steps_per_rev: i32,

    /// Time each coil pattern is held for while stepping.
    ///
    /// Units: milliseconds
    pub step_delay_ms: u32,

    // ---- SERVO ----
    /// Servo pulse width at 0 degrees.
    ///
    /// Units: microseconds
    pub servo_base_pulse_us: u32,

    /// Increase in servo pulse width between 0 and 180 degrees.
    ///
    /// Units: microseconds
    pub servo_pulse_range_us: u32,

    // ---- PERSISTENCE ----
    /// Path to the file the mount orientation is stored in between runs.
    pub state_file_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Failed to load parameters: {0}")]
    ParamLoadError(#[from] LoadError),

    #[error("Steps per revolution must be positive, found {0}")]
    InvalidStepsPerRev(i32),

    #[error("Not all pins are unique: {0:?}")]
    NonUniquePins(Vec<u8>),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MountParams {
    fn default() -> Self {
        Self {
            stepper_pins: [17, 18, 27, 22],
            servo_pin: 12,
            invert_stepper: false,
            // 270 steps = 180 deg
            steps_per_rev: 540,
            step_delay_ms: 4,
            servo_base_pulse_us: 500,
            servo_pulse_range_us: 2000,
            state_file_path: PathBuf::from("motor_state.txt"),
        }
    }
}

impl MountParams {

    /// Load the parameters from the given parameter file, or use the defaults if the file doesn't
    /// exist. The parameters are checked before being returned.
    pub fn load_or_default(param_file_name: &str) -> Result<Self, ParamsError> {
        let p = match params::load::<Self>(param_file_name) {
            Ok(p) => p,
            Err(LoadError::NotFound(_)) => {
                info!("No {} parameter file found, using default mount parameters", param_file_name);
                Self::default()
            },
            Err(e) => return Err(e.into())
        };

        p.are_valid()?;

        Ok(p)
    }

    /// Determines if the parameters are valid.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.steps_per_rev <= 0 {
            return Err(ParamsError::InvalidStepsPerRev(self.steps_per_rev))
        }

        let mut pins: Vec<u8> = self.stepper_pins.to_vec();
        pins.push(self.servo_pin);

        if pins.iter().any(|p| pins.iter().filter(|&q| q == p).count() > 1) {
            return Err(ParamsError::NonUniquePins(pins))
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(MountParams::default().are_valid().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let mut p = MountParams::default();
        p.steps_per_rev = 0;
        assert!(matches!(p.are_valid(), Err(ParamsError::InvalidStepsPerRev(0))));

        let mut p = MountParams::default();
        p.servo_pin = 17;
        assert!(matches!(p.are_valid(), Err(ParamsError::NonUniquePins(_))));
    }

    #[test]
    fn test_load_or_default_missing() {
        let p = MountParams::load_or_default("no_such_mount_params.toml").unwrap();
        assert_eq!(p, MountParams::default());
    }

    #[test]
    fn test_partial_params_file() {
        let p: MountParams = toml::from_str("steps_per_rev = 2048\ninvert_stepper = true\n")
            .unwrap();

        assert_eq!(p.steps_per_rev, 2048);
        assert!(p.invert_stepper);
        assert_eq!(p.servo_pin, 12);
        assert_eq!(p.state_file_path, PathBuf::from("motor_state.txt"));
    }
}
