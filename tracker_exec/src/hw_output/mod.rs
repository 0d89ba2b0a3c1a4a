//! # Hardware output module
//!
//! This module provides a unified output interface over the hardware driving the mount: four
//! stepper coil lines, one servo PWM line, and a blocking delay used to let the stepper coils
//! settle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`HwOutput`] implementation which records all outputs, used off target and in tests.
pub mod sim;

/// [`HwOutput`] implementation for the Raspberry Pi GPIO header.
#[cfg(target_arch = "arm")]
pub mod rpi;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use sim::SimOutput;
#[cfg(target_arch = "arm")]
pub use rpi::RpiOutput;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of coil lines driving the stepper motor.
pub const NUM_STEPPER_LINES: usize = 4;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// The output used by the executables on this platform.
#[cfg(target_arch = "arm")]
pub type PlatformOutput = RpiOutput;

/// The output used by the executables on this platform.
#[cfg(not(target_arch = "arm"))]
pub type PlatformOutput = SimOutput;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for driving the mount hardware.
pub trait HwOutput {

    /// Set the state of one of the stepper coil lines.
    ///
    /// ## Arguments
    /// - `line` - Index of the line, must be less than [`NUM_STEPPER_LINES`]
    /// - `high` - `true` to energise the line, `false` to de-energise it
    fn set_line(&mut self, line: usize, high: bool) -> Result<(), HwError>;

    /// Set the pulse width sent to the tilt servo.
    fn set_servo_pulse(&mut self, pulse_us: u32) -> Result<(), HwError>;

    /// Block for the given number of microseconds.
    fn delay_us(&mut self, us: u32);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum HwError {
    #[error("The GPIO interface has already been initialised in this process")]
    AlreadyInitialised,

    #[error("Could not initialise the GPIO interface: {0}")]
    GpioInit(String),

    #[error("Stepper line {0} does not exist")]
    InvalidLine(usize),

    #[error("Could not set the servo pulse: {0}")]
    Pwm(String),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Initialise the output for the current platform.
///
/// On the Raspberry Pi this claims the GPIO pins, which may only be done once per process.
#[cfg(target_arch = "arm")]
pub fn init_platform_output(
    stepper_pins: [u8; NUM_STEPPER_LINES], 
    servo_pin: u8
) -> Result<PlatformOutput, HwError> {
    RpiOutput::new(stepper_pins, servo_pin)
}

/// Initialise the output for the current platform.
///
/// Off the Raspberry Pi a real-time [`SimOutput`] is returned so the executables can be dry-run.
#[cfg(not(target_arch = "arm"))]
pub fn init_platform_output(
    _stepper_pins: [u8; NUM_STEPPER_LINES], 
    _servo_pin: u8
) -> Result<PlatformOutput, HwError> {
    log::warn!("Not running on a Raspberry Pi, using simulated hardware output");
    Ok(SimOutput::real_time())
}
