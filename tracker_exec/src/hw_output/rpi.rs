//! [`HwOutput`] implementation for the Raspberry Pi GPIO header, using `rppal`.
//!
//! The stepper coils are driven through a ULN2003 board from four GPIO outputs, the servo is
//! driven with software PWM on a fifth.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use conquer_once::OnceCell;
use embedded_hal::blocking::delay::DelayUs;
use log::info;
use rppal::{
    gpio::{Gpio, OutputPin},
    hal::Delay,
};

use super::{HwError, HwOutput, NUM_STEPPER_LINES};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Period of the servo PWM signal (50 Hz).
const SERVO_PERIOD_US: u64 = 20_000;

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// Set once the GPIO pins have been claimed by this process.
static GPIO_INIT: OnceCell<()> = OnceCell::uninit();

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct RpiOutput {
    stepper_pins: Vec<OutputPin>,

    servo_pin: OutputPin,

    delay: Delay,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RpiOutput {
    /// Claim the GPIO pins used by the mount.
    ///
    /// This may only succeed once per process, later calls return
    /// [`HwError::AlreadyInitialised`]. The pins are released when the output is dropped.
    pub fn new(
        stepper_pins: [u8; NUM_STEPPER_LINES], 
        servo_pin: u8
    ) -> Result<Self, HwError> {
        GPIO_INIT
            .try_init_once(|| ())
            .map_err(|_| HwError::AlreadyInitialised)?;

        let gpio = Gpio::new().map_err(|e| HwError::GpioInit(e.to_string()))?;

        let mut pins = Vec::with_capacity(NUM_STEPPER_LINES);
        for pin in stepper_pins.iter() {
            pins.push(
                gpio.get(*pin)
                    .map_err(|e| HwError::GpioInit(format!("stepper pin {}: {}", pin, e)))?
                    .into_output_low()
            );
        }

        let servo = gpio.get(servo_pin)
            .map_err(|e| HwError::GpioInit(format!("servo pin {}: {}", servo_pin, e)))?
            .into_output_low();

        info!(
            "GPIO initialised (stepper pins {:?}, servo pin {})", 
            stepper_pins, 
            servo_pin
        );

        Ok(Self {
            stepper_pins: pins,
            servo_pin: servo,
            delay: Delay::new(),
        })
    }
}

impl HwOutput for RpiOutput {
    fn set_line(&mut self, line: usize, high: bool) -> Result<(), HwError> {
        let pin = self.stepper_pins
            .get_mut(line)
            .ok_or(HwError::InvalidLine(line))?;

        if high {
            pin.set_high();
        }
        else {
            pin.set_low();
        }

        Ok(())
    }

    fn set_servo_pulse(&mut self, pulse_us: u32) -> Result<(), HwError> {
        self.servo_pin
            .set_pwm(
                Duration::from_micros(SERVO_PERIOD_US), 
                Duration::from_micros(pulse_us as u64)
            )
            .map_err(|e| HwError::Pwm(e.to_string()))
    }

    fn delay_us(&mut self, us: u32) {
        DelayUs::<u32>::delay_us(&mut self.delay, us);
    }
}
