//! [`HwOutput`] implementation which records every output instead of driving hardware.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};

use super::{HwError, HwOutput, NUM_STEPPER_LINES};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated hardware output.
///
/// Delays are always accounted for in `total_delay_us`. A real-time output also sleeps for them.
#[derive(Debug, Default, Clone)]
pub struct SimOutput {
    /// Current state of each stepper line.
    pub lines: [bool; NUM_STEPPER_LINES],

    /// Snapshot of the stepper lines taken at the start of every delay, i.e. each coil pattern
    /// the motor was held in.
    pub held_patterns: Vec<[bool; NUM_STEPPER_LINES]>,

    /// Every servo pulse width issued, in order.
    pub servo_pulses_us: Vec<u32>,

    /// Sum of all requested delays.
    pub total_delay_us: u64,

    real_time: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimOutput {
    /// Create a new simulated output which does not sleep on delays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new simulated output which sleeps for every delay, matching the timing of the real
    /// hardware.
    pub fn real_time() -> Self {
        Self {
            real_time: true,
            ..Self::default()
        }
    }

    /// Returns true if any stepper line is currently energised.
    pub fn is_energised(&self) -> bool {
        self.lines.iter().any(|l| *l)
    }

    /// The last servo pulse issued, if any.
    pub fn last_servo_pulse_us(&self) -> Option<u32> {
        self.servo_pulses_us.last().copied()
    }
}

impl HwOutput for SimOutput {
    fn set_line(&mut self, line: usize, high: bool) -> Result<(), HwError> {
        match self.lines.get_mut(line) {
            Some(l) => {
                *l = high;
                Ok(())
            },
            None => Err(HwError::InvalidLine(line))
        }
    }

    fn set_servo_pulse(&mut self, pulse_us: u32) -> Result<(), HwError> {
        self.servo_pulses_us.push(pulse_us);
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        self.held_patterns.push(self.lines);
        self.total_delay_us += us as u64;

        if self.real_time {
            thread::sleep(Duration::from_micros(us as u64));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sim_output() {
        let mut out = SimOutput::new();

        out.set_line(0, true).unwrap();
        out.set_line(3, true).unwrap();
        assert!(matches!(out.set_line(NUM_STEPPER_LINES, true), Err(HwError::InvalidLine(4))));
        assert!(out.is_energised());

        out.delay_us(250);
        out.delay_us(250);
        assert_eq!(out.total_delay_us, 500);
        assert_eq!(out.held_patterns, vec![[true, false, false, true]; 2]);

        out.set_servo_pulse(1500).unwrap();
        assert_eq!(out.last_servo_pulse_us(), Some(1500));
    }
}
