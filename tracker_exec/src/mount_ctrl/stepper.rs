//! Half-step commutation of the pan stepper.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::hw_output::{HwError, HwOutput, NUM_STEPPER_LINES};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of coil patterns in one pass through the half-step sequence.
pub const NUM_HALF_STEP_PHASES: usize = 8;

/// 28BYJ-48 half-step sequence. Walking the table forwards turns the motor clockwise, backwards
/// turns it counter-clockwise.
pub const HALF_STEP_SEQ: [[bool; NUM_STEPPER_LINES]; NUM_HALF_STEP_PHASES] = [
    [true,  false, false, false],
    [true,  true,  false, false],
    [false, true,  false, false],
    [false, true,  true,  false],
    [false, false, true,  false],
    [false, false, true,  true ],
    [false, false, false, true ],
    [true,  false, false, true ],
];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction of rotation of the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Direction {
    /// Direction for a signed step count, positive is clockwise.
    pub fn from_steps(steps: i32) -> Self {
        if steps > 0 {
            Direction::Clockwise
        }
        else {
            Direction::CounterClockwise
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Index into [`HALF_STEP_SEQ`] of the `phase`th pattern in this direction.
    pub fn seq_index(self, phase: usize) -> usize {
        match self {
            Direction::Clockwise => phase,
            Direction::CounterClockwise => NUM_HALF_STEP_PHASES - 1 - phase,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Drive the stepper through `num_steps` passes of the half-step sequence.
///
/// Each coil pattern is held for `phase_delay_us` before the next is written. The coils are
/// de-energised once all steps are complete.
pub fn drive_steps<O: HwOutput>(
    output: &mut O,
    num_steps: u32,
    direction: Direction,
    phase_delay_us: u32,
) -> Result<(), HwError> {
    for _ in 0..num_steps {
        for phase in 0..NUM_HALF_STEP_PHASES {
            let pattern = &HALF_STEP_SEQ[direction.seq_index(phase)];

            for (line, high) in pattern.iter().enumerate() {
                output.set_line(line, *high)?;
            }

            output.delay_us(phase_delay_us);
        }
    }

    de_energise(output)
}

/// Write all stepper lines low so the motor draws no holding current.
pub fn de_energise<O: HwOutput>(output: &mut O) -> Result<(), HwError> {
    for line in 0..NUM_STEPPER_LINES {
        output.set_line(line, false)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hw_output::SimOutput;

    #[test]
    fn test_sequence_shape() {
        // Every pattern energises one or two adjacent coils
        for (i, pattern) in HALF_STEP_SEQ.iter().enumerate() {
            let n = pattern.iter().filter(|l| **l).count();
            assert_eq!(n, if i % 2 == 0 { 1 } else { 2 });
        }
    }

    #[test]
    fn test_drive_clockwise() {
        let mut out = SimOutput::new();
        drive_steps(&mut out, 2, Direction::Clockwise, 4000).unwrap();

        assert_eq!(out.held_patterns.len(), 16);
        assert_eq!(&out.held_patterns[..8], &HALF_STEP_SEQ[..]);
        assert_eq!(&out.held_patterns[8..], &HALF_STEP_SEQ[..]);
        assert_eq!(out.total_delay_us, 16 * 4000);
        assert!(!out.is_energised());
    }

    #[test]
    fn test_drive_counter_clockwise() {
        let mut out = SimOutput::new();
        drive_steps(&mut out, 1, Direction::CounterClockwise, 10).unwrap();

        let mut reversed = HALF_STEP_SEQ.to_vec();
        reversed.reverse();
        assert_eq!(out.held_patterns, reversed);
        assert!(!out.is_energised());
    }

    #[test]
    fn test_drive_zero_steps() {
        let mut out = SimOutput::new();
        drive_steps(&mut out, 0, Direction::Clockwise, 10).unwrap();

        assert!(out.held_patterns.is_empty());
        assert_eq!(out.total_delay_us, 0);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::from_steps(5), Direction::Clockwise);
        assert_eq!(Direction::from_steps(-5), Direction::CounterClockwise);
        assert_eq!(Direction::Clockwise.reversed(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.seq_index(0), 7);
        assert_eq!(Direction::Clockwise.seq_index(0), 0);
    }
}
