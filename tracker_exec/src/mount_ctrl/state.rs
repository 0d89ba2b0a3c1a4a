//! Implementations for the MountCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{
    de_energise, drive_steps, Direction, MountParams, MountState, StateIoError, MAX_TILT_DEG,
    MIN_TILT_DEG,
};
use crate::hw_output::{HwError, HwOutput};
use util::{
    archive::Archiver,
    maths::{clamp, get_ang_dist_360, lin_map, wrap_360},
    session,
    time::millis_to_micros,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mount control module state.
///
/// There shall be one `MountCtrl` per process, it is the single owner of both the hardware
/// output and the state file.
pub struct MountCtrl<O: HwOutput> {
    pub(crate) params: MountParams,

    pub(crate) state: MountState,

    output: O,

    arch_moves: Archiver,
}

/// Archived record of a single axis move.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoveRecord {
    /// Session time at the end of the move.
    pub time_s: f64,

    /// Axis that was moved, `pan` or `tilt`.
    pub axis: &'static str,

    pub from_deg: f64,

    pub to_deg: f64,

    /// Signed number of stepper steps issued (pan only).
    pub steps: i32,

    /// Servo pulse width issued (tilt only).
    pub pulse_us: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<O: HwOutput> MountCtrl<O> {
    /// Create a new controller in the default orientation (pan 0, tilt 90).
    ///
    /// No output is issued, call [`MountCtrl::load_state`] to restore the orientation from the
    /// previous run.
    pub fn new(params: MountParams, output: O) -> Self {
        Self {
            params,
            state: MountState::default(),
            output,
            arch_moves: Archiver::default(),
        }
    }

    /// Archive every move made by this controller.
    pub fn with_archiver(mut self, archiver: Archiver) -> Self {
        self.arch_moves = archiver;
        self
    }

    /// Current pan angle in `[0, 360)`.
    ///
    /// Units: degrees
    pub fn current_pan(&self) -> f64 {
        self.state.pan_deg
    }

    /// Current tilt angle in `[0, 180]`.
    ///
    /// Units: degrees
    pub fn current_tilt(&self) -> f64 {
        self.state.tilt_deg
    }

    /// Copy of the recorded orientation.
    pub fn state(&self) -> MountState {
        self.state
    }

    /// Parameters the controller was created with.
    pub fn params(&self) -> &MountParams {
        &self.params
    }

    /// The hardware output the mount is driven through.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutable access to the hardware output, for writes the controller does not make itself
    /// (e.g. settle delays).
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Load the orientation from the state file.
    ///
    /// If the file cannot be read the default orientation (pan 0, tilt 90) is used instead. The
    /// loaded values are taken as they are, without range checking.
    pub fn load_state(&mut self) {
        match MountState::read_from(&self.params.state_file_path) {
            Ok(s) => {
                self.state = s;
                info!(
                    "Loaded: Pan={}°, Tilt={}°", 
                    self.state.pan_deg, 
                    self.state.tilt_deg
                );
            },
            Err(e) => {
                self.state = MountState::default();
                info!(
                    "No saved state ({}), using defaults (Pan={}°, Tilt={}°)", 
                    e, 
                    self.state.pan_deg, 
                    self.state.tilt_deg
                );
            }
        }
    }

    /// Save the orientation to the state file.
    ///
    /// Persistence is advisory: callers should report a failure and carry on.
    pub fn save_state(&self) -> Result<(), StateIoError> {
        self.state.write_to(&self.params.state_file_path)?;

        info!("Saved: Pan={}°, Tilt={}°", self.state.pan_deg, self.state.tilt_deg);

        Ok(())
    }

    /// Rotate the pan axis by a signed number of steps, positive is clockwise.
    ///
    /// The pan angle is updated by the angle those steps represent once the move is complete.
    pub fn move_by_relative_steps(&mut self, steps: i32) -> Result<(), HwError> {
        if steps == 0 {
            return Ok(())
        }

        let from_deg = self.state.pan_deg;

        self.step(steps)?;

        let angle_change_deg = steps as f64 / self.params.steps_per_rev as f64 * 360.0;
        self.state.pan_deg = wrap_360(self.state.pan_deg + angle_change_deg);

        debug!(
            "Pan: moved {} steps ({}°), now at {}°", 
            steps, 
            angle_change_deg, 
            self.state.pan_deg
        );

        self.archive_pan(from_deg, steps);

        Ok(())
    }

    /// Rotate the pan axis to an absolute angle, taking the shortest way round.
    ///
    /// The angle difference is converted to steps by truncating towards zero. If that gives zero
    /// steps nothing moves. Otherwise the pan angle is set to exactly the (wrapped) target, the
    /// truncated remainder is not tracked.
    ///
    /// A non-finite target is ignored.
    ///
    /// Returns the signed number of steps issued.
    pub fn move_to_absolute_angle(&mut self, target_deg: f64) -> Result<i32, HwError> {
        if !target_deg.is_finite() {
            warn!("Pan: ignoring non-finite target {}°", target_deg);
            return Ok(0)
        }

        let target_deg = wrap_360(target_deg);
        self.state.pan_deg = wrap_360(self.state.pan_deg);

        let diff_deg = get_ang_dist_360(self.state.pan_deg, target_deg);
        let steps = self.angle_to_steps(diff_deg);

        if steps != 0 {
            info!(
                "Pan: {}° -> {}° ({}°, {} steps)", 
                self.state.pan_deg, 
                target_deg, 
                diff_deg, 
                steps
            );

            let from_deg = self.state.pan_deg;

            self.step(steps)?;
            self.state.pan_deg = target_deg;

            self.archive_pan(from_deg, steps);
        }
        else {
            debug!("Pan: already at {}° (target {}°)", self.state.pan_deg, target_deg);
        }

        Ok(steps)
    }

    /// Set the tilt servo angle, clamped into `[0, 180]`.
    ///
    /// A non-finite angle cannot be clamped, it is ignored and the servo keeps its current
    /// position.
    ///
    /// Returns the pulse width for the servo's position after the call.
    pub fn set_tilt_angle(&mut self, angle_deg: f64) -> Result<u32, HwError> {
        if !angle_deg.is_finite() {
            warn!("Servo: ignoring non-finite angle {}°", angle_deg);
            return Ok(self.tilt_to_pulse_us(self.state.tilt_deg))
        }

        let angle_deg = clamp(&angle_deg, &MIN_TILT_DEG, &MAX_TILT_DEG);
        let pulse_us = self.tilt_to_pulse_us(angle_deg);

        self.output.set_servo_pulse(pulse_us)?;

        let from_deg = self.state.tilt_deg;
        self.state.tilt_deg = angle_deg;

        info!("Servo: {}° (Pulse: {})", angle_deg, pulse_us);

        self.archive(MoveRecord {
            time_s: session::get_elapsed_seconds(),
            axis: "tilt",
            from_deg,
            to_deg: angle_deg,
            steps: 0,
            pulse_us,
        });

        Ok(pulse_us)
    }

    /// Define the current physical pan position as 0 degrees, without moving.
    ///
    /// This is the only way to bring the recorded pan angle back in line with the physical mount
    /// after they have diverged.
    pub fn zero_pan(&mut self) {
        info!("Zeroing pan: current physical position ({}° recorded) is now 0°", self.state.pan_deg);
        self.state.pan_deg = 0.0;
    }

    /// Block for a number of milliseconds, e.g. to let the mount settle.
    pub fn hold_ms(&mut self, ms: u32) {
        self.output.delay_us(millis_to_micros(ms));
    }

    /// De-energise the stepper coils. The recorded orientation is unchanged.
    pub fn shutdown(&mut self) -> Result<(), HwError> {
        debug!("De-energising stepper");
        de_energise(&mut self.output)
    }

    /// Convert an angle difference into a signed step count, truncating towards zero.
    pub fn angle_to_steps(&self, diff_deg: f64) -> i32 {
        (diff_deg / 360.0 * self.params.steps_per_rev as f64) as i32
    }

    /// Servo pulse width for a tilt angle in `[0, 180]`, truncated to whole microseconds.
    pub fn tilt_to_pulse_us(&self, angle_deg: f64) -> u32 {
        let offset_us = lin_map(
            (MIN_TILT_DEG, MAX_TILT_DEG),
            (0.0, self.params.servo_pulse_range_us as f64),
            angle_deg
        );

        self.params.servo_base_pulse_us + offset_us as u32
    }

    /// Issue a signed number of steps to the stepper, honouring the inversion parameter.
    fn step(&mut self, steps: i32) -> Result<(), HwError> {
        let mut direction = Direction::from_steps(steps);

        if self.params.invert_stepper {
            direction = direction.reversed();
        }

        drive_steps(
            &mut self.output,
            steps.unsigned_abs(),
            direction,
            millis_to_micros(self.params.step_delay_ms)
        )
    }

    fn archive_pan(&mut self, from_deg: f64, steps: i32) {
        self.archive(MoveRecord {
            time_s: session::get_elapsed_seconds(),
            axis: "pan",
            from_deg,
            to_deg: self.state.pan_deg,
            steps,
            pulse_us: 0,
        });
    }

    fn archive(&mut self, record: MoveRecord) {
        if !self.arch_moves.is_open() {
            return
        }

        if let Err(e) = self.arch_moves.serialise(record) {
            warn!("Could not archive {} move: {}", record.axis, e);
        }
    }
}
