//! # Calibration console commands
//!
//! Commands the operator can issue to the mount from the `calibrate` executable. Each line typed
//! into the console is parsed into a [`CalCmd`] and applied to the mount controller.
//!
//! The `zero` command is the only way of telling the software where north physically is: the
//! operator turns the mount to north by hand (or with `steps`) and then zeroes it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use structopt::{clap::AppSettings, StructOpt};

use crate::{
    hw_output::{HwError, HwOutput},
    mount_ctrl::MountCtrl,
    tracking::HORIZON_TILT_DEG,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A calibration console command.
#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(name = "calibrate", no_version)]
pub enum CalCmd {
    /// Move the pan axis by a number of steps, positive is clockwise
    #[structopt(name = "steps", alias = "s", setting = AppSettings::AllowNegativeNumbers)]
    Steps {
        steps: i32
    },

    /// Move the pan axis to an angle (0-360) the shortest way round
    #[structopt(name = "goto", alias = "g", setting = AppSettings::AllowNegativeNumbers)]
    Goto {
        angle_deg: f64
    },

    /// Set the tilt servo angle (0-180, 180 is flat, 90 is up)
    #[structopt(name = "tilt", alias = "v", setting = AppSettings::AllowNegativeNumbers)]
    Tilt {
        angle_deg: f64
    },

    /// Return to pan 0 and tilt flat, then save
    #[structopt(name = "reset", alias = "r")]
    Reset,

    /// Define the current physical pan position as 0 (north), then save
    #[structopt(name = "zero", alias = "z")]
    Zero,

    /// Show the current angles
    #[structopt(name = "status", alias = "p")]
    Status,

    /// Save and quit
    #[structopt(name = "quit", alias = "q")]
    Quit,
}

/// What the console should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalFlow {
    Continue,
    Quit,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CalCmd {
    /// Parse a line typed into the console.
    pub fn parse_line(line: &str) -> Result<Self, structopt::clap::Error> {
        Self::from_iter_safe(std::iter::once("calibrate").chain(line.split_whitespace()))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Apply a command to the mount.
pub fn apply<O: HwOutput>(ctrl: &mut MountCtrl<O>, cmd: &CalCmd) -> Result<CalFlow, HwError> {
    match cmd {
        CalCmd::Steps { steps } => {
            info!("Moving {} steps...", steps);
            ctrl.move_by_relative_steps(*steps)?;
        },
        CalCmd::Goto { angle_deg } => {
            info!("Moving to {}°...", angle_deg);
            ctrl.move_to_absolute_angle(*angle_deg)?;
        },
        CalCmd::Tilt { angle_deg } => {
            info!("Setting tilt to {}°...", angle_deg);
            ctrl.set_tilt_angle(*angle_deg)?;
        },
        CalCmd::Reset => {
            info!("Returning to 0° (north) from {}°, tilt flat", ctrl.current_pan());
            ctrl.move_to_absolute_angle(0.0)?;
            ctrl.set_tilt_angle(HORIZON_TILT_DEG)?;
            save_or_warn(ctrl);
        },
        CalCmd::Zero => {
            ctrl.zero_pan();
            save_or_warn(ctrl);
        },
        CalCmd::Status => {
            info!("Pan (azimuth) angle: {}°", ctrl.current_pan());
            info!("Tilt angle:          {}°", ctrl.current_tilt());
        },
        CalCmd::Quit => {
            info!("Saving state and exiting...");
            save_or_warn(ctrl);
            return Ok(CalFlow::Quit)
        }
    }

    Ok(CalFlow::Continue)
}

fn save_or_warn<O: HwOutput>(ctrl: &MountCtrl<O>) {
    if let Err(e) = ctrl.save_state() {
        warn!("Could not save the mount state: {}", e);
    }
}
