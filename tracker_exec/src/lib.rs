//! # Tracker library.
//!
//! This library allows the tracker executables (and the benchmarks) to access the items defined
//! inside the tracker crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Calibration console commands - operator control of the mount
pub mod calib;

/// Geodesic calculator - azimuth and elevation between two geographic positions
pub mod geodesy;

/// Hardware output - stepper coil lines, servo PWM and delays
pub mod hw_output;

/// Mount control - owns and persists the pan/tilt orientation and drives both axes
pub mod mount_ctrl;

/// Tracking - the point-and-hold workflow
pub mod tracking;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the mount parameter file.
pub const MOUNT_PARAMS_FILE: &str = "mount.toml";

/// Name of the tracking configuration file.
pub const TRACKING_PARAMS_FILE: &str = "tracker_exec.toml";
