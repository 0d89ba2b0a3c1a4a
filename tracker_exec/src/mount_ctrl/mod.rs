//! Mount control module
//!
//! Owns the pan/tilt orientation of the mount. Pan is driven by a 28BYJ-48 stepper with no
//! position feedback, tilt by a positional servo. The orientation is only known because every
//! physical move is paired with an update of the recorded state, which is persisted to a state
//! file between runs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mount_state;
mod params;
mod state;
mod stepper;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use mount_state::*;
pub use params::*;
pub use state::*;
pub use stepper::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default pan angle used when no state file can be loaded.
///
/// Units: degrees
pub const DEFAULT_PAN_DEG: f64 = 0.0;

/// Default tilt angle used when no state file can be loaded (zenith).
///
/// Units: degrees
pub const DEFAULT_TILT_DEG: f64 = 90.0;

/// Minimum tilt servo angle.
///
/// Units: degrees
pub const MIN_TILT_DEG: f64 = 0.0;

/// Maximum tilt servo angle (horizon).
///
/// Units: degrees
pub const MAX_TILT_DEG: f64 = 180.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while reading or writing the state file.
#[derive(Debug, thiserror::Error)]
pub enum StateIoError {
    #[error("Could not access the state file {0:?}: {1}")]
    Io(std::path::PathBuf, std::io::Error),

    #[error("The state file {0:?} does not contain two numbers")]
    Malformed(std::path::PathBuf),
}
