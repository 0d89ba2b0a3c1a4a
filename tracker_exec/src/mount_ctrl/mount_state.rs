//! The mount orientation record and its state file format.
//!
//! The state file is plain text holding the pan and tilt angles separated by whitespace, e.g.
//! `123.5 180`. There is no header or versioning.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{fs, path::Path};

use serde::Serialize;
use util::maths::{clamp, wrap_360};

use super::{StateIoError, DEFAULT_PAN_DEG, DEFAULT_TILT_DEG, MAX_TILT_DEG, MIN_TILT_DEG};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Orientation of the mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MountState {
    /// Pan (azimuth) angle in `[0, 360)`, relative to the calibrated zero position.
    ///
    /// Units: degrees
    pub pan_deg: f64,

    /// Tilt servo angle in `[0, 180]`, 180 is the horizon and 90 is zenith.
    ///
    /// Units: degrees
    pub tilt_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MountState {
    fn default() -> Self {
        Self {
            pan_deg: DEFAULT_PAN_DEG,
            tilt_deg: DEFAULT_TILT_DEG,
        }
    }
}

impl MountState {
    /// Wrap the pan angle into `[0, 360)` and clamp the tilt angle into `[0, 180]`.
    pub fn normalise(&mut self) {
        self.pan_deg = wrap_360(self.pan_deg);
        self.tilt_deg = clamp(&self.tilt_deg, &MIN_TILT_DEG, &MAX_TILT_DEG);
    }

    /// Read the state from a state file.
    ///
    /// The first two whitespace separated numbers in the file are taken as the pan and tilt
    /// angles, anything after them is ignored. The values are returned as read, without range
    /// checking, but non-finite values (`inf`, `NaN`) are malformed.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, StateIoError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| StateIoError::Io(path.to_path_buf(), e))?;

        let mut values = contents
            .split_whitespace()
            .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()));

        match (values.next(), values.next()) {
            (Some(Some(pan_deg)), Some(Some(tilt_deg))) => Ok(Self { pan_deg, tilt_deg }),
            _ => Err(StateIoError::Malformed(path.to_path_buf()))
        }
    }

    /// Write the state to a state file, replacing any previous contents.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), StateIoError> {
        let path = path.as_ref();

        fs::write(path, format!("{} {}", self.pan_deg, self.tilt_deg))
            .map_err(|e| StateIoError::Io(path.to_path_buf(), e))
    }
}
