//! Host platform (linux for example) utility functions

use std::{env, path::PathBuf};
use uname;

/// Name of the environment variable pointing at the root of the software tree.
pub const SW_ROOT_ENV_VAR: &str = "TRACKER_SW_ROOT";

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

/// Get the root directory of the tracker software.
///
/// This is read from the `TRACKER_SW_ROOT` environment variable.
pub fn get_tracker_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Get the root directory of the tracker software, falling back to the current
/// working directory if `TRACKER_SW_ROOT` is not set.
pub fn get_tracker_sw_root_or_cwd() -> PathBuf {
    match get_tracker_sw_root() {
        Ok(p) => p,
        Err(_) => env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
