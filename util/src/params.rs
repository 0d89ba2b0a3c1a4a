//! Generic parameters functions
//!
//! Parameter files are TOML documents deserialised directly into the
//! parameter struct of the module that needs them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not find the parameter file in any of {0:?}")]
    NotFound(Vec<PathBuf>),

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file is searched for in the following locations, the first one which
/// exists is used:
/// 1. `$TRACKER_SW_ROOT/params/{param_file_name}` (if the variable is set)
/// 2. `./{param_file_name}`
/// 3. `../params/{param_file_name}`
pub fn load<P>(param_file_name: &str) -> Result<P, LoadError> 
where
    P: DeserializeOwned
{
    load_from_path(find(param_file_name)?)
}

/// Find a parameter file, searching the same locations as [`load`].
pub fn find(param_file_name: &str) -> Result<PathBuf, LoadError> {
    let candidates = candidate_paths(param_file_name);

    match candidates.iter().position(|p| p.is_file()) {
        Some(i) => Ok(candidates[i].clone()),
        None => Err(LoadError::NotFound(candidates))
    }
}

/// Load a parameter file from an explicit path.
pub fn load_from_path<P, Q>(path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>
{
    debug!("Loading parameters from {:?}", path.as_ref());

    // Load the file into a string
    let params_str = read_to_string(path)
        .map_err(LoadError::FileLoadError)?;

    // Parse the string into the parameter struct
    toml::from_str(params_str.as_str())
        .map_err(LoadError::DeserialiseError)
}

/// Get the list of locations a parameter file is searched for in, in search
/// order.
pub fn candidate_paths(param_file_name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(mut root) = crate::host::get_tracker_sw_root() {
        root.push("params");
        root.push(param_file_name);
        paths.push(root);
    }

    paths.push(PathBuf::from(".").join(param_file_name));
    paths.push(PathBuf::from("..").join("params").join(param_file_name));

    paths
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestParams {
        a: f64,
        b: String,
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("util_params_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_path() {
        let path = temp_file("ok.toml", "a = 1.5\nb = \"hello\"\n");

        let p: TestParams = load_from_path(&path).unwrap();
        assert_eq!(p, TestParams { a: 1.5, b: String::from("hello") });

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_bad_file() {
        let path = temp_file("bad.toml", "a = \"not a number\"\n");

        let res: Result<TestParams, _> = load_from_path(&path);
        assert!(matches!(res, Err(LoadError::DeserialiseError(_))));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing() {
        let res: Result<TestParams, _> = load("this_params_file_does_not_exist.toml");

        match res {
            Err(LoadError::NotFound(paths)) => assert!(paths.len() >= 2),
            _ => panic!("Expected NotFound")
        }
    }

    #[test]
    fn test_find_in_cwd() {
        let name = format!("util_params_find_{}.toml", std::process::id());
        std::fs::write(&name, "a = 1.0\n").unwrap();

        assert_eq!(find(&name).unwrap(), PathBuf::from(".").join(&name));

        std::fs::remove_file(&name).ok();
        assert!(matches!(find(&name), Err(LoadError::NotFound(_))));
    }
}
