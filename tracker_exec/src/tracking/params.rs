//! Tracking configuration
//!
//! The configuration is a flat TOML file of `key = value` lines, for example:
//!
//! ```toml
//! myLat = 51.4700
//! myLon = -0.4543
//! myAlt = 25
//! tgtLat = 51.4900
//! tgtLon = -0.3000
//! tgtAlt = 900
//! defaultMode = false
//! ```
//!
//! Numbers which cannot be read are taken as zero, and `defaultMode` is enabled by any string
//! containing `true`. A file which is not valid TOML (e.g. `tgtLat = 51.49x`) is read line by
//! line instead, so a bad value only affects its own key.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs::read_to_string, path::Path};
use util::params::{self, LoadError};

use crate::geodesy::GeoPosition;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Positions of the tracker and its target.
///
/// Any key missing from the file is zero (or `false`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingConfig {
    /// Latitude of the tracker.
    ///
    /// Units: degrees
    #[serde(deserialize_with = "de_lenient_f64")]
    pub my_lat: f64,

    /// Longitude of the tracker.
    ///
    /// Units: degrees
    #[serde(deserialize_with = "de_lenient_f64")]
    pub my_lon: f64,

    /// Altitude of the tracker.
    ///
    /// Units: meters
    #[serde(deserialize_with = "de_lenient_f64")]
    pub my_alt: f64,

    /// Latitude of the target.
    ///
    /// Units: degrees
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tgt_lat: f64,

    /// Longitude of the target.
    ///
    /// Units: degrees
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tgt_lon: f64,

    /// Altitude of the target.
    ///
    /// Units: meters
    #[serde(deserialize_with = "de_lenient_f64")]
    pub tgt_alt: f64,

    /// Skip target computation and hold the default orientation.
    #[serde(deserialize_with = "de_bool_like")]
    pub default_mode: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrackingConfig {
    /// Find and load the configuration file, searching the usual parameter locations.
    pub fn load(param_file_name: &str) -> Result<Self, LoadError> {
        Self::load_from_path(params::find(param_file_name)?)
    }

    /// Load the configuration from an explicit path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let config_str = read_to_string(path)
            .map_err(LoadError::FileLoadError)?;

        Ok(Self::parse(&config_str))
    }

    /// Parse a configuration, falling back to a line by line read if it is not valid TOML.
    pub fn parse(config_str: &str) -> Self {
        match toml::from_str(config_str) {
            Ok(c) => c,
            Err(e) => {
                warn!("Tracking configuration is not valid TOML ({}), reading it line by line", e);
                Self::parse_lines(config_str)
            }
        }
    }

    /// Read `key = value` lines one at a time. Lines without an `=` and unknown keys are skipped.
    fn parse_lines(config_str: &str) -> Self {
        let mut config = Self::default();

        for line in config_str.lines() {
            let (key, value) = match line.split_once('=') {
                Some(kv) => kv,
                None => continue
            };
            let value = value.trim().trim_matches('"');

            match key.trim() {
                "myLat" => config.my_lat = lenient_f64(value),
                "myLon" => config.my_lon = lenient_f64(value),
                "myAlt" => config.my_alt = lenient_f64(value),
                "tgtLat" => config.tgt_lat = lenient_f64(value),
                "tgtLon" => config.tgt_lon = lenient_f64(value),
                "tgtAlt" => config.tgt_alt = lenient_f64(value),
                "defaultMode" => config.default_mode = value.contains("true"),
                _ => ()
            }
        }

        config
    }

    /// Position of the tracker itself.
    pub fn observer(&self) -> GeoPosition {
        GeoPosition::new(self.my_lat, self.my_lon, self.my_alt)
    }

    /// Position of the target.
    pub fn target(&self) -> GeoPosition {
        GeoPosition::new(self.tgt_lat, self.tgt_lon, self.tgt_alt)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>
{
    Ok(match LenientValue::deserialize(deserializer)? {
        LenientValue::Number(n) => n,
        LenientValue::Text(s) => lenient_f64(&s),
        LenientValue::Bool(_) => 0.0,
    })
}

fn lenient_f64(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn de_bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>
{
    Ok(match LenientValue::deserialize(deserializer)? {
        LenientValue::Bool(b) => b,
        LenientValue::Text(s) => s.contains("true"),
        LenientValue::Number(_) => false,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_full_config() {
        let config: TrackingConfig = toml::from_str(
            "myLat = 51.47\nmyLon = -0.4543\nmyAlt = 25\n\
             tgtLat = 51.49\ntgtLon = -0.3\ntgtAlt = 900.5\ndefaultMode = false\n"
        ).unwrap();

        assert_eq!(config, TrackingConfig {
            my_lat: 51.47,
            my_lon: -0.4543,
            my_alt: 25.0,
            tgt_lat: 51.49,
            tgt_lon: -0.3,
            tgt_alt: 900.5,
            default_mode: false,
        });
        assert_eq!(config.observer(), GeoPosition::new(51.47, -0.4543, 25.0));
        assert_eq!(config.target(), GeoPosition::new(51.49, -0.3, 900.5));
    }

    #[test]
    fn test_missing_keys_default() {
        let config: TrackingConfig = toml::from_str("tgtAlt = 100\n").unwrap();

        assert_eq!(config, TrackingConfig {
            tgt_alt: 100.0,
            ..TrackingConfig::default()
        });
    }

    #[test]
    fn test_malformed_numbers_are_zero() {
        let config: TrackingConfig = toml::from_str(
            "myLat = \"not a number\"\nmyLon = \" 12.5 \"\nmyAlt = true\n"
        ).unwrap();

        assert_eq!(config.my_lat, 0.0);
        assert_eq!(config.my_lon, 12.5);
        assert_eq!(config.my_alt, 0.0);
    }

    #[test]
    fn test_default_mode_strings() {
        let on: TrackingConfig = toml::from_str("defaultMode = \"true # hold\"\n").unwrap();
        assert!(on.default_mode);

        let on: TrackingConfig = toml::from_str("defaultMode = true\n").unwrap();
        assert!(on.default_mode);

        let off: TrackingConfig = toml::from_str("defaultMode = \"yes\"\n").unwrap();
        assert!(!off.default_mode);

        let off: TrackingConfig = toml::from_str("defaultMode = 1\n").unwrap();
        assert!(!off.default_mode);
    }

    #[test]
    fn test_bad_value_only_zeroes_its_key() {
        let config = TrackingConfig::parse(
            "myLat = 51.47\nmyLon = -0.45\ntgtLat = 51.49x\ntgtAlt = 900\n"
        );

        assert_eq!(config, TrackingConfig {
            my_lat: 51.47,
            my_lon: -0.45,
            tgt_alt: 900.0,
            ..TrackingConfig::default()
        });
    }

    #[test]
    fn test_line_by_line_read() {
        let config = TrackingConfig::parse(
            "# tracker site\nmyLat=51.47\nmyLon = \"-0.45\"\nnot a key value line\n\
             someOtherKey = 3\ndefaultMode = yes true\nmyAlt = \n"
        );

        assert_eq!(config, TrackingConfig {
            my_lat: 51.47,
            my_lon: -0.45,
            default_mode: true,
            ..TrackingConfig::default()
        });
    }

    #[test]
    fn test_valid_toml_parse() {
        let config = TrackingConfig::parse("tgtLat = 51.49\ndefaultMode = false\n");

        assert_eq!(config.tgt_lat, 51.49);
        assert!(!config.default_mode);
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir()
            .join(format!("tracking_params_{}.toml", std::process::id()));

        std::fs::write(&path, "myLat = 10.5\ntgtLon = oops\n").unwrap();
        let config = TrackingConfig::load_from_path(&path).unwrap();
        assert_eq!(config.my_lat, 10.5);
        assert_eq!(config.tgt_lon, 0.0);

        std::fs::remove_file(&path).ok();
        assert!(matches!(
            TrackingConfig::load_from_path(&path),
            Err(LoadError::FileLoadError(_))
        ));
    }
}
