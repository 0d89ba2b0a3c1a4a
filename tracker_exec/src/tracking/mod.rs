//! Tracking module
//!
//! Single-shot point-and-hold tracking: restore the mount orientation, work out where the target
//! is, point the mount at it and persist the result.
//!
//! # Preconditions
//!
//! The pan axis must physically be at the orientation recorded in the state file, normally its
//! zero (north) position as set by the operator in the calibration console. Nothing checks this.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use serde::Serialize;

// Internal
pub use params::*;
use crate::{
    geodesy::{compute_look_angles, GeoPosition, LookAngles},
    hw_output::{HwError, HwOutput},
    mount_ctrl::{MountCtrl, MAX_TILT_DEG, MIN_TILT_DEG},
};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tilt angle at which the camera looks at the horizon.
///
/// Units: degrees
pub const HORIZON_TILT_DEG: f64 = 180.0;

/// Time given to the mount to settle after preparing for tracking.
///
/// Units: milliseconds
pub const SETTLE_DELAY_MS: u32 = 2000;

/// Time the mount holds its final orientation before the workflow ends.
///
/// Units: milliseconds
pub const HOLD_DELAY_MS: u32 = 5000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Result of the target computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackingSolution {
    pub observer: GeoPosition,

    pub target: GeoPosition,

    pub look: LookAngles,

    /// Pan angle to point at the target.
    ///
    /// Units: degrees
    pub pan_target_deg: f64,

    /// Tilt servo angle to point at the target.
    ///
    /// Units: degrees
    pub tilt_target_deg: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an elevation above the horizon into a tilt servo angle.
///
/// The servo sits at 180 for the horizon and 90 for zenith. The elevation is clamped to
/// `[-90, 90]` and the result to `[0, 180]`, so targets below the horizon give 180.
pub fn elevation_to_tilt(elevation_deg: f64) -> f64 {
    let elevation_deg = clamp(&elevation_deg, &-90.0, &90.0);

    clamp(&(HORIZON_TILT_DEG - elevation_deg), &MIN_TILT_DEG, &MAX_TILT_DEG)
}

/// Work out the pan and tilt angles which point at the configured target.
pub fn compute_targets(config: &TrackingConfig) -> TrackingSolution {
    let observer = config.observer();
    let target = config.target();

    let look = compute_look_angles(&observer, &target);

    let solution = TrackingSolution {
        observer,
        target,
        look,
        pan_target_deg: look.azimuth_deg,
        tilt_target_deg: elevation_to_tilt(look.elevation_deg),
    };

    info!("Target analysis:");
    info!("    Azimuth: {}° (North=0, East=90, South=180, West=270)", look.azimuth_deg);
    info!("    Distance: {} m", look.horizontal_dist_m);
    info!("    Elevation: {}° (0=Horizon, 90=Zenith)", look.elevation_deg);
    info!("    Pan target: {}°", solution.pan_target_deg);
    info!("    Tilt target: {}° (180=Flat, 90=Up)", solution.tilt_target_deg);

    solution
}

/// Put the tilt axis at the horizon ready for tracking.
///
/// The pan axis is assumed to already be at its zero reference.
pub fn prepare_for_tracking<O: HwOutput>(ctrl: &mut MountCtrl<O>) -> Result<(), HwError> {
    info!("Preparing for tracking (pan should be at north/0°), tilting to horizon");

    ctrl.set_tilt_angle(HORIZON_TILT_DEG)?;

    Ok(())
}

/// Move both axes to a computed solution, pan first.
pub fn point_at<O: HwOutput>(
    ctrl: &mut MountCtrl<O>, 
    solution: &TrackingSolution
) -> Result<(), HwError> {
    ctrl.move_to_absolute_angle(solution.pan_target_deg)?;
    ctrl.set_tilt_angle(solution.tilt_target_deg)?;

    Ok(())
}

/// Run the tracking workflow once.
///
/// 1. Load the persisted orientation
/// 2. Tilt to the horizon and let the mount settle
/// 3. Unless in default mode, compute the target angles, point at them and save the state
/// 4. Hold the final orientation
///
/// Returns the solution that was pointed at, or `None` in default mode. Failing to save the state
/// is reported but does not stop the workflow.
pub fn track<O: HwOutput>(
    ctrl: &mut MountCtrl<O>, 
    config: &TrackingConfig
) -> Result<Option<TrackingSolution>, HwError> {
    ctrl.load_state();

    prepare_for_tracking(ctrl)?;
    ctrl.hold_ms(SETTLE_DELAY_MS);

    if config.default_mode {
        info!("Default mode active, holding the default orientation");
        ctrl.hold_ms(HOLD_DELAY_MS);
        return Ok(None)
    }

    let solution = compute_targets(config);

    info!("Tracking target");
    point_at(ctrl, &solution)?;
    info!("Tracking complete, pointing at target");

    if let Err(e) = ctrl.save_state() {
        warn!("Could not save the mount state: {}", e);
    }

    ctrl.hold_ms(HOLD_DELAY_MS);

    Ok(Some(solution))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geodesy::horizontal_distance_m,
        hw_output::SimOutput, 
        mount_ctrl::{MountParams, MountState}
    };
    use std::path::PathBuf;

    const SETTLE_AND_HOLD_US: u64 = (SETTLE_DELAY_MS as u64 + HOLD_DELAY_MS as u64) * 1000;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tracking_{}_{}", std::process::id(), name))
    }

    fn ctrl(state_file: &str) -> MountCtrl<SimOutput> {
        let params = MountParams {
            state_file_path: temp_path(state_file),
            ..MountParams::default()
        };
        MountCtrl::new(params, SimOutput::new())
    }

    #[test]
    fn test_elevation_to_tilt() {
        assert_eq!(elevation_to_tilt(0.0), 180.0);
        assert_eq!(elevation_to_tilt(90.0), 90.0);
        assert_eq!(elevation_to_tilt(45.0), 135.0);
        assert_eq!(elevation_to_tilt(-30.0), 180.0);
        assert_eq!(elevation_to_tilt(120.0), 90.0);
    }

    #[test]
    fn test_target_directly_above() {
        let config = TrackingConfig {
            tgt_alt: 100.0,
            ..TrackingConfig::default()
        };

        let solution = compute_targets(&config);
        assert!(solution.pan_target_deg.is_finite());
        assert!((solution.look.elevation_deg - 90.0).abs() < 1e-9);
        assert!((solution.tilt_target_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_config_still_computes() {
        let solution = compute_targets(&TrackingConfig::default());

        assert_eq!(solution.pan_target_deg, 0.0);
        assert_eq!(solution.look.elevation_deg, 0.0);
        assert_eq!(solution.tilt_target_deg, 180.0);
    }

    #[test]
    fn test_track() {
        let name = "track.txt";
        std::fs::remove_file(temp_path(name)).ok();

        // Target due east, as high above the horizon as it is far away
        let dist_m = horizontal_distance_m(
            &GeoPosition::new(0.0, 0.0, 0.0), 
            &GeoPosition::new(0.0, 1.0, 0.0)
        );
        let config = TrackingConfig {
            tgt_lon: 1.0,
            tgt_alt: dist_m,
            ..TrackingConfig::default()
        };

        let mut c = ctrl(name);
        let solution = track(&mut c, &config).unwrap().unwrap();

        assert!((solution.pan_target_deg - 90.0).abs() < 1e-9);
        assert!((solution.tilt_target_deg - 135.0).abs() < 1e-9);

        assert_eq!(c.current_pan(), solution.pan_target_deg);
        assert_eq!(c.current_tilt(), solution.tilt_target_deg);

        // Horizon first, then the target
        assert_eq!(c.output().servo_pulses_us.len(), 2);
        assert_eq!(c.output().servo_pulses_us[0], 2500);

        // 135 steps of 8 phases at 4 ms, plus the settle and hold
        assert_eq!(c.output().held_patterns.len(), 135 * 8);
        assert_eq!(c.output().total_delay_us, 135 * 8 * 4000 + SETTLE_AND_HOLD_US);

        // The result was persisted
        let saved = MountState::read_from(temp_path(name)).unwrap();
        assert_eq!(saved, c.state());

        std::fs::remove_file(temp_path(name)).ok();
    }

    #[test]
    fn test_track_from_saved_state() {
        let name = "track_saved.txt";
        std::fs::write(temp_path(name), "90 120").unwrap();

        let config = TrackingConfig {
            tgt_lon: 1.0,
            ..TrackingConfig::default()
        };

        let mut c = ctrl(name);
        track(&mut c, &config).unwrap().unwrap();

        // Already pointing east, so the pan axis does not move
        assert!(c.output().held_patterns.is_empty());
        assert_eq!(c.current_tilt(), 180.0);

        std::fs::remove_file(temp_path(name)).ok();
    }

    #[test]
    fn test_track_default_mode() {
        let name = "track_default.txt";
        std::fs::write(temp_path(name), "45 100").unwrap();

        let config = TrackingConfig {
            tgt_lon: 1.0,
            tgt_alt: 1000.0,
            default_mode: true,
            ..TrackingConfig::default()
        };

        let mut c = ctrl(name);
        assert!(track(&mut c, &config).unwrap().is_none());

        assert_eq!(c.current_pan(), 45.0);
        assert_eq!(c.current_tilt(), HORIZON_TILT_DEG);
        assert!(c.output().held_patterns.is_empty());
        assert_eq!(c.output().servo_pulses_us, vec![2500]);
        assert_eq!(c.output().total_delay_us, SETTLE_AND_HOLD_US);

        // Nothing is saved until the executable exits
        assert_eq!(std::fs::read_to_string(temp_path(name)).unwrap(), "45 100");

        std::fs::remove_file(temp_path(name)).ok();
    }
}
