//! # Tracker Executable
//!
//! Points the pan-tilt camera mount at a fixed target and holds it there.
//!
//! # Architecture
//!
//! The execution is a single pass:
//!
//!     - Initialise session, logging, parameters and hardware
//!     - Load the persisted mount orientation
//!     - Tilt to the horizon (pan is assumed to be at north)
//!     - Compute azimuth/elevation to the target and move both axes there
//!     - Persist the orientation, de-energise the stepper and exit
//!
//! The mount is left pointing at the target. Use the `calibrate` executable to return it to north.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::{error, info, warn};

// Internal
use tracker_lib::{
    hw_output,
    mount_ctrl::{MountCtrl, MountParams},
    tracking::{self, TrackingConfig},
    MOUNT_PARAMS_FILE, TRACKING_PARAMS_FILE,
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter, LogLevels},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("tracker_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LogLevels { console: LevelFilter::Info, file: LevelFilter::Debug }, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Pan-Tilt Target Tracker\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let mount_params = MountParams::load_or_default(MOUNT_PARAMS_FILE)
        .wrap_err("Could not load the mount parameters")?;

    // A missing configuration is not fatal, the mount will point at whatever the all zero
    // configuration works out to.
    let config: TrackingConfig = match TrackingConfig::load(TRACKING_PARAMS_FILE) {
        Ok(c) => c,
        Err(e) => {
            error!("Could not load the tracking configuration: {}", e);
            TrackingConfig::default()
        }
    };

    info!("Loaded config:");
    info!("    My position: {}, {}, {} m", config.my_lat, config.my_lon, config.my_alt);
    info!("    Target: {}, {}, {} m", config.tgt_lat, config.tgt_lon, config.tgt_alt);

    // ---- HARDWARE INITIALISATION ----

    let output = hw_output::init_platform_output(
        mount_params.stepper_pins, 
        mount_params.servo_pin
    ).wrap_err("Failed to initialise the hardware")?;

    let archiver = match Archiver::from_path(&session, "moves.csv") {
        Ok(a) => a,
        Err(e) => {
            warn!("Moves will not be archived: {}", e);
            Archiver::default()
        }
    };

    let mut mount_ctrl = MountCtrl::new(mount_params, output).with_archiver(archiver);

    info!("Servo configuration:");
    info!("    180° = Horizon (flat)");
    info!("    90°  = Up (zenith)");

    info!("Initialisation complete\n");

    // ---- TRACKING ----

    let track_result = tracking::track(&mut mount_ctrl, &config);

    // Leave the coils de-energised whatever happened
    if let Err(e) = mount_ctrl.shutdown() {
        error!("Could not de-energise the stepper: {}", e);
    }

    if let Some(solution) = track_result.wrap_err("Hardware fault while tracking")? {
        if let Err(e) = session.save_json("tracking_solution.json", &solution) {
            warn!("Could not save the tracking solution: {}", e);
        }
    }

    info!("Stopping at target position, run calibrate -> reset to return to north");

    if let Err(e) = mount_ctrl.save_state() {
        error!("Could not save the final mount state: {}", e);
    }

    Ok(())
}
