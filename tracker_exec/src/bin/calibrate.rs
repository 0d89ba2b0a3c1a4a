//! # Calibration Console
//!
//! Interactive console for moving the mount by hand, setting its zero (north) position and
//! returning it to north after tracking. Type `help` for the list of commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::{error, info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};

use tracker_lib::{
    calib::{self, CalCmd, CalFlow},
    hw_output,
    mount_ctrl::{MountCtrl, MountParams},
    MOUNT_PARAMS_FILE,
};
use util::{
    host,
    logger::{logger_init, LevelFilter, LogLevels},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "calibrate > ";
const HISTORY_FILE: &str = "calibrate_history.txt";

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    let session = Session::new("calibrate", "sessions")
        .wrap_err("Failed to create the session")?;

    logger_init(LogLevels { console: LevelFilter::Info, file: LevelFilter::Debug }, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Pan-Tilt Calibration\n");
    info!("Session directory: {:?}\n", session.session_root);

    let mount_params = MountParams::load_or_default(MOUNT_PARAMS_FILE)
        .wrap_err("Could not load the mount parameters")?;

    let output = hw_output::init_platform_output(
        mount_params.stepper_pins, 
        mount_params.servo_pin
    ).wrap_err("Failed to initialise the hardware")?;

    let mut mount_ctrl = MountCtrl::new(mount_params, output);
    mount_ctrl.load_state();

    // ---- CONSOLE ----

    let history_path = host::get_tracker_sw_root_or_cwd().join(HISTORY_FILE);

    let mut rl = DefaultEditor::new().wrap_err("Failed to create the line editor")?;
    if rl.load_history(&history_path).is_err() {
        info!("No history detected");
    }

    calib::apply(&mut mount_ctrl, &CalCmd::Status)
        .wrap_err("Failed to show the mount status")?;

    loop {
        let cmd = match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue
                }

                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    warn!("Could not add history entry: {}", e);
                }

                match CalCmd::parse_line(&line) {
                    Ok(c) => c,
                    Err(e) => {
                        // Includes help, which clap reports as an error
                        println!("{}", e.message);
                        continue
                    }
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => CalCmd::Quit,
            Err(e) => {
                error!("Unhandled console error: {}", e);
                CalCmd::Quit
            }
        };

        match calib::apply(&mut mount_ctrl, &cmd) {
            Ok(CalFlow::Continue) => (),
            Ok(CalFlow::Quit) => break,
            Err(e) => error!("Command failed: {}", e),
        }
    }

    // ---- SHUTDOWN ----

    if let Err(e) = rl.save_history(&history_path) {
        warn!("Could not save console history: {}", e);
    }

    mount_ctrl.shutdown().wrap_err("Could not de-energise the stepper")?;

    Ok(())
}
