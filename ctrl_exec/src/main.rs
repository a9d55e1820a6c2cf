//! Main control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging, parameters and the scheduler
//!     - Main loop:
//!         - Input acquisition (operator input, mode changes, sensor readings)
//!         - Mode management (disable handling, coast mode)
//!         - Scheduler cycle (triggers, actions, defaults)
//!         - Plant update (the simulation integrates the drivetrain and arm demands)
//!         - Cycle management
//!
//! If a single argument is given it is used as the path to an input script, which is replayed
//! against the session clock. Without a script the robot starts in teleop and idles with its
//! default actions running.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use ctrl_if::{event::ExecEvent, mode::RobotMode};
use ctrl_lib::{
    bindings,
    data_store::DataStore,
    loc::FieldLayout,
    params::CtrlExecParams,
    robot::Robot,
    sched::Scheduler,
    sim::{SimFollower, SimPlant},
};
use util::{
    host,
    logger::logger_init,
    script_interpreter::{PendingEvents, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Parameters are loaded first since they carry the logging configuration
    let params: CtrlExecParams =
        util::params::load("ctrl_exec.toml").wrap_err("Could not load exec params")?;
    params.validate().wrap_err("Invalid exec params")?;

    let session = Session::new("ctrl_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(&params.log, &session).wrap_err("Failed to initialise logging")?;

    info!("Robot Control Executable\n");
    info!(
        "Running on: {}",
        host::get_hostname().unwrap_or_else(|| String::from("unknown host"))
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let field: FieldLayout =
        util::params::load("field.toml").wrap_err("Could not load the field layout")?;

    info!(
        "Exec parameters loaded, field has {} landmarks",
        field.landmarks.len()
    );

    let cycle_frequency_hz = 1.0 / params.cycle_period_s;

    // ---- INITIALISE INPUT SOURCE ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut script = match args.len() {
        1 => {
            info!("No script provided, idling in teleop\n");
            None
        }
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} events\n",
                si.get_duration(),
                si.get_num_events()
            );

            Some(si)
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE ROBOT ----

    info!("Initialising robot...");

    let mut ds = DataStore::default();

    let mut robot = Robot::new(
        field,
        Box::new(SimFollower::new(params.sim, params.cycle_period_s)),
    );
    robot.pose = Some(params.sim.initial_pose);

    let plant = SimPlant::new(params.sim, params.cycle_period_s);

    let mut sched = Scheduler::new();
    bindings::configure(&mut sched, &params).wrap_err("Failed to configure the bindings")?;

    info!(
        "Registered {} resources",
        sched.registry().ids().count()
    );

    // Without a script nothing would ever enable the robot
    if script.is_none() {
        ds.set_mode(RobotMode::Teleop, &mut sched, &mut robot);
    }

    info!("Robot initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        let cycle_start_instant = Instant::now();

        ds.cycle_start(session::get_elapsed_seconds(), cycle_frequency_hz);
        robot.time_s = ds.time_s;

        // ---- INPUT PROCESSING ----

        if let Some(ref mut si) = script {
            match si.get_pending_events(ds.time_s) {
                PendingEvents::None => (),
                PendingEvents::Some(events) => {
                    for event in events.iter() {
                        handle_event(event, &mut ds, &mut sched, &mut robot);
                    }
                }
                PendingEvents::EndOfScript => {
                    info!("End of input script reached, stopping");
                    break;
                }
            }
        }

        // ---- MODE MANAGEMENT ----

        ds.update_coast_mode(&mut robot, params.coast_mode_delay_s);

        // ---- SCHEDULER ----

        if ds.mode.is_enabled() {
            let report = sched.tick(&mut robot);

            if !report.is_empty() {
                debug!("Cycle {} report: {:?}", report.cycle, report);
            }

            ds.num_interrupted += report.interrupted.len() as u64;
            ds.num_build_failures += report.build_failures.len() as u64;
        }

        // ---- PLANT ----

        plant.step(&mut robot);

        if ds.is_1_hz_cycle {
            match robot.pose {
                Some(p) => info!(
                    "Pose: ({:.3}, {:.3}) m, {:.3} rad, {} running actions",
                    p.position_m.x,
                    p.position_m.y,
                    p.heading_rad,
                    sched.num_running()
                ),
                None => warn!("No pose estimate available"),
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.clear_overruns();
                thread::sleep(d);
            }
            None => ds.record_overrun(cycle_dur.as_secs_f64() - params.cycle_period_s),
        }

        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    sched.cancel_all(&mut robot);
    robot.make_safe();

    info!(
        "End of execution after {} cycles, {} actions interrupted, {} failed to build",
        ds.num_cycles, ds.num_interrupted, ds.num_build_failures
    );

    Ok(())
}

/// Deliver a single input event to the robot.
fn handle_event(
    event: &ExecEvent,
    ds: &mut DataStore,
    sched: &mut Scheduler<Robot>,
    robot: &mut Robot,
) {
    debug!("Event: {:?}", event);

    if event.apply_to_input(&mut robot.input) {
        return;
    }

    match *event {
        ExecEvent::Mode(mode) => ds.set_mode(mode, sched, robot),
        ExecEvent::GamePiece { present } => robot.rollers.has_game_piece = present,
        ExecEvent::Algae { present } => robot.algae_grabber.has_game_piece = present,
        _ => (),
    }
}
