//! # Data Store

use log::{info, warn};

use ctrl_if::mode::RobotMode;

use crate::{robot::Robot, sched::Scheduler};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Debug, Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Time of the current cycle since the session started
    pub time_s: f64,

    // Modes
    pub mode: RobotMode,

    /// Time at which the robot was last disabled, cleared once the brakes are released
    pub disabled_at_s: Option<f64>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of actions interrupted this session
    pub num_interrupted: u64,

    /// Total number of actions which could not be built this session
    pub num_build_failures: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Sets the cycle time and the 1Hz cycle flag.
    pub fn cycle_start(&mut self, time_s: f64, cycle_frequency_hz: f64) {
        let cycles_per_s = (cycle_frequency_hz as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;
        self.time_s = time_s;
    }

    /// Change the robot mode.
    ///
    /// Disabling interrupts every action and stops the robot, the brakes are released after the
    /// coast delay. Enabling re-applies the brakes.
    pub fn set_mode(&mut self, mode: RobotMode, sched: &mut Scheduler<Robot>, robot: &mut Robot) {
        if mode == self.mode {
            return;
        }

        info!("Mode change {:?} -> {:?}", self.mode, mode);

        if mode.is_enabled() {
            robot.drivetrain.set_brake_mode(true);
            self.disabled_at_s = None;
        } else {
            sched.cancel_all(robot);
            robot.make_safe();
            self.disabled_at_s = Some(self.time_s);
        }

        self.mode = mode;
    }

    /// Release the drivetrain brakes once the robot has been disabled for `coast_mode_delay_s`.
    pub fn update_coast_mode(&mut self, robot: &mut Robot, coast_mode_delay_s: f64) {
        if let Some(t) = self.disabled_at_s {
            if self.time_s - t >= coast_mode_delay_s {
                robot.drivetrain.set_brake_mode(false);
                self.disabled_at_s = None;
            }
        }
    }

    /// Record a cycle overrun, warning on the first of a run of them.
    pub fn record_overrun(&mut self, overrun_s: f64) {
        self.num_consec_cycle_overruns += 1;

        if self.num_consec_cycle_overruns == 1 {
            warn!("Cycle overran by {:.6} s", overrun_s);
        }
    }

    pub fn clear_overruns(&mut self) {
        if self.num_consec_cycle_overruns > 1 {
            warn!(
                "{} consecutive cycle overruns",
                self.num_consec_cycle_overruns
            );
        }
        self.num_consec_cycle_overruns = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        robot::{test_support, RobotResources},
        sched::Action,
    };
    use ctrl_if::eqpt::drive::ChassisSpeeds;

    #[test]
    fn test_disable_and_coast() {
        let mut ds = DataStore::default();
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        ds.set_mode(RobotMode::Teleop, &mut sched, &mut robot);
        assert!(robot.drivetrain.is_braking());

        let id = sched.schedule(
            Action::run("Spin", resources.drivetrain_set(), |r: &mut Robot| {
                r.drivetrain.set_demand(ChassisSpeeds::new(0.0, 0.0, 1.0))
            }),
            &mut robot,
        );
        sched.tick(&mut robot);

        ds.cycle_start(5.0, 50.0);
        ds.set_mode(RobotMode::Disabled, &mut sched, &mut robot);
        assert!(!sched.is_running(id));
        assert_eq!(robot.drivetrain.demand(), ChassisSpeeds::stop());
        assert!(robot.drivetrain.is_braking());

        ds.cycle_start(14.9, 50.0);
        ds.update_coast_mode(&mut robot, 10.0);
        assert!(robot.drivetrain.is_braking());

        ds.cycle_start(15.0, 50.0);
        ds.update_coast_mode(&mut robot, 10.0);
        assert!(!robot.drivetrain.is_braking());

        ds.set_mode(RobotMode::Auto, &mut sched, &mut robot);
        assert!(robot.drivetrain.is_braking());
    }
}
