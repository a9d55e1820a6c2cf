//! # Robot
//!
//! The world every action operates on: operator input, the localisation snapshot and the demand
//! state of each subsystem. Actions read and write this state, the exec publishes the demands to
//! the equipment (or the simulation) after each cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use ctrl_if::{
    eqpt::{
        arm::ArmLevel,
        drive::ChassisSpeeds,
        leds::{Color, LedCmd},
        rollers::RollerDemand,
    },
    input::OperatorInput,
};

use crate::{
    loc::{FieldLayout, Pose2},
    path_follow::PathFollower,
    sched::{ResourceId, ResourceSet, Scheduler, WorldClock},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Robot {
    /// Operator controller state, sampled at the start of the cycle
    pub input: OperatorInput,

    /// Current pose estimate, `None` while localisation is unavailable
    pub pose: Option<Pose2>,

    pub field: FieldLayout,

    pub drivetrain: Drivetrain,
    pub leds: StatusLeds,
    pub arm: Arm,

    /// Coral rollers
    pub rollers: Rollers,
    pub algae_grabber: Rollers,

    pub path_follower: Box<dyn PathFollower>,

    /// Time since the start of the session
    pub time_s: f64,
}

#[derive(Debug, Default, Clone)]
pub struct Drivetrain {
    demand: ChassisSpeeds,

    /// Brake mode of the drive motors, released after the robot has been disabled for a while
    brake: bool,

    /// Field heading which the driver treats as forwards
    orientation_offset_rad: f64,
}

#[derive(Debug, Default, Clone)]
pub struct StatusLeds {
    cmd: LedCmd,
}

/// Elevator and arm, commanded by level.
#[derive(Debug, Default, Clone)]
pub struct Arm {
    level: ArmLevel,
    setpoint_m: f64,

    /// Measured elevator height
    pub height_m: f64,
}

#[derive(Debug, Default, Clone)]
pub struct Rollers {
    demand: RollerDemand,

    /// Game piece sensor reading
    pub has_game_piece: bool,
}

/// The scheduler resources of each subsystem.
#[derive(Debug, Copy, Clone)]
pub struct RobotResources {
    pub drivetrain: ResourceId,
    pub status_leds: ResourceId,
    pub rollers: ResourceId,
    pub arm: ResourceId,
    pub algae_grabber: ResourceId,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Robot {
    pub fn new(field: FieldLayout, path_follower: Box<dyn PathFollower>) -> Self {
        Self {
            input: OperatorInput::default(),
            pose: None,
            field,
            drivetrain: Drivetrain::default(),
            leds: StatusLeds::default(),
            arm: Arm::default(),
            rollers: Rollers::default(),
            algae_grabber: Rollers::default(),
            path_follower,
            time_s: 0.0,
        }
    }

    /// Stop every mechanism, used when the robot is disabled.
    ///
    /// The arm keeps its setpoint, it is held by the brakes of its motors.
    pub fn make_safe(&mut self) {
        self.drivetrain.stop();
        self.rollers.stop();
        self.algae_grabber.stop();
        self.leds.off();
    }
}

impl WorldClock for Robot {
    fn time_s(&self) -> f64 {
        self.time_s
    }
}

impl Drivetrain {
    pub fn demand(&self) -> ChassisSpeeds {
        self.demand
    }

    pub fn set_demand(&mut self, demand: ChassisSpeeds) {
        self.demand = demand;
    }

    pub fn stop(&mut self) {
        self.demand = ChassisSpeeds::stop();
    }

    pub fn is_braking(&self) -> bool {
        self.brake
    }

    pub fn set_brake_mode(&mut self, brake: bool) {
        if brake != self.brake {
            info!("Drivetrain brake mode {}", if brake { "on" } else { "off" });
        }
        self.brake = brake;
    }

    pub fn orientation_offset_rad(&self) -> f64 {
        self.orientation_offset_rad
    }

    /// Treat the given field heading as forwards for the driver.
    pub fn reset_orientation(&mut self, heading_rad: f64) {
        self.orientation_offset_rad = heading_rad;
    }
}

impl StatusLeds {
    pub fn cmd(&self) -> LedCmd {
        self.cmd
    }

    pub fn set_color(&mut self, color: Color) {
        self.cmd = LedCmd::Solid(color);
    }

    pub fn off(&mut self) {
        self.cmd = LedCmd::Off;
    }
}

impl Arm {
    pub fn level(&self) -> ArmLevel {
        self.level
    }

    pub fn setpoint_m(&self) -> f64 {
        self.setpoint_m
    }

    pub fn set_setpoint(&mut self, level: ArmLevel, height_m: f64) {
        self.level = level;
        self.setpoint_m = height_m;
    }

    pub fn at_setpoint(&self, tolerance_m: f64) -> bool {
        (self.height_m - self.setpoint_m).abs() <= tolerance_m
    }
}

impl Rollers {
    pub fn demand(&self) -> RollerDemand {
        self.demand
    }

    pub fn set_demand(&mut self, demand: RollerDemand) {
        self.demand = demand;
    }

    pub fn stop(&mut self) {
        self.demand = RollerDemand::Stopped;
    }
}

impl RobotResources {
    /// Register every subsystem with the scheduler.
    pub fn register(sched: &mut Scheduler<Robot>) -> Self {
        Self {
            drivetrain: sched.register_resource("drivetrain"),
            status_leds: sched.register_resource("status_leds"),
            rollers: sched.register_resource("rollers"),
            arm: sched.register_resource("arm"),
            algae_grabber: sched.register_resource("algae_grabber"),
        }
    }

    pub fn drivetrain_set(&self) -> ResourceSet {
        std::iter::once(self.drivetrain).collect()
    }

    pub fn status_leds_set(&self) -> ResourceSet {
        std::iter::once(self.status_leds).collect()
    }

    pub fn rollers_set(&self) -> ResourceSet {
        std::iter::once(self.rollers).collect()
    }

    pub fn arm_set(&self) -> ResourceSet {
        std::iter::once(self.arm).collect()
    }

    pub fn algae_grabber_set(&self) -> ResourceSet {
        std::iter::once(self.algae_grabber).collect()
    }

    /// Every subsystem of the robot.
    pub fn all_set(&self) -> ResourceSet {
        [
            self.drivetrain,
            self.status_leds,
            self.rollers,
            self.arm,
            self.algae_grabber,
        ]
        .iter()
        .copied()
        .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A robot with a scripted path follower for action tests.

    use super::*;
    use crate::path_follow::{FollowHandle, FollowStatus, MotionConstraints};
    use std::{cell::RefCell, rc::Rc};

    /// Record of every call made to a [`ScriptedFollower`].
    #[derive(Debug, Default)]
    pub struct FollowerLog {
        pub begun: Vec<(Pose2, MotionConstraints)>,
        pub steps: usize,
        pub cancelled: Vec<FollowHandle>,

        /// Number of steps after which the request completes
        pub complete_after: Option<usize>,
    }

    pub struct ScriptedFollower {
        pub log: Rc<RefCell<FollowerLog>>,
    }

    impl PathFollower for ScriptedFollower {
        fn begin(&mut self, target: &Pose2, constraints: &MotionConstraints) -> FollowHandle {
            let mut log = self.log.borrow_mut();
            log.begun.push((*target, *constraints));
            FollowHandle(log.begun.len() as u64)
        }

        fn step(&mut self, _handle: FollowHandle, _current: &Pose2) -> FollowStatus {
            let mut log = self.log.borrow_mut();
            log.steps += 1;
            match log.complete_after {
                Some(n) if log.steps >= n => FollowStatus::Complete,
                _ => FollowStatus::Driving(ChassisSpeeds::new(0.5, 0.0, 0.1)),
            }
        }

        fn cancel(&mut self, handle: FollowHandle) {
            self.log.borrow_mut().cancelled.push(handle);
        }
    }

    /// A robot at the origin with the given landmarks and a scripted follower.
    pub fn robot(landmarks: &[Pose2]) -> (Robot, Rc<RefCell<FollowerLog>>) {
        let log = Rc::new(RefCell::new(FollowerLog::default()));
        let field = FieldLayout {
            landmarks: landmarks
                .iter()
                .enumerate()
                .map(|(i, p)| crate::loc::Landmark {
                    id: i as u32,
                    pose: *p,
                })
                .collect(),
        };

        let mut robot = Robot::new(
            field,
            Box::new(ScriptedFollower {
                log: Rc::clone(&log),
            }),
        );
        robot.pose = Some(Pose2::default());

        (robot, log)
    }
}
