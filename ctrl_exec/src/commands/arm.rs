//! Elevator and arm actions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;
use serde::Deserialize;

use ctrl_if::eqpt::arm::ArmLevel;

use super::rollers::{self, RollerParams};
use crate::{
    robot::{Robot, RobotResources},
    sched::{Action, ActionFactory, Leaf},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Height of the elevator at each level.
///
/// Units: meters
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct ArmParams {
    pub stow_m: f64,
    pub l1_m: f64,
    pub l2_m: f64,
    pub l3_m: f64,
    pub l4_m: f64,
    pub algae_l2_m: f64,
    pub algae_l3_m: f64,

    /// Distance from the setpoint within which the arm is considered there.
    pub at_setpoint_tolerance_m: f64,
}

/// Drive the arm to a level, finishing once it gets there.
struct RaiseToLevel {
    level: ArmLevel,
    height_m: f64,
    tolerance_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmParams {
    pub fn height_m(&self, level: ArmLevel) -> f64 {
        match level {
            ArmLevel::Stow => self.stow_m,
            ArmLevel::L1 => self.l1_m,
            ArmLevel::L2 => self.l2_m,
            ArmLevel::L3 => self.l3_m,
            ArmLevel::L4 => self.l4_m,
            ArmLevel::AlgaeL2 => self.algae_l2_m,
            ArmLevel::AlgaeL3 => self.algae_l3_m,
        }
    }
}

impl Leaf<Robot> for RaiseToLevel {
    fn init(&mut self, robot: &mut Robot) {
        info!(
            "Arm moving from {:.3} m to {:?} ({:.3} m)",
            robot.arm.height_m, self.level, self.height_m
        );
    }

    fn execute(&mut self, robot: &mut Robot) {
        robot.arm.set_setpoint(self.level, self.height_m);
    }

    fn is_finished(&self, robot: &Robot) -> bool {
        robot.arm.at_setpoint(self.tolerance_m)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn raise_to_level_action(
    resources: &RobotResources,
    params: &ArmParams,
    level: ArmLevel,
) -> Action<Robot> {
    Action::leaf(
        &format!("RaiseToLevel({:?})", level),
        resources.arm_set(),
        RaiseToLevel {
            level,
            height_m: params.height_m(level),
            tolerance_m: params.at_setpoint_tolerance_m,
        },
    )
}

pub fn raise_to_level(
    resources: RobotResources,
    params: ArmParams,
    level: ArmLevel,
) -> ActionFactory<Robot> {
    ActionFactory::infallible(&format!("RaiseToLevel({:?})", level), move || {
        raise_to_level_action(&resources, &params, level)
    })
}

pub fn stow(resources: RobotResources, params: ArmParams) -> ActionFactory<Robot> {
    ActionFactory::infallible("Stow", move || {
        raise_to_level_action(&resources, &params, ArmLevel::Stow).with_name("Stow")
    })
}

/// Raise the arm to an algae level, then grab the algae resting there.
pub fn remove_algae_at_level(
    resources: RobotResources,
    params: ArmParams,
    roller_params: RollerParams,
    level: ArmLevel,
) -> ActionFactory<Robot> {
    let name = format!("RemoveAlgaeAtLevel({:?})", level);
    let factory_name = name.clone();

    ActionFactory::infallible(&factory_name, move || {
        Action::sequence(vec![
            raise_to_level_action(&resources, &params, level),
            rollers::intake_algae_action(&resources, roller_params),
        ])
        .with_name(&name)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{robot::test_support, sched::Scheduler};
    use ctrl_if::eqpt::rollers::RollerDemand;

    const PARAMS: ArmParams = ArmParams {
        stow_m: 0.0,
        l1_m: 0.3,
        l2_m: 0.55,
        l3_m: 0.95,
        l4_m: 1.55,
        algae_l2_m: 0.75,
        algae_l3_m: 1.15,
        at_setpoint_tolerance_m: 0.02,
    };

    const ROLLERS: RollerParams = RollerParams {
        intake_duty: 0.8,
        outtake_duty: 0.5,
        algae_intake_duty: 0.7,
        algae_outtake_duty: 1.0,
    };

    #[test]
    fn test_raise_finishes_at_setpoint() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        let id = sched
            .schedule_from(&raise_to_level(resources, PARAMS, ArmLevel::L3), &mut robot)
            .unwrap();
        let report = sched.tick(&mut robot);
        assert!(report.finished.is_empty());
        assert_eq!(robot.arm.level(), ArmLevel::L3);
        assert_eq!(robot.arm.setpoint_m(), 0.95);
        assert_eq!(sched.owner_of(resources.arm), Some(id));
        assert_eq!(sched.action(id).unwrap().name(), "RaiseToLevel(L3)");

        // Still short of the level
        robot.arm.height_m = 0.9;
        assert!(sched.tick(&mut robot).finished.is_empty());

        robot.arm.height_m = 0.94;
        let report = sched.tick(&mut robot);
        assert_eq!(report.finished[0].id, id);
        assert_eq!(sched.owner_of(resources.arm), None);

        // The setpoint is held once the action is over
        assert_eq!(robot.arm.setpoint_m(), 0.95);
    }

    #[test]
    fn test_stow_replaces_raise() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        sched
            .schedule_from(&raise_to_level(resources, PARAMS, ArmLevel::L4), &mut robot)
            .unwrap();
        sched.tick(&mut robot);
        robot.arm.height_m = 0.8;

        sched
            .schedule_from(&stow(resources, PARAMS), &mut robot)
            .unwrap();
        let report = sched.tick(&mut robot);
        assert_eq!(report.interrupted[0].name, "RaiseToLevel(L4)");
        assert_eq!(robot.arm.level(), ArmLevel::Stow);

        robot.arm.height_m = 0.01;
        let report = sched.tick(&mut robot);
        assert_eq!(report.finished[0].name, "Stow");
    }

    #[test]
    fn test_remove_algae_raises_then_grabs() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        let id = sched
            .schedule_from(
                &remove_algae_at_level(resources, PARAMS, ROLLERS, ArmLevel::AlgaeL2),
                &mut robot,
            )
            .unwrap();
        sched.tick(&mut robot);
        assert_eq!(robot.arm.level(), ArmLevel::AlgaeL2);
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Stopped);
        assert_eq!(sched.owner_of(resources.arm), Some(id));

        // The grabber is only claimed once the arm is at the level
        assert_eq!(sched.owner_of(resources.algae_grabber), None);

        // At the level the arm is released and the grabber claimed, the intake runs next cycle
        robot.arm.height_m = 0.75;
        sched.tick(&mut robot);
        assert_eq!(sched.owner_of(resources.arm), None);
        assert_eq!(sched.owner_of(resources.algae_grabber), Some(id));
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Stopped);

        sched.tick(&mut robot);
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Intake(0.7));

        robot.algae_grabber.has_game_piece = true;
        let report = sched.tick(&mut robot);
        assert_eq!(report.finished[0].name, "RemoveAlgaeAtLevel(AlgaeL2)");
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Stopped);
    }
}
