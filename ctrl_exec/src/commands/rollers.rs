//! Coral roller and algae grabber actions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use ctrl_if::eqpt::rollers::RollerDemand;

use crate::{
    robot::{Robot, RobotResources, Rollers},
    sched::{Action, ActionFactory, Leaf, ResourceSet},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the coral rollers and the algae grabber.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct RollerParams {
    /// Duty cycle used to pull a coral in, in [0, 1].
    pub intake_duty: f64,

    /// Duty cycle used to push a coral out, in [0, 1].
    pub outtake_duty: f64,

    pub algae_intake_duty: f64,
    pub algae_outtake_duty: f64,
}

/// Run a set of rollers until its game piece sensor reads `until_present`.
struct RunRollersUntil {
    mechanism: Mechanism,
    demand: RollerDemand,
    until_present: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone)]
enum Mechanism {
    Coral,
    Algae,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Mechanism {
    fn of(self, robot: &Robot) -> &Rollers {
        match self {
            Mechanism::Coral => &robot.rollers,
            Mechanism::Algae => &robot.algae_grabber,
        }
    }

    fn of_mut(self, robot: &mut Robot) -> &mut Rollers {
        match self {
            Mechanism::Coral => &mut robot.rollers,
            Mechanism::Algae => &mut robot.algae_grabber,
        }
    }

    fn resources(self, resources: &RobotResources) -> ResourceSet {
        match self {
            Mechanism::Coral => resources.rollers_set(),
            Mechanism::Algae => resources.algae_grabber_set(),
        }
    }
}

impl Leaf<Robot> for RunRollersUntil {
    fn execute(&mut self, robot: &mut Robot) {
        self.mechanism.of_mut(robot).set_demand(self.demand);
    }

    fn is_finished(&self, robot: &Robot) -> bool {
        self.mechanism.of(robot).has_game_piece == self.until_present
    }

    fn end(&mut self, robot: &mut Robot, _interrupted: bool) {
        self.mechanism.of_mut(robot).stop();
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn run_until(
    name: &str,
    resources: &RobotResources,
    mechanism: Mechanism,
    demand: RollerDemand,
    until_present: bool,
) -> Action<Robot> {
    Action::leaf(
        name,
        mechanism.resources(resources),
        RunRollersUntil {
            mechanism,
            demand,
            until_present,
        },
    )
}

pub fn intake_until_detected(
    resources: RobotResources,
    params: RollerParams,
) -> ActionFactory<Robot> {
    ActionFactory::infallible("IntakeUntilDetected", move || {
        run_until(
            "IntakeUntilDetected",
            &resources,
            Mechanism::Coral,
            RollerDemand::Intake(params.intake_duty),
            true,
        )
    })
}

pub fn outtake_until_not_detected(
    resources: RobotResources,
    params: RollerParams,
) -> ActionFactory<Robot> {
    ActionFactory::infallible("OuttakeUntilNotDetected", move || {
        run_until(
            "OuttakeUntilNotDetected",
            &resources,
            Mechanism::Coral,
            RollerDemand::Outtake(params.outtake_duty),
            false,
        )
    })
}

/// Grab algae until the grabber's sensor sees it.
pub(crate) fn intake_algae_action(
    resources: &RobotResources,
    params: RollerParams,
) -> Action<Robot> {
    run_until(
        "IntakeAlgae",
        resources,
        Mechanism::Algae,
        RollerDemand::Intake(params.algae_intake_duty),
        true,
    )
}

pub fn intake_algae(resources: RobotResources, params: RollerParams) -> ActionFactory<Robot> {
    ActionFactory::infallible("IntakeAlgae", move || intake_algae_action(&resources, params))
}

pub fn outtake_algae(resources: RobotResources, params: RollerParams) -> ActionFactory<Robot> {
    ActionFactory::infallible("OuttakeAlgae", move || {
        run_until(
            "OuttakeAlgae",
            &resources,
            Mechanism::Algae,
            RollerDemand::Outtake(params.algae_outtake_duty),
            false,
        )
    })
}

pub fn stop_algae_grabber(resources: RobotResources) -> ActionFactory<Robot> {
    ActionFactory::infallible("StopAlgaeGrabber", move || {
        Action::instant(
            "StopAlgaeGrabber",
            resources.algae_grabber_set(),
            |robot: &mut Robot| robot.algae_grabber.stop(),
        )
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{robot::test_support, sched::Scheduler};

    const PARAMS: RollerParams = RollerParams {
        intake_duty: 0.8,
        outtake_duty: 0.5,
        algae_intake_duty: 0.7,
        algae_outtake_duty: 1.0,
    };

    #[test]
    fn test_intake_until_detected() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        let id = sched
            .schedule_from(&intake_until_detected(resources, PARAMS), &mut robot)
            .unwrap();
        sched.tick(&mut robot);
        assert_eq!(robot.rollers.demand(), RollerDemand::Intake(0.8));

        robot.rollers.has_game_piece = true;
        let report = sched.tick(&mut robot);
        assert_eq!(report.finished[0].id, id);
        assert_eq!(robot.rollers.demand(), RollerDemand::Stopped);
        assert_eq!(sched.owner_of(resources.rollers), None);
    }

    #[test]
    fn test_outtake_without_piece_finishes_at_once() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        sched
            .schedule_from(&outtake_until_not_detected(resources, PARAMS), &mut robot)
            .unwrap();
        let report = sched.tick(&mut robot);

        assert_eq!(report.finished.len(), 1);
        assert_eq!(robot.rollers.demand(), RollerDemand::Stopped);
    }

    #[test]
    fn test_algae_grabber_is_separate_from_rollers() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        sched
            .schedule_from(&intake_until_detected(resources, PARAMS), &mut robot)
            .unwrap();
        let algae = sched
            .schedule_from(&intake_algae(resources, PARAMS), &mut robot)
            .unwrap();
        let report = sched.tick(&mut robot);

        assert!(report.interrupted.is_empty());
        assert_eq!(robot.rollers.demand(), RollerDemand::Intake(0.8));
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Intake(0.7));
        assert_eq!(sched.owner_of(resources.algae_grabber), Some(algae));

        // Stopping the grabber interrupts the intake without touching the coral rollers
        sched
            .schedule_from(&stop_algae_grabber(resources), &mut robot)
            .unwrap();
        let report = sched.tick(&mut robot);

        assert_eq!(report.interrupted[0].name, "IntakeAlgae");
        assert_eq!(robot.algae_grabber.demand(), RollerDemand::Stopped);
        assert_eq!(robot.rollers.demand(), RollerDemand::Intake(0.8));
    }
}
