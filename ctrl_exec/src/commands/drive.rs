//! Drivetrain actions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;
use serde::Deserialize;

use ctrl_if::{
    eqpt::drive::ChassisSpeeds,
    input::{Axis, ControllerId, ControllerState},
};
use util::maths::apply_deadband;

use crate::{
    path_follow::MotionConstraints,
    robot::{Robot, RobotResources},
    sched::{Action, ActionFactory, Leaf, ResourceSet},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for driving.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct DriveParams {
    /// Capabilities of the drivetrain, full stick deflection maps to the velocity limits.
    pub limits: MotionConstraints,

    /// Deadband applied to every driver stick axis.
    pub controller_deadband: f64,
}

/// Drive from the driver's sticks.
struct DriveWithController {
    params: DriveParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Leaf<Robot> for DriveWithController {
    fn execute(&mut self, robot: &mut Robot) {
        let speeds = controller_speeds(
            robot.input.controller(ControllerId::Driver),
            robot.drivetrain.orientation_offset_rad(),
            &self.params,
        );
        robot.drivetrain.set_demand(speeds);
    }

    fn end(&mut self, robot: &mut Robot, _interrupted: bool) {
        robot.drivetrain.stop();
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Default drivetrain action, driving field-relative from the driver's sticks.
pub fn drive_with_controller(
    resources: RobotResources,
    params: DriveParams,
) -> ActionFactory<Robot> {
    ActionFactory::infallible("DriveWithController", move || {
        Action::leaf(
            "DriveWithController",
            resources.drivetrain_set(),
            DriveWithController { params },
        )
    })
}

/// Make the current heading forwards for the driver. Requires no resources so it never
/// interrupts driving.
pub fn reset_orientation() -> ActionFactory<Robot> {
    ActionFactory::infallible("ResetOrientation", || {
        Action::instant("ResetOrientation", ResourceSet::new(), |robot: &mut Robot| {
            let heading_rad = robot.pose.map(|p| p.heading_rad).unwrap_or(0.0);
            robot.drivetrain.reset_orientation(heading_rad);
            info!("Driver orientation reset to {:.3} rad", heading_rad);
        })
    })
}

/// Interrupt every action using any subsystem, letting the defaults take over.
pub fn interrupt_all(resources: RobotResources) -> ActionFactory<Robot> {
    ActionFactory::infallible("InterruptAll", move || {
        Action::interrupt_group(resources.all_set()).with_name("InterruptAll")
    })
}

/// Field-relative speeds commanded by a controller's sticks.
///
/// The left stick translates (pushed forwards is negative Y on the controller) and the right stick
/// X axis rotates. Forwards is the field heading given by `orientation_offset_rad`.
pub fn controller_speeds(
    controller: &ControllerState,
    orientation_offset_rad: f64,
    params: &DriveParams,
) -> ChassisSpeeds {
    let db = params.controller_deadband;

    let forward = -apply_deadband(controller.axis(Axis::LeftY), db);
    let left = -apply_deadband(controller.axis(Axis::LeftX), db);
    let rot = -apply_deadband(controller.axis(Axis::RightX), db);

    let (sin, cos) = orientation_offset_rad.sin_cos();
    let max_speed_ms = params.limits.max_speed_ms;

    ChassisSpeeds::new(
        (forward * cos - left * sin) * max_speed_ms,
        (forward * sin + left * cos) * max_speed_ms,
        rot * params.limits.max_rot_speed_rads,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{loc::Pose2, robot::test_support, sched::Scheduler};
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn params() -> DriveParams {
        DriveParams {
            limits: MotionConstraints {
                max_speed_ms: 4.0,
                max_accel_mss: 3.0,
                max_rot_speed_rads: 9.0,
                max_rot_accel_radss: 8.0,
            },
            controller_deadband: 0.1,
        }
    }

    #[test]
    fn test_controller_speeds() {
        let mut controller = ControllerState::default();
        controller.set_axis(Axis::LeftY, -1.0);
        controller.set_axis(Axis::RightX, 0.05);

        let speeds = controller_speeds(&controller, 0.0, &params());
        assert!((speeds.vx_ms - 4.0).abs() < EPS);
        assert!(speeds.vy_ms.abs() < EPS);
        assert_eq!(speeds.omega_rads, 0.0);

        // Forwards follows the reset orientation
        let speeds = controller_speeds(&controller, FRAC_PI_2, &params());
        assert!(speeds.vx_ms.abs() < EPS);
        assert!((speeds.vy_ms - 4.0).abs() < EPS);
    }

    #[test]
    fn test_reset_orientation_needs_no_resources() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);
        robot.pose = Some(Pose2::new(1.0, 1.0, 0.75));

        sched
            .set_default_action(resources.drivetrain, drive_with_controller(resources, params()))
            .unwrap();
        sched.tick(&mut robot);
        let driving = sched.owner_of(resources.drivetrain);

        let reset = reset_orientation().build(&robot).unwrap();
        assert!(reset.requirements().is_empty());
        sched.schedule(reset, &mut robot);
        let report = sched.tick(&mut robot);

        assert!(report.interrupted.is_empty());
        assert_eq!(report.finished[0].name, "ResetOrientation");
        assert_eq!(sched.owner_of(resources.drivetrain), driving);
        assert!((robot.drivetrain.orientation_offset_rad() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_interrupt_all_rearms_defaults() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        sched
            .set_default_action(resources.drivetrain, drive_with_controller(resources, params()))
            .unwrap();
        sched.tick(&mut robot);
        let first_default = sched.owner_of(resources.drivetrain);

        sched.schedule_from(&interrupt_all(resources), &mut robot).unwrap();
        let report = sched.tick(&mut robot);

        assert_eq!(report.interrupted.len(), 1);
        assert_eq!(report.finished[0].name, "InterruptAll");
        assert!(sched.owner_of(resources.drivetrain).is_some());
        assert_ne!(sched.owner_of(resources.drivetrain), first_default);
    }
}
