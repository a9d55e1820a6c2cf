//! # Alignment action
//!
//! Drives to the alignment target then blinks the status lights until released. The target is
//! computed when the action is built, so every start aligns to the landmark nearest the robot at
//! that moment.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use ctrl_if::eqpt::leds::Color;

use crate::{
    commands::leds::blink_color,
    robot::{Robot, RobotResources},
    sched::{Action, ActionFactory},
};

use super::{compute_alignment_target, AlignError, AlignParams, AlignSide, DriveToPose};
use crate::path_follow::MotionConstraints;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Factory for the alignment action on the given side.
///
/// Building fails with [`AlignError::PoseUnavailable`] if the robot has no pose estimate, or
/// [`AlignError::NoTargetAvailable`] if the field has no landmarks. A failed build schedules
/// nothing, so the robot neither moves nor signals.
pub fn align_to_landmark(
    side: AlignSide,
    resources: RobotResources,
    params: AlignParams,
    limits: MotionConstraints,
    blink_period_s: f64,
) -> ActionFactory<Robot> {
    let name = format!("AlignToLandmark({})", side);

    ActionFactory::new(&name.clone(), move |robot: &Robot| {
        let pose = robot.pose.ok_or(AlignError::PoseUnavailable)?;
        let target =
            compute_alignment_target(&pose, &robot.field.poses(), side, &params, &limits)?;

        let leds = resources.status_leds;

        Ok(Action::sequence(vec![
            Action::leaf("DriveToPose", resources.drivetrain_set(), DriveToPose::new(target)),
            Action::repeat(move || blink_color(leds, Color::WHITE, blink_period_s)),
        ])
        .with_name(&name))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        loc::Pose2,
        robot::test_support,
        sched::{Scheduler, Trigger},
    };
    use ctrl_if::{
        eqpt::leds::LedCmd,
        input::{Button, ControllerId},
    };

    fn params() -> AlignParams {
        AlignParams {
            forward_offset_m: 0.45,
            branch_offset_m: 0.17,
            lateral_bias_m: 0.05,
            speed_scale: 0.3,
        }
    }

    fn limits() -> MotionConstraints {
        MotionConstraints {
            max_speed_ms: 4.0,
            max_accel_mss: 3.0,
            max_rot_speed_rads: 9.0,
            max_rot_accel_radss: 8.0,
        }
    }

    fn setup(
        landmarks: &[Pose2],
    ) -> (
        Scheduler<Robot>,
        Robot,
        RobotResources,
        std::rc::Rc<std::cell::RefCell<test_support::FollowerLog>>,
    ) {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (robot, log) = test_support::robot(landmarks);

        sched.add_trigger(
            Trigger::new("driver_x", |r: &Robot| {
                r.input.is_pressed(ControllerId::Driver, Button::X)
            })
            .while_true(align_to_landmark(
                AlignSide::Left,
                resources,
                params(),
                limits(),
                1.0,
            )),
        );

        (sched, robot, resources, log)
    }

    fn press(robot: &mut Robot, pressed: bool) {
        robot
            .input
            .controller_mut(ControllerId::Driver)
            .set_button(Button::X, pressed);
    }

    #[test]
    fn test_drive_then_blink() {
        let (mut sched, mut robot, resources, log) = setup(&[Pose2::new(2.0, 0.0, 0.0)]);
        log.borrow_mut().complete_after = Some(2);

        press(&mut robot, true);
        let report = sched.tick(&mut robot);
        assert_eq!(report.scheduled[0].name, "AlignToLandmark(LEFT)");

        let align = report.scheduled[0].id;
        assert_eq!(sched.owner_of(resources.drivetrain), Some(align));
        assert_eq!(sched.owner_of(resources.status_leds), None);
        assert!(robot.drivetrain.demand().linear_speed_ms() > 0.0);

        // Target computed once with the reduced velocities
        {
            let log = log.borrow();
            assert_eq!(log.begun.len(), 1);
            assert!((log.begun[0].1.max_speed_ms - 1.2).abs() < 1e-9);
            assert!((log.begun[0].0.position_m.x - 2.45).abs() < 1e-9);
        }

        // Follower completes, the sequence moves on to the lights
        sched.tick(&mut robot);
        assert_eq!(sched.owner_of(resources.drivetrain), None);
        assert_eq!(sched.owner_of(resources.status_leds), Some(align));
        assert_eq!(robot.drivetrain.demand().linear_speed_ms(), 0.0);

        robot.time_s = 0.1;
        sched.tick(&mut robot);
        assert_eq!(robot.leds.cmd(), LedCmd::Solid(Color::WHITE));

        // Releasing the button stops the indicator and nothing was cancelled on the follower
        press(&mut robot, false);
        let report = sched.tick(&mut robot);
        assert_eq!(report.interrupted[0].id, align);
        assert_eq!(robot.leds.cmd(), LedCmd::Off);
        assert!(log.borrow().cancelled.is_empty());
    }

    #[test]
    fn test_release_while_driving_cancels_follower() {
        let (mut sched, mut robot, resources, log) = setup(&[Pose2::new(2.0, 0.0, 0.0)]);

        press(&mut robot, true);
        sched.tick(&mut robot);
        sched.tick(&mut robot);

        press(&mut robot, false);
        sched.tick(&mut robot);

        assert_eq!(log.borrow().cancelled.len(), 1);
        assert_eq!(robot.drivetrain.demand().linear_speed_ms(), 0.0);
        assert_eq!(sched.owner_of(resources.drivetrain), None);
        assert_eq!(sched.owner_of(resources.status_leds), None);
    }

    #[test]
    fn test_no_landmarks_starts_nothing() {
        let (mut sched, mut robot, resources, log) = setup(&[]);

        press(&mut robot, true);
        let report = sched.tick(&mut robot);

        assert!(report.scheduled.is_empty());
        assert_eq!(report.build_failures.len(), 1);
        assert_eq!(
            report.build_failures[0].reason,
            AlignError::NoTargetAvailable.to_string()
        );
        assert!(log.borrow().begun.is_empty());
        assert_eq!(sched.owner_of(resources.drivetrain), None);
        assert_eq!(robot.leds.cmd(), LedCmd::Off);
    }

    #[test]
    fn test_no_pose_starts_nothing() {
        let (mut sched, mut robot, _, log) = setup(&[Pose2::new(2.0, 0.0, 0.0)]);
        robot.pose = None;

        press(&mut robot, true);
        let report = sched.tick(&mut robot);

        assert_eq!(
            report.build_failures[0].reason,
            AlignError::PoseUnavailable.to_string()
        );
        assert!(log.borrow().begun.is_empty());
    }
}
