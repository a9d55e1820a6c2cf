//! # Operator bindings
//!
//! Declares the default action of each subsystem and binds the operator controllers and sensors
//! to the robot's actions.
//!
//! | Trigger                          | Binding     | Action                             |
//! |----------------------------------|-------------|------------------------------------|
//! | Driver Start                     | on true     | `ResetOrientation`                 |
//! | Driver X / Y / B                 | while true  | `AlignToLandmark` L / C / R        |
//! | Manipulator A / X / B / Y        | on true     | `RaiseToLevel` L1 / L2 / L3 / L4   |
//! | Manipulator right bumper         | while true  | `IntakeAlgae`                      |
//! | Manipulator left bumper          | while true  | `OuttakeAlgae`                     |
//! | Manipulator right / left bumper  | on false    | `StopAlgaeGrabber`                 |
//! | Manipulator POV left             | while true  | `IntakeUntilDetected`              |
//! | Manipulator Back                 | on true     | `InterruptAll`                     |
//! | Manipulator Start                | on true     | `Stow`                             |
//! | Manipulator POV right            | while true  | `OuttakeUntilNotDetected`          |
//! | Manipulator POV down / up        | while true  | `RemoveAlgaeAtLevel` AlgaeL2 / L3  |
//! | Manipulator POV right / down / up| on false    | `Stow`                             |
//! | Coral detected                   | on true     | `IndicateCoralAcquired`            |
//! | Algae detected                   | on true     | `IndicateAlgaeAcquired`            |

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use ctrl_if::{
    eqpt::arm::ArmLevel,
    input::{Button, ControllerId},
};

use crate::{
    align::{align_to_landmark, AlignSide},
    commands::{arm, drive, leds, rollers},
    params::CtrlExecParams,
    robot::{Robot, RobotResources},
    sched::{SchedError, Scheduler, Trigger},
};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Register the robot's subsystems and configure every default and binding.
pub fn configure(
    sched: &mut Scheduler<Robot>,
    params: &CtrlExecParams,
) -> Result<RobotResources, SchedError> {
    let res = RobotResources::register(sched);

    // ---- DEFAULTS ----

    sched.set_default_action(res.drivetrain, drive::drive_with_controller(res, params.drive))?;
    sched.set_default_action(res.status_leds, leds::flame_cycle(res, params.leds))?;

    // ---- DRIVER ----

    sched.add_trigger(button(ControllerId::Driver, Button::Start).on_true(drive::reset_orientation()));

    for (b, side) in [
        (Button::X, AlignSide::Left),
        (Button::Y, AlignSide::Center),
        (Button::B, AlignSide::Right),
    ]
    .iter()
    {
        sched.add_trigger(button(ControllerId::Driver, *b).while_true(align_to_landmark(
            *side,
            res,
            params.align,
            params.drive.limits,
            params.leds.align_blink_period_s,
        )));
    }

    // ---- MANIPULATOR ----

    for (b, level) in [
        (Button::A, ArmLevel::L1),
        (Button::X, ArmLevel::L2),
        (Button::B, ArmLevel::L3),
        (Button::Y, ArmLevel::L4),
    ]
    .iter()
    {
        sched.add_trigger(
            button(ControllerId::Manipulator, *b)
                .on_true(arm::raise_to_level(res, params.arm, *level)),
        );
    }

    sched.add_trigger(
        button(ControllerId::Manipulator, Button::RightBumper)
            .while_true(rollers::intake_algae(res, params.rollers))
            .on_false(rollers::stop_algae_grabber(res)),
    );
    sched.add_trigger(
        button(ControllerId::Manipulator, Button::LeftBumper)
            .while_true(rollers::outtake_algae(res, params.rollers))
            .on_false(rollers::stop_algae_grabber(res)),
    );
    sched.add_trigger(
        button(ControllerId::Manipulator, Button::PovLeft)
            .while_true(rollers::intake_until_detected(res, params.rollers)),
    );
    sched.add_trigger(
        button(ControllerId::Manipulator, Button::Back).on_true(drive::interrupt_all(res)),
    );
    sched.add_trigger(
        button(ControllerId::Manipulator, Button::Start).on_true(arm::stow(res, params.arm)),
    );
    sched.add_trigger(
        button(ControllerId::Manipulator, Button::PovRight)
            .while_true(rollers::outtake_until_not_detected(res, params.rollers))
            .on_false(arm::stow(res, params.arm)),
    );

    for (b, level) in [
        (Button::PovDown, ArmLevel::AlgaeL2),
        (Button::PovUp, ArmLevel::AlgaeL3),
    ]
    .iter()
    {
        sched.add_trigger(
            button(ControllerId::Manipulator, *b)
                .while_true(arm::remove_algae_at_level(
                    res,
                    params.arm,
                    params.rollers,
                    *level,
                ))
                .on_false(arm::stow(res, params.arm)),
        );
    }

    // ---- SENSORS ----

    sched.add_trigger(
        Trigger::new("coral_detected", |r: &Robot| r.rollers.has_game_piece)
            .on_true(leds::indicate_coral_acquired(res, params.leds)),
    );
    sched.add_trigger(
        Trigger::new("algae_detected", |r: &Robot| r.algae_grabber.has_game_piece)
            .on_true(leds::indicate_algae_acquired(res, params.leds)),
    );

    Ok(res)
}

/// A trigger which is true while the button is held.
fn button(controller: ControllerId, button: Button) -> Trigger<Robot> {
    Trigger::new(&format!("{:?}.{:?}", controller, button), move |r: &Robot| {
        r.input.is_pressed(controller, button)
    })
}
