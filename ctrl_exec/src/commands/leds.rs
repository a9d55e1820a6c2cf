//! Status light actions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use ctrl_if::eqpt::leds::Color;

use crate::{
    robot::{Robot, RobotResources},
    sched::{Action, ActionFactory, Leaf, ResourceId, WorldClock},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Colours of the idle animation, in order.
const FLAME_COLORS: [Color; 4] = [Color::RED, Color::ORANGE, Color::YELLOW, Color::ORANGE];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the status lights.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct LedParams {
    /// Time each colour of the idle animation is shown for.
    ///
    /// Units: seconds
    pub flame_step_s: f64,

    /// Length of one on/off blink while aligned.
    ///
    /// Units: seconds
    pub align_blink_period_s: f64,

    /// Length of the blink shown when a game piece is acquired.
    ///
    /// Units: seconds
    pub acquired_blink_period_s: f64,
}

/// One blink: on for the first half of the period, off for the second, then finish.
pub struct BlinkColor {
    color: Color,
    period_s: f64,
    start_s: f64,
}

struct FlameCycle {
    step_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Leaf<Robot> for BlinkColor {
    fn init(&mut self, robot: &mut Robot) {
        self.start_s = robot.time_s();
    }

    fn execute(&mut self, robot: &mut Robot) {
        if robot.time_s() - self.start_s < 0.5 * self.period_s {
            robot.leds.set_color(self.color);
        } else {
            robot.leds.off();
        }
    }

    fn is_finished(&self, robot: &Robot) -> bool {
        robot.time_s() - self.start_s >= self.period_s
    }

    fn end(&mut self, robot: &mut Robot, _interrupted: bool) {
        robot.leds.off();
    }
}

impl Leaf<Robot> for FlameCycle {
    fn execute(&mut self, robot: &mut Robot) {
        let step = (robot.time_s() / self.step_s).floor().max(0.0) as usize;
        robot.leds.set_color(FLAME_COLORS[step % FLAME_COLORS.len()]);
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// A single blink of the status lights.
pub fn blink_color(leds: ResourceId, color: Color, period_s: f64) -> Action<Robot> {
    Action::leaf(
        "BlinkColor",
        std::iter::once(leds).collect(),
        BlinkColor {
            color,
            period_s,
            start_s: 0.0,
        },
    )
}

/// Default status light action, an idle animation.
pub fn flame_cycle(resources: RobotResources, params: LedParams) -> ActionFactory<Robot> {
    ActionFactory::infallible("FlameCycle", move || {
        Action::leaf(
            "FlameCycle",
            resources.status_leds_set(),
            FlameCycle {
                step_s: params.flame_step_s,
            },
        )
    })
}

/// Blink green once to show a coral has been picked up.
pub fn indicate_coral_acquired(
    resources: RobotResources,
    params: LedParams,
) -> ActionFactory<Robot> {
    ActionFactory::infallible("IndicateCoralAcquired", move || {
        blink_color(
            resources.status_leds,
            Color::GREEN,
            params.acquired_blink_period_s,
        )
        .with_name("IndicateCoralAcquired")
    })
}

pub fn indicate_algae_acquired(
    resources: RobotResources,
    params: LedParams,
) -> ActionFactory<Robot> {
    ActionFactory::infallible("IndicateAlgaeAcquired", move || {
        blink_color(
            resources.status_leds,
            Color::BLUE,
            params.acquired_blink_period_s,
        )
        .with_name("IndicateAlgaeAcquired")
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{robot::test_support, sched::Scheduler};
    use ctrl_if::eqpt::leds::LedCmd;

    fn params() -> LedParams {
        LedParams {
            flame_step_s: 0.25,
            align_blink_period_s: 1.0,
            acquired_blink_period_s: 1.0,
        }
    }

    #[test]
    fn test_blink_then_flame() {
        let mut sched = Scheduler::new();
        let resources = RobotResources::register(&mut sched);
        let (mut robot, _) = test_support::robot(&[]);

        sched
            .set_default_action(resources.status_leds, flame_cycle(resources, params()))
            .unwrap();
        sched.tick(&mut robot);
        sched.tick(&mut robot);
        assert_eq!(robot.leds.cmd(), LedCmd::Solid(Color::RED));

        robot.time_s = 0.3;
        sched
            .schedule_from(&indicate_coral_acquired(resources, params()), &mut robot)
            .unwrap();
        sched.tick(&mut robot);
        assert_eq!(robot.leds.cmd(), LedCmd::Solid(Color::GREEN));

        robot.time_s = 0.9;
        sched.tick(&mut robot);
        assert_eq!(robot.leds.cmd(), LedCmd::Off);

        // Blink over, the animation is re-armed and resumes on the next cycle
        robot.time_s = 1.3;
        let report = sched.tick(&mut robot);
        assert_eq!(report.finished[0].name, "IndicateCoralAcquired");
        assert_eq!(report.scheduled[0].name, "FlameCycle");

        robot.time_s = 1.5;
        sched.tick(&mut robot);
        assert_eq!(robot.leds.cmd(), LedCmd::Solid(Color::YELLOW));
    }
}
