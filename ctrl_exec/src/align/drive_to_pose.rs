//! # Drive to pose
//!
//! Leaf action handing a target pose to the path following service and forwarding its speed
//! demands to the drivetrain until the target is reached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};

use crate::{
    path_follow::{FollowHandle, FollowStatus},
    robot::Robot,
    sched::Leaf,
};

use super::AlignTarget;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct DriveToPose {
    target: AlignTarget,
    handle: Option<FollowHandle>,
    complete: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveToPose {
    pub fn new(target: AlignTarget) -> Self {
        Self {
            target,
            handle: None,
            complete: false,
        }
    }
}

impl Leaf<Robot> for DriveToPose {
    fn init(&mut self, robot: &mut Robot) {
        info!(
            "Driving to ({:.3}, {:.3}) m, {:.3} rad",
            self.target.pose.position_m.x, self.target.pose.position_m.y, self.target.pose.heading_rad
        );

        self.handle = Some(
            robot
                .path_follower
                .begin(&self.target.pose, &self.target.constraints),
        );
    }

    fn execute(&mut self, robot: &mut Robot) {
        let (handle, pose) = match (self.handle, robot.pose) {
            (Some(h), Some(p)) => (h, p),
            _ => {
                // Hold position until localisation returns
                robot.drivetrain.stop();
                return;
            }
        };

        match robot.path_follower.step(handle, &pose) {
            FollowStatus::Driving(speeds) => robot.drivetrain.set_demand(speeds),
            FollowStatus::Complete => {
                robot.drivetrain.stop();
                self.complete = true;
            }
        }
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.complete
    }

    fn end(&mut self, robot: &mut Robot, interrupted: bool) {
        if interrupted {
            if let Some(handle) = self.handle.take() {
                robot.path_follower.cancel(handle);
                debug!("Follow request {:?} cancelled", handle);
            }
        }

        robot.drivetrain.stop();
    }
}
