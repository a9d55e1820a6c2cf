//! # Simulation
//!
//! Stand-ins for the external services when running without hardware: a path follower which
//! drives straight at the target under proportional control, and a plant which integrates the
//! drivetrain demand into the robot's pose and moves the arm towards its setpoint.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector2;
use serde::Deserialize;

use ctrl_if::eqpt::drive::ChassisSpeeds;
use util::maths::{clamp, wrap_pi};

use crate::{
    loc::Pose2,
    path_follow::{FollowHandle, FollowStatus, MotionConstraints, PathFollower},
    robot::Robot,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct SimParams {
    /// Pose the simulated robot starts at
    pub initial_pose: Pose2,

    /// Proportional gain on position error.
    ///
    /// Units: 1/seconds
    pub follower_kp_lin: f64,

    /// Proportional gain on heading error.
    ///
    /// Units: 1/seconds
    pub follower_kp_ang: f64,

    /// Distance from the target within which a follow request completes.
    ///
    /// Units: meters
    pub position_tolerance_m: f64,

    /// Heading error within which a follow request completes.
    ///
    /// Units: radians
    pub heading_tolerance_rad: f64,

    /// Speed at which the elevator travels to its setpoint.
    ///
    /// Units: meters/second
    pub arm_speed_ms: f64,
}

pub struct SimFollower {
    params: SimParams,
    cycle_period_s: f64,
    next_handle: u64,
    active: Option<FollowRequest>,
}

struct FollowRequest {
    handle: FollowHandle,
    target: Pose2,
    constraints: MotionConstraints,

    /// Demand issued on the previous step, for acceleration limiting
    last: ChassisSpeeds,
}

/// Integrates the drivetrain demand into the robot pose and drives the arm.
pub struct SimPlant {
    params: SimParams,
    cycle_period_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimFollower {
    pub fn new(params: SimParams, cycle_period_s: f64) -> Self {
        Self {
            params,
            cycle_period_s,
            next_handle: 0,
            active: None,
        }
    }
}

impl PathFollower for SimFollower {
    fn begin(&mut self, target: &Pose2, constraints: &MotionConstraints) -> FollowHandle {
        self.next_handle += 1;
        let handle = FollowHandle(self.next_handle);

        debug!("Sim follow request {:?} started", handle);

        self.active = Some(FollowRequest {
            handle,
            target: *target,
            constraints: *constraints,
            last: ChassisSpeeds::stop(),
        });

        handle
    }

    fn step(&mut self, handle: FollowHandle, current: &Pose2) -> FollowStatus {
        let params = self.params;
        let dt = self.cycle_period_s;

        let req = match self.active.as_mut() {
            Some(r) if r.handle == handle => r,
            _ => return FollowStatus::Complete,
        };

        let pos_err = req.target.position_m - current.position_m;
        let heading_err = wrap_pi(req.target.heading_rad - current.heading_rad);

        if pos_err.norm() < params.position_tolerance_m
            && heading_err.abs() < params.heading_tolerance_rad
        {
            debug!("Sim follow request {:?} complete", handle);
            self.active = None;
            return FollowStatus::Complete;
        }

        let c = req.constraints;

        // Proportional demand within the velocity limits
        let mut vel = pos_err * params.follower_kp_lin;
        if vel.norm() > c.max_speed_ms {
            vel *= c.max_speed_ms / vel.norm();
        }
        let omega = clamp(
            heading_err * params.follower_kp_ang,
            -c.max_rot_speed_rads,
            c.max_rot_speed_rads,
        );

        // Then within the acceleration limits
        let last_vel = Vector2::new(req.last.vx_ms, req.last.vy_ms);
        let dv = vel - last_vel;
        let max_dv = c.max_accel_mss * dt;
        if dv.norm() > max_dv {
            vel = last_vel + dv * (max_dv / dv.norm());
        }
        let max_domega = c.max_rot_accel_radss * dt;
        let omega = req.last.omega_rads + clamp(omega - req.last.omega_rads, -max_domega, max_domega);

        let speeds = ChassisSpeeds::new(vel.x, vel.y, omega);
        req.last = speeds;

        FollowStatus::Driving(speeds)
    }

    fn cancel(&mut self, handle: FollowHandle) {
        if self.active.as_ref().map(|r| r.handle) == Some(handle) {
            debug!("Sim follow request {:?} cancelled", handle);
            self.active = None;
        }
    }
}

impl SimPlant {
    pub fn new(params: SimParams, cycle_period_s: f64) -> Self {
        Self {
            params,
            cycle_period_s,
        }
    }

    /// Move the robot by one cycle of its current demands.
    pub fn step(&self, robot: &mut Robot) {
        let demand = robot.drivetrain.demand();

        if let Some(pose) = robot.pose.as_mut() {
            pose.position_m += Vector2::new(demand.vx_ms, demand.vy_ms) * self.cycle_period_s;
            pose.heading_rad = wrap_pi(pose.heading_rad + demand.omega_rads * self.cycle_period_s);
        }

        let max_travel_m = self.params.arm_speed_ms * self.cycle_period_s;
        let arm_err_m = robot.arm.setpoint_m() - robot.arm.height_m;
        robot.arm.height_m += clamp(arm_err_m, -max_travel_m, max_travel_m);
    }
}
