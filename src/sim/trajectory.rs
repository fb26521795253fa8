//! Projectile trajectories for a slap
//!
//! Two views of the same motion:
//! - closed form (`compute_trajectory`, `sample_at`) for a single instant
//! - a lazy fixed-timestep `Trajectory` that also bounces off the ground
//!   using the arena's damping and friction

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::physics::ResolvedPhysics;
use crate::consts::{MAX_POWER, MAX_TRAJECTORY_STEPS, REST_SPEED, SIM_DT};
use crate::error::{Result, SimError};
use crate::{normalize_degrees, polar_to_cartesian};

/// Launch parameters for a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryParams {
    /// Launch speed, in [0, MAX_POWER]
    pub power: f64,
    /// Launch angle in degrees, counter-clockwise from +x
    pub angle: f64,
    /// Downward acceleration (negative pulls upward)
    pub gravity: f64,
}

impl TrajectoryParams {
    pub fn new(power: f64, angle: f64, gravity: f64) -> Self {
        Self {
            power,
            angle,
            gravity,
        }
    }

    /// Reject NaN, infinities and out-of-domain power. Never clamps.
    pub fn validate(&self) -> Result<()> {
        validate_launch(self.power, self.angle)?;
        if !self.gravity.is_finite() {
            return Err(SimError::invalid_input("gravity", self.gravity));
        }
        Ok(())
    }

    /// Velocity at launch
    pub fn launch_velocity(&self) -> DVec2 {
        polar_to_cartesian(self.power, normalize_degrees(self.angle).to_radians())
    }
}

/// Check the player-controlled half of a launch
pub(crate) fn validate_launch(power: f64, angle: f64) -> Result<()> {
    if !power.is_finite() || !(0.0..=MAX_POWER).contains(&power) {
        return Err(SimError::invalid_input("power", power));
    }
    if !angle.is_finite() {
        return Err(SimError::invalid_input("angle", angle));
    }
    Ok(())
}

/// Position and velocity of the projectile at one instant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl TrajectorySample {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }

    pub fn is_finite(&self) -> bool {
        self.position().is_finite() && self.velocity().is_finite()
    }

    fn from_vectors(pos: DVec2, vel: DVec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            vx: vel.x,
            vy: vel.y,
        }
    }
}

/// Launch sample (t = 0): origin position, velocity from power and angle
pub fn compute_trajectory(params: &TrajectoryParams) -> Result<TrajectorySample> {
    params.validate()?;
    Ok(TrajectorySample::from_vectors(DVec2::ZERO, params.launch_velocity()))
}

/// Closed-form projectile state after `t` seconds (no ground contact)
pub fn sample_at(params: &TrajectoryParams, t: f64) -> Result<TrajectorySample> {
    params.validate()?;
    if !t.is_finite() || t < 0.0 {
        return Err(SimError::invalid_input("time", t));
    }
    let v0 = params.launch_velocity();
    let g = params.gravity;
    Ok(TrajectorySample {
        x: v0.x * t,
        y: v0.y * t - 0.5 * g * t * t,
        vx: v0.x,
        vy: v0.y - g * t,
    })
}

/// Lazy sequence of samples at a fixed timestep.
///
/// The first item is the launch sample. When the projectile falls through
/// y = 0 it bounces: vertical speed is scaled by the bounce damping and
/// horizontal speed loses the friction fraction. The sequence ends once a
/// bounce leaves less than `REST_SPEED` of vertical speed, or after
/// `max_steps` samples.
#[derive(Debug, Clone)]
pub struct Trajectory {
    current: TrajectorySample,
    physics: ResolvedPhysics,
    dt: f64,
    step: u32,
    max_steps: u32,
    bounces: u32,
    finished: bool,
}

impl Trajectory {
    pub fn new(power: f64, angle: f64, physics: ResolvedPhysics) -> Result<Self> {
        let params = TrajectoryParams::new(power, angle, physics.gravity);
        let launch = compute_trajectory(&params)?;
        if !(0.0..=1.0).contains(&physics.bounce_damping) {
            return Err(SimError::invalid_input("bounce_damping", physics.bounce_damping));
        }
        if !(0.0..=1.0).contains(&physics.friction) {
            return Err(SimError::invalid_input("friction", physics.friction));
        }
        Ok(Self {
            current: launch,
            physics,
            dt: SIM_DT,
            step: 0,
            max_steps: MAX_TRAJECTORY_STEPS,
            bounces: 0,
            finished: false,
        })
    }

    /// Override the timestep (must be positive and finite)
    pub fn with_timestep(mut self, dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::invalid_input("timestep", dt));
        }
        self.dt = dt;
        Ok(self)
    }

    /// Override the sample budget
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn timestep(&self) -> f64 {
        self.dt
    }

    pub fn physics(&self) -> &ResolvedPhysics {
        &self.physics
    }

    /// Ground contacts so far
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    /// Simulated time of the most recently yielded sample
    pub fn elapsed(&self) -> f64 {
        f64::from(self.step.saturating_sub(1)) * self.dt
    }

    fn advance(&mut self) {
        let g = self.physics.gravity;
        let dt = self.dt;
        let mut s = self.current;

        // Exact for constant acceleration over the step
        s.x += s.vx * dt;
        s.y += s.vy * dt - 0.5 * g * dt * dt;
        s.vy -= g * dt;

        if s.y < 0.0 && s.vy < 0.0 {
            s.y = 0.0;
            s.vy = -s.vy * self.physics.bounce_damping;
            s.vx *= 1.0 - self.physics.friction;
            self.bounces += 1;
            if s.vy < REST_SPEED {
                s.vy = 0.0;
                self.finished = true;
            }
        }

        self.current = s;
    }
}

impl Iterator for Trajectory {
    type Item = TrajectorySample;

    fn next(&mut self) -> Option<TrajectorySample> {
        if self.finished || self.step >= self.max_steps {
            return None;
        }
        if self.step > 0 {
            self.advance();
        }
        self.step += 1;
        Some(self.current)
    }
}
