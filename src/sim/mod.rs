//! Deterministic physics module
//!
//! Everything a slap needs to be resolved lives here. This module must be pure
//! and deterministic:
//! - Fixed timestep only
//! - Randomness only through a caller-supplied RNG
//! - No I/O, rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod trajectory;

pub use collision::{CollisionBox, Hit, check_collision, first_hit};
pub use physics::{
    Damping, Gravity, PhysicsConfig, ResolvedPhysics, resolve, resolve_damping, resolve_gravity,
};
pub use trajectory::{Trajectory, TrajectoryParams, TrajectorySample, compute_trajectory, sample_at};
