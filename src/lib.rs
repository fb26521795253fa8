//! Slap Arena - gameplay simulation core
//!
//! Core modules:
//! - `sim`: Deterministic physics (gravity/damping sampling, trajectories, collisions)
//! - `arena`: Arena catalog, physics presets and access gating
//! - `progression`: XP, levels, completed arenas and achievements
//! - `session`: Per-play session state machine (menu, playing, resolved)
//! - `stats`: Slap counters for a session
//! - `tuning`: Data-driven game balance
//!
//! Nothing in this crate performs I/O. Callers pass plain data in and persist
//! whatever comes back out.

pub mod arena;
pub mod error;
pub mod progression;
pub mod session;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use arena::{Arena, ArenaCatalog, ArenaId, Feature};
pub use error::{Result, SimError};
pub use progression::{ProgressionEvent, ProgressionRecord, ProgressionState};
pub use session::{GameSession, SessionPhase, SessionSummary, SlapInput, SlapOutcome};
pub use stats::SessionStats;
pub use tuning::{Difficulty, Tuning};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for trajectory sampling (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Upper bound on trajectory samples (30 simulated seconds)
    pub const MAX_TRAJECTORY_STEPS: u32 = 30 * 60;

    /// Slap power slider range is [0, MAX_POWER]
    pub const MAX_POWER: f64 = 100.0;
    /// Launch angle that scores full accuracy (degrees)
    pub const OPTIMAL_ANGLE: f64 = 45.0;

    /// Chaotic gravity is sampled uniformly from this band.
    /// Wider than any seeded range and includes inverted gravity.
    pub const CHAOTIC_GRAVITY_MIN: f64 = -20.0;
    pub const CHAOTIC_GRAVITY_MAX: f64 = 30.0;

    /// Side length of the projectile's collision box
    pub const PROJECTILE_SIZE: f64 = 10.0;
    /// Bounce speed below which the projectile is considered at rest
    pub const REST_SPEED: f64 = 0.5;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
