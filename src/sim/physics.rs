//! Arena physics parameters and their per-slap resolution
//!
//! Arenas describe gravity and bounce damping as either a fixed value, a range
//! to sample from, or (gravity only) a chaotic mode. Resolution turns these
//! into concrete numbers using a caller-supplied RNG so a seeded session
//! replays identically.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CHAOTIC_GRAVITY_MAX, CHAOTIC_GRAVITY_MIN};
use crate::error::{Result, SimError};

/// Gravity setting for an arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GravityRepr", into = "GravityRepr")]
pub enum Gravity {
    /// Constant downward acceleration
    Fixed(f64),
    /// Sampled uniformly from [lo, hi] every slap
    Range { lo: f64, hi: f64 },
    /// Sampled from the wide chaotic band every slap
    Chaotic,
}

/// Wire form: a number, a `[lo, hi]` pair, or the string "chaotic"
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GravityRepr {
    Scalar(f64),
    Pair(f64, f64),
    Symbol(String),
}

const CHAOTIC_TAG: &str = "chaotic";

impl TryFrom<GravityRepr> for Gravity {
    type Error = String;

    fn try_from(repr: GravityRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            GravityRepr::Scalar(g) => Ok(Gravity::Fixed(g)),
            GravityRepr::Pair(lo, hi) => Ok(Gravity::Range { lo, hi }),
            GravityRepr::Symbol(s) if s == CHAOTIC_TAG => Ok(Gravity::Chaotic),
            GravityRepr::Symbol(s) => Err(format!("unknown gravity mode '{s}'")),
        }
    }
}

impl From<Gravity> for GravityRepr {
    fn from(gravity: Gravity) -> Self {
        match gravity {
            Gravity::Fixed(g) => GravityRepr::Scalar(g),
            Gravity::Range { lo, hi } => GravityRepr::Pair(lo, hi),
            Gravity::Chaotic => GravityRepr::Symbol(CHAOTIC_TAG.to_string()),
        }
    }
}

/// Bounce damping setting for an arena (fraction of vertical speed kept)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Damping {
    Fixed(f64),
    Range(f64, f64),
}

/// Physics parameters an arena imposes on a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsConfig {
    pub gravity: Gravity,
    pub bounce_damping: Damping,
    pub friction: f64,
}

impl Default for PhysicsConfig {
    /// Novice Grounds physics
    fn default() -> Self {
        Self {
            gravity: Gravity::Fixed(9.8),
            bounce_damping: Damping::Fixed(0.8),
            friction: 0.1,
        }
    }
}

impl PhysicsConfig {
    /// Check every value and range. Called when a catalog is built so bad
    /// arena data fails at load time instead of mid-session.
    pub fn validate(&self) -> Result<()> {
        match self.gravity {
            Gravity::Fixed(g) => finite("gravity", g)?,
            Gravity::Range { lo, hi } => check_range("gravity", lo, hi)?,
            Gravity::Chaotic => {}
        }
        match self.bounce_damping {
            Damping::Fixed(d) => unit_interval("bounce_damping", d)?,
            Damping::Range(lo, hi) => {
                check_range("bounce_damping", lo, hi)?;
                unit_interval("bounce_damping", lo)?;
                unit_interval("bounce_damping", hi)?;
            }
        }
        unit_interval("friction", self.friction)
    }

    /// True if resolving this config consumes randomness
    pub fn is_randomized(&self) -> bool {
        !matches!(self.gravity, Gravity::Fixed(_))
            || matches!(self.bounce_damping, Damping::Range(..))
    }
}

/// Concrete physics values for a single slap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPhysics {
    pub gravity: f64,
    pub bounce_damping: f64,
    pub friction: f64,
}

impl ResolvedPhysics {
    /// Fixed physics with the given gravity and no bounce loss
    pub fn with_gravity(gravity: f64) -> Self {
        Self {
            gravity,
            bounce_damping: 1.0,
            friction: 0.0,
        }
    }
}

/// Resolve gravity to a scalar.
///
/// Fixed values pass through, ranges are sampled uniformly, and chaotic mode
/// samples uniformly from `[CHAOTIC_GRAVITY_MIN, CHAOTIC_GRAVITY_MAX]`.
pub fn resolve_gravity<R: Rng>(gravity: &Gravity, rng: &mut R) -> Result<f64> {
    match *gravity {
        Gravity::Fixed(g) => {
            finite("gravity", g)?;
            Ok(g)
        }
        Gravity::Range { lo, hi } => sample_range("gravity", lo, hi, rng),
        Gravity::Chaotic => sample_range("gravity", CHAOTIC_GRAVITY_MIN, CHAOTIC_GRAVITY_MAX, rng),
    }
}

/// Resolve bounce damping to a scalar
pub fn resolve_damping<R: Rng>(damping: &Damping, rng: &mut R) -> Result<f64> {
    match *damping {
        Damping::Fixed(d) => {
            unit_interval("bounce_damping", d)?;
            Ok(d)
        }
        Damping::Range(lo, hi) => sample_range("bounce_damping", lo, hi, rng),
    }
}

/// Resolve a whole config. Gravity is drawn before damping so the RNG
/// consumption order is stable.
pub fn resolve<R: Rng>(config: &PhysicsConfig, rng: &mut R) -> Result<ResolvedPhysics> {
    let gravity = resolve_gravity(&config.gravity, rng)?;
    let bounce_damping = resolve_damping(&config.bounce_damping, rng)?;
    unit_interval("friction", config.friction)?;
    Ok(ResolvedPhysics {
        gravity,
        bounce_damping,
        friction: config.friction,
    })
}

fn sample_range<R: Rng>(field: &'static str, lo: f64, hi: f64, rng: &mut R) -> Result<f64> {
    check_range(field, lo, hi)?;
    if lo == hi {
        return Ok(lo);
    }
    Ok(rng.random_range(lo..=hi))
}

fn check_range(field: &'static str, lo: f64, hi: f64) -> Result<()> {
    // NaN fails the comparison as well. The width must stay finite to sample.
    if !(lo.is_finite() && hi.is_finite() && lo <= hi && (hi - lo).is_finite()) {
        return Err(SimError::invalid_range(field, lo, hi));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SimError::invalid_input(field, value));
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid_input(field, value));
    }
    Ok(())
}
