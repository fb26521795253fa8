//! Play session state machine
//!
//! `Menu --start_game--> Playing --slap--> Playing --end_session--> Resolved`
//!
//! A session owns its arena physics copy, score, combo, counters and a seeded
//! RNG, so the same seed and inputs replay the same session. `Resolved` is
//! terminal; rewards are handed to the player's progression exactly once.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, ArenaCatalog, ArenaId, Feature};
use crate::consts::{MAX_POWER, OPTIMAL_ANGLE, PROJECTILE_SIZE};
use crate::error::{Result, SimError};
use crate::normalize_degrees;
use crate::progression::{ProgressionEvent, ProgressionState};
use crate::sim::trajectory::validate_launch;
use crate::sim::{
    CollisionBox, Hit, PhysicsConfig, ResolvedPhysics, Trajectory, TrajectorySample, first_hit,
    resolve,
};
use crate::stats::SessionStats;
use crate::tuning::Tuning;

pub const FIRST_SLAP_ACHIEVEMENT: &str = "First Slap";
pub const COMBO_MASTER_ACHIEVEMENT: &str = "Combo Master";
/// Combo needed within one session for Combo Master
pub const COMBO_MASTER_THRESHOLD: u32 = 10;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Arena selection, nothing in play yet
    Menu,
    /// Slaps are being resolved
    Playing,
    /// Session over; only reward claiming remains
    Resolved,
}

/// Player input for one slap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlapInput {
    /// Slider power in [0, MAX_POWER]
    pub power: f64,
    /// Launch angle in degrees
    pub angle: f64,
}

impl SlapInput {
    pub fn new(power: f64, angle: f64) -> Self {
        Self { power, angle }
    }

    pub fn validate(&self) -> Result<()> {
        validate_launch(self.power, self.angle)
    }

    /// 1.0 at the optimal angle, falling linearly to 0.0 directly opposite
    pub fn accuracy(&self) -> f64 {
        let diff = (normalize_degrees(self.angle) - OPTIMAL_ANGLE).abs();
        let off_by = diff.min(360.0 - diff);
        1.0 - off_by / 180.0
    }
}

/// Result of resolving one slap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlapOutcome {
    /// Physics sampled for this slap
    pub physics: ResolvedPhysics,
    /// Launch state (t = 0)
    pub launch: TrajectorySample,
    /// First target contact, if any
    pub hit: Option<Hit>,
    /// Points added to the score (0 on a miss)
    pub points: u64,
    /// Combo after this slap
    pub combo: u32,
}

/// End-of-session report for the profile and analytics collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub arena_id: Option<ArenaId>,
    pub arena_name: Option<String>,
    pub score: u64,
    pub stats: SessionStats,
    pub xp_earned: u64,
    pub arena_cleared: bool,
}

/// One play session
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: SessionPhase,
    score: u64,
    combo: u32,
    current_arena_id: Option<ArenaId>,
    arena_name: Option<String>,
    /// Copied from the arena at start
    physics: PhysicsConfig,
    features: BTreeSet<Feature>,
    stats: SessionStats,
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    rewards_claimed: bool,
}

impl GameSession {
    /// New session in the menu with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            phase: SessionPhase::Menu,
            score: 0,
            combo: 0,
            current_arena_id: None,
            arena_name: None,
            physics: PhysicsConfig::default(),
            features: BTreeSet::new(),
            stats: SessionStats::new(),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rewards_claimed: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn current_arena_id(&self) -> Option<ArenaId> {
        self.current_arena_id
    }

    pub fn arena_name(&self) -> Option<&str> {
        self.arena_name.as_deref()
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn features(&self) -> &BTreeSet<Feature> {
        &self.features
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Copy arena physics, features and identity into the session
    pub(crate) fn apply_arena(&mut self, arena: &Arena) {
        self.physics = arena.physics;
        self.features = arena.features.clone();
        self.current_arena_id = Some(arena.id);
        self.arena_name = Some(arena.name.clone());
    }

    fn require(&self, phase: SessionPhase, action: &'static str) -> Result<()> {
        if self.phase != phase {
            return Err(SimError::InvalidTransition {
                from: self.phase,
                action,
            });
        }
        Ok(())
    }

    /// Enter an arena. Only valid from the menu, and only for arenas the
    /// player can access.
    pub fn start_game(
        &mut self,
        catalog: &ArenaCatalog,
        progress: &ProgressionState,
        arena_id: ArenaId,
    ) -> Result<()> {
        self.require(SessionPhase::Menu, "start game")?;
        catalog.get_arena(arena_id)?;
        if !catalog.can_access(progress.completed_arenas(), arena_id) {
            return Err(SimError::ArenaLocked { id: arena_id });
        }
        catalog.apply_physics(arena_id, self)?;
        self.phase = SessionPhase::Playing;
        log::info!(
            "Session (seed {}) started in arena {} for {}",
            self.seed,
            arena_id,
            progress.user_id()
        );
        Ok(())
    }

    /// Points a successful slap is worth at the current combo.
    ///
    /// Base points scaled by the mean of power fraction and angle accuracy,
    /// times the combo multiplier. Never less than 1.
    pub fn score_for(&self, input: &SlapInput) -> u64 {
        let power = (input.power / MAX_POWER).clamp(0.0, 1.0);
        let quality = 0.5 * (power + input.accuracy());
        let raw = self.tuning.base_slap_points as f64
            * quality
            * self.tuning.combo_multiplier(self.combo);
        (raw.round() as u64).max(1)
    }

    /// Score a hit: adds points and extends the combo by one
    pub fn successful_slap(&mut self, input: SlapInput) -> Result<u64> {
        self.require(SessionPhase::Playing, "score a slap")?;
        input.validate()?;
        let points = self.score_for(&input);
        self.score = self.score.saturating_add(points);
        self.combo += 1;
        self.stats.record_success(self.combo);
        log::debug!("Hit for {} points (combo {})", points, self.combo);
        Ok(points)
    }

    /// Score a miss: combo back to zero, score untouched
    pub fn failed_slap(&mut self) -> Result<()> {
        self.require(SessionPhase::Playing, "score a slap")?;
        self.combo = 0;
        self.stats.record_failure();
        log::debug!("Miss, combo reset");
        Ok(())
    }

    /// Resolve a slap against the targets: sample this slap's physics, fly
    /// the trajectory and score the first contact (or the miss).
    pub fn slap(&mut self, input: SlapInput, targets: &[CollisionBox]) -> Result<SlapOutcome> {
        self.require(SessionPhase::Playing, "slap")?;
        input.validate()?;

        let physics = resolve(&self.physics, &mut self.rng)?;
        let trajectory = Trajectory::new(input.power, input.angle, physics)?;
        let launch = trajectory
            .clone()
            .next()
            .ok_or(SimError::invalid_input("power", input.power))?;
        let hit = first_hit(trajectory, PROJECTILE_SIZE, targets);

        let points = match hit {
            Some(_) => self.successful_slap(input)?,
            None => {
                self.failed_slap()?;
                0
            }
        };

        Ok(SlapOutcome {
            physics,
            launch,
            hit,
            points,
            combo: self.combo,
        })
    }

    /// XP this session is worth so far
    pub fn xp_earned(&self) -> u64 {
        let per_hit = u64::from(self.stats.successful_slaps)
            .saturating_mul(self.tuning.xp_per_successful_slap);
        per_hit.saturating_add(self.score / self.tuning.score_per_xp.max(1))
    }

    pub fn arena_cleared(&self) -> bool {
        self.current_arena_id.is_some() && self.score >= self.tuning.arena_clear_score
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            arena_id: self.current_arena_id,
            arena_name: self.arena_name.clone(),
            score: self.score,
            stats: self.stats,
            xp_earned: self.xp_earned(),
            arena_cleared: self.arena_cleared(),
        }
    }

    /// Close the session
    pub fn end_session(&mut self) -> Result<SessionSummary> {
        self.require(SessionPhase::Playing, "end session")?;
        self.phase = SessionPhase::Resolved;
        let summary = self.summary();
        log::info!(
            "Session (seed {}) resolved: score {}, {}/{} hits",
            self.seed,
            summary.score,
            summary.stats.successful_slaps,
            summary.stats.total_slaps
        );
        Ok(summary)
    }

    /// Hand a resolved session's rewards to the player's progression.
    ///
    /// Awards XP, grants session achievements, and completes the arena if the
    /// clear score was reached. Only once per session. Returns the
    /// progression events raised.
    pub fn claim_rewards(
        &mut self,
        progress: &mut ProgressionState,
        catalog: &mut ArenaCatalog,
    ) -> Result<Vec<ProgressionEvent>> {
        self.require(SessionPhase::Resolved, "claim rewards")?;
        if self.rewards_claimed {
            return Err(SimError::InvalidTransition {
                from: self.phase,
                action: "claim rewards twice",
            });
        }
        // Nothing is awarded unless the whole claim can go through
        let cleared = match self.current_arena_id {
            Some(id) if self.arena_cleared() => {
                catalog.get_arena(id)?;
                Some(id)
            }
            _ => None,
        };

        progress.award_xp(self.xp_earned());
        if self.stats.successful_slaps > 0 {
            progress.grant_achievement(FIRST_SLAP_ACHIEVEMENT);
        }
        if self.stats.highest_combo >= COMBO_MASTER_THRESHOLD {
            progress.grant_achievement(COMBO_MASTER_ACHIEVEMENT);
        }
        if let Some(id) = cleared {
            progress.complete_arena(catalog, id)?;
        }

        self.rewards_claimed = true;
        Ok(progress.drain_events())
    }
}
