//! Player progression: XP, levels, completed arenas and achievements
//!
//! Level is derived from a threshold table. After every XP mutation the
//! level-up check runs again until it settles, so one large award can climb
//! several levels. Level `MAX_LEVEL` is terminal.
//!
//! Progression outlives a play session; the persistence collaborator stores
//! `ProgressionRecord` snapshots and hands them back on the next session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::arena::{ArenaCatalog, ArenaId};
use crate::error::Result;

/// Cumulative XP needed to leave each level (index 0 = level 1)
pub const XP_THRESHOLDS: [u64; 10] = [
    1_000, 2_500, 4_500, 7_000, 10_000, 14_000, 19_000, 25_000, 32_000, 40_000,
];

/// Hard level cap; no thresholds are extrapolated past the table
pub const MAX_LEVEL: u32 = XP_THRESHOLDS.len() as u32;

/// XP threshold for a level, `None` outside the table
pub fn xp_threshold(level: u32) -> Option<u64> {
    let i = usize::try_from(level).ok()?.checked_sub(1)?;
    XP_THRESHOLDS.get(i).copied()
}

/// Something the surrounding layers may want to react to (UI toasts,
/// analytics, relic minting)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressionEvent {
    LevelUp { from: u32, to: u32 },
    ArenaCompleted { id: ArenaId },
    AchievementUnlocked { name: String },
    ArenaUnlocked { id: ArenaId },
}

/// Plain snapshot of a player's progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRecord {
    pub user_id: String,
    pub level: u32,
    pub xp: u64,
    pub total_xp: u64,
    #[serde(default)]
    pub completed_arenas: BTreeSet<ArenaId>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Live progression state for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProgressionRecord", into = "ProgressionRecord")]
pub struct ProgressionState {
    user_id: String,
    level: u32,
    xp: u64,
    total_xp: u64,
    completed_arenas: BTreeSet<ArenaId>,
    /// Insertion ordered, no duplicates
    achievements: Vec<String>,
    pending_events: Vec<ProgressionEvent>,
}

impl From<ProgressionRecord> for ProgressionState {
    /// Restore from storage. Out-of-table levels are clamped and the level-up
    /// check runs so a stale record cannot sit below its earned level.
    fn from(record: ProgressionRecord) -> Self {
        let level = record.level.clamp(1, MAX_LEVEL);
        let mut achievements: Vec<String> = Vec::with_capacity(record.achievements.len());
        for name in record.achievements {
            if !achievements.contains(&name) {
                achievements.push(name);
            }
        }
        let mut state = Self {
            user_id: record.user_id,
            level,
            xp: record.xp,
            total_xp: threshold_or_cap(level),
            completed_arenas: record.completed_arenas,
            achievements,
            pending_events: Vec::new(),
        };
        state.settle_level();
        state.pending_events.clear();
        state
    }
}

impl From<ProgressionState> for ProgressionRecord {
    fn from(state: ProgressionState) -> Self {
        state.snapshot()
    }
}

fn threshold_or_cap(level: u32) -> u64 {
    xp_threshold(level).unwrap_or(XP_THRESHOLDS[XP_THRESHOLDS.len() - 1])
}

impl ProgressionState {
    /// Fresh player: level 1, no XP
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            level: 1,
            xp: 0,
            total_xp: XP_THRESHOLDS[0],
            completed_arenas: BTreeSet::new(),
            achievements: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Cumulative XP
    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// XP threshold of the current level
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn completed_arenas(&self) -> &BTreeSet<ArenaId> {
        &self.completed_arenas
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn has_achievement(&self, name: &str) -> bool {
        self.achievements.iter().any(|a| a == name)
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    /// Add XP and cascade level-ups. Returns the new cumulative XP.
    pub fn award_xp(&mut self, amount: u64) -> u64 {
        self.xp = self.xp.saturating_add(amount);
        log::debug!("{} awarded {} XP (total {})", self.user_id, amount, self.xp);
        self.settle_level();
        self.xp
    }

    /// One level at a time until XP sits below the current threshold or the
    /// table runs out
    fn settle_level(&mut self) {
        while !self.is_max_level() && self.xp >= self.total_xp {
            let from = self.level;
            self.level += 1;
            self.total_xp = threshold_or_cap(self.level);
            log::info!("{} reached level {}", self.user_id, self.level);
            self.pending_events.push(ProgressionEvent::LevelUp {
                from,
                to: self.level,
            });
        }
    }

    /// Percentage through the current level, in [0, 100]; 100 at max level.
    ///
    /// The window runs from the previous level's threshold (0 for level 1)
    /// to the current level's threshold.
    pub fn xp_progress(&self) -> f64 {
        if self.is_max_level() {
            return 100.0;
        }
        let floor = xp_threshold(self.level - 1).unwrap_or(0);
        let span = self.total_xp.saturating_sub(floor);
        if span == 0 {
            return 100.0;
        }
        let into = self.xp.saturating_sub(floor);
        (into as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// XP still needed for the next level (0 at max level)
    pub fn xp_to_next_level(&self) -> u64 {
        if self.is_max_level() {
            return 0;
        }
        self.total_xp.saturating_sub(self.xp)
    }

    /// Record an arena as completed.
    ///
    /// The first completion grants "Master of <arena>" and unlocks the next
    /// arena in the player's catalog. Repeats change nothing. Returns whether
    /// this was a first completion.
    pub fn complete_arena(&mut self, catalog: &mut ArenaCatalog, id: ArenaId) -> Result<bool> {
        let arena = catalog.get_arena(id)?;
        if !self.completed_arenas.insert(id) {
            return Ok(false);
        }
        let achievement = arena.mastery_achievement();
        log::info!("{} completed arena {} ({})", self.user_id, id, arena.name);
        self.pending_events.push(ProgressionEvent::ArenaCompleted { id });

        if !self.has_achievement(&achievement) {
            self.achievements.push(achievement.clone());
            self.pending_events
                .push(ProgressionEvent::AchievementUnlocked { name: achievement });
        }

        if let Some(next) = catalog.next_arena(id).map(|a| (a.id, a.unlocked)) {
            let (next_id, already_unlocked) = next;
            catalog.unlock(next_id)?;
            if !already_unlocked {
                self.pending_events
                    .push(ProgressionEvent::ArenaUnlocked { id: next_id });
            }
        }
        Ok(true)
    }

    /// Grant a named achievement. Returns false if already held.
    pub fn grant_achievement(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_achievement(&name) {
            return false;
        }
        self.achievements.push(name.clone());
        self.pending_events
            .push(ProgressionEvent::AchievementUnlocked { name });
        true
    }

    /// Explicit reset; the only operation that lowers XP
    pub fn reset(&mut self) {
        log::warn!("Resetting progression for {}", self.user_id);
        *self = Self::new(std::mem::take(&mut self.user_id));
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self) -> ProgressionRecord {
        ProgressionRecord {
            user_id: self.user_id.clone(),
            level: self.level,
            xp: self.xp,
            total_xp: self.total_xp,
            completed_arenas: self.completed_arenas.clone(),
            achievements: self.achievements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn player() -> ProgressionState {
        ProgressionState::new("user123")
    }

    #[test]
    fn test_initial_state() {
        let p = player();
        assert_eq!(p.level(), 1);
        assert_eq!(p.xp(), 0);
        assert_eq!(p.total_xp(), 1000);
        assert_eq!(p.xp_progress(), 0.0);
    }

    #[test]
    fn test_award_xp_and_progress() {
        let mut p = player();
        assert_eq!(p.award_xp(500), 500);
        assert_eq!(p.level(), 1);
        assert_eq!(p.xp_progress(), 50.0);

        assert_eq!(p.award_xp(600), 1100);
        assert_eq!(p.level(), 2);
        assert_eq!(p.total_xp(), 2500);
        // 100 of the 1500 XP between thresholds 1000 and 2500
        assert!((p.xp_progress() - 100.0 / 15.0).abs() < 1e-9);
        assert_eq!(
            p.drain_events(),
            [ProgressionEvent::LevelUp { from: 1, to: 2 }]
        );
    }

    #[test]
    fn test_cascade_crosses_several_levels() {
        let mut p = player();
        p.award_xp(7_500);
        assert_eq!(p.level(), 5);
        assert_eq!(p.total_xp(), 10_000);
        let events = p.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ProgressionEvent::LevelUp { from: 1, to: 2 });
        assert_eq!(events[3], ProgressionEvent::LevelUp { from: 4, to: 5 });
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut p = player();
        p.award_xp(1000);
        assert_eq!(p.level(), 2);
        assert_eq!(p.xp_progress(), 0.0);
    }

    #[test]
    fn test_max_level_saturates() {
        let mut p = player();
        p.award_xp(1_000_000);
        assert_eq!(p.level(), MAX_LEVEL);
        assert_eq!(p.total_xp(), 40_000);
        assert_eq!(p.xp_progress(), 100.0);
        assert_eq!(p.xp_to_next_level(), 0);
        assert_eq!(p.drain_events().len(), 9);

        p.award_xp(1_000_000);
        assert_eq!(p.level(), MAX_LEVEL);
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn test_zero_award_is_noop() {
        let mut p = player();
        p.award_xp(250);
        assert_eq!(p.award_xp(0), 250);
        assert_eq!(p.level(), 1);
    }

    #[test]
    fn test_xp_saturates_instead_of_overflowing() {
        let mut p = player();
        p.award_xp(u64::MAX);
        assert_eq!(p.award_xp(10), u64::MAX);
    }

    #[test]
    fn test_complete_arena_is_idempotent() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        assert_eq!(p.complete_arena(&mut catalog, 1), Ok(true));
        assert_eq!(p.complete_arena(&mut catalog, 1), Ok(false));

        assert_eq!(p.completed_arenas().iter().copied().collect::<Vec<_>>(), [1]);
        let masters = p
            .achievements()
            .iter()
            .filter(|a| *a == "Master of Novice Grounds")
            .count();
        assert_eq!(masters, 1);
    }

    #[test]
    fn test_complete_arena_unlocks_next() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        assert!(!catalog.can_access(p.completed_arenas(), 2));

        p.complete_arena(&mut catalog, 1).unwrap();
        assert!(catalog.get_arena(2).unwrap().unlocked);
        assert!(catalog.can_access(p.completed_arenas(), 2));
        assert!(!catalog.can_access(p.completed_arenas(), 3));

        assert_eq!(
            p.drain_events(),
            [
                ProgressionEvent::ArenaCompleted { id: 1 },
                ProgressionEvent::AchievementUnlocked {
                    name: "Master of Novice Grounds".into()
                },
                ProgressionEvent::ArenaUnlocked { id: 2 },
            ]
        );
    }

    #[test]
    fn test_complete_last_arena() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        assert_eq!(p.complete_arena(&mut catalog, 4), Ok(true));
        assert!(p.has_achievement("Master of Quantum Field"));
    }

    #[test]
    fn test_complete_unknown_arena() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        assert_eq!(
            p.complete_arena(&mut catalog, 42),
            Err(SimError::NotFound { id: 42 })
        );
        assert!(p.completed_arenas().is_empty());
    }

    #[test]
    fn test_grant_achievement() {
        let mut p = player();
        assert!(p.grant_achievement("First Slap"));
        assert!(!p.grant_achievement("First Slap"));
        assert_eq!(p.achievements(), ["First Slap"]);
    }

    #[test]
    fn test_reset() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        p.award_xp(5000);
        p.complete_arena(&mut catalog, 1).unwrap();
        p.reset();
        assert_eq!(p, ProgressionState::new("user123"));
    }

    #[test]
    fn test_record_round_trip() {
        let mut catalog = ArenaCatalog::seeded().unwrap();
        let mut p = player();
        p.award_xp(3000);
        p.complete_arena(&mut catalog, 1).unwrap();
        p.drain_events();

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"completedArenas\":[1]"));
        let back: ProgressionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_stale_record_is_settled() {
        let record = ProgressionRecord {
            user_id: "old".into(),
            level: 1,
            xp: 5_000,
            total_xp: 1_000,
            completed_arenas: BTreeSet::new(),
            achievements: vec!["A".into(), "A".into()],
        };
        let p = ProgressionState::from(record);
        assert_eq!(p.level(), 4);
        assert_eq!(p.total_xp(), 7_000);
        assert_eq!(p.achievements(), ["A"]);

        let record = ProgressionRecord {
            user_id: "weird".into(),
            level: 0,
            xp: 0,
            total_xp: 0,
            completed_arenas: BTreeSet::new(),
            achievements: Vec::new(),
        };
        let p = ProgressionState::from(record);
        assert_eq!(p.level(), 1);
        assert_eq!(p.total_xp(), 1_000);
    }
}
