//! Game balance knobs
//!
//! Scoring and XP rewards are data, not code. The request layer can ship a
//! JSON tuning file; anything it leaves out falls back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Casual,
    #[default]
    Standard,
    Hardcore,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Standard => "Standard",
            Difficulty::Hardcore => "Hardcore",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "standard" | "normal" => Some(Difficulty::Standard),
            "hardcore" | "hard" => Some(Difficulty::Hardcore),
            _ => None,
        }
    }

    /// Score needed in one session to count as completing the arena
    pub fn arena_clear_score(&self) -> u64 {
        match self {
            Difficulty::Casual => 500,
            Difficulty::Standard => 1000,
            Difficulty::Hardcore => 2000,
        }
    }

    /// XP granted per successful slap
    pub fn xp_per_successful_slap(&self) -> u64 {
        match self {
            Difficulty::Casual => 30,
            Difficulty::Standard => 25,
            Difficulty::Hardcore => 20,
        }
    }
}

/// Scoring and reward parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub difficulty: Difficulty,

    // === Scoring ===
    /// Points for a full-power slap at the optimal angle with no combo
    pub base_slap_points: u64,
    /// Extra multiplier per combo step (0.1 = +10% per consecutive hit)
    pub combo_bonus_step: f64,
    /// Combo steps beyond this add no further bonus
    pub max_combo_bonus: u32,

    // === Rewards ===
    pub xp_per_successful_slap: u64,
    /// One XP per this many points scored
    pub score_per_xp: u64,
    pub arena_clear_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_preset(Difficulty::default())
    }
}

impl Tuning {
    /// Defaults with a preset's reward values applied
    pub fn from_preset(preset: Difficulty) -> Self {
        Self {
            difficulty: preset,

            base_slap_points: 100,
            combo_bonus_step: 0.1,
            max_combo_bonus: 10,

            xp_per_successful_slap: preset.xp_per_successful_slap(),
            score_per_xp: 10,
            arena_clear_score: preset.arena_clear_score(),
        }
    }

    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| SimError::tuning(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} preset)", tuning.difficulty.as_str());
        Ok(tuning)
    }

    /// Parse tuning JSON, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}, using default tuning");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_slap_points == 0 {
            return Err(SimError::tuning("baseSlapPoints must be positive"));
        }
        if !self.combo_bonus_step.is_finite() || self.combo_bonus_step < 0.0 {
            return Err(SimError::invalid_range(
                "comboBonusStep",
                self.combo_bonus_step,
                f64::INFINITY,
            ));
        }
        if self.score_per_xp == 0 {
            return Err(SimError::tuning("scorePerXp must be positive"));
        }
        Ok(())
    }

    /// Score multiplier for a slap landed with `combo` prior consecutive hits
    pub fn combo_multiplier(&self, combo: u32) -> f64 {
        1.0 + f64::from(combo.min(self.max_combo_bonus)) * self.combo_bonus_step
    }
}
