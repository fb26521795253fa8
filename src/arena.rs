//! Arena definitions and the per-player arena catalog
//!
//! Each player owns a catalog value. Arena definitions are identical across
//! players; only the `unlocked` flags diverge as a player progresses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::session::GameSession;
use crate::sim::{Damping, Gravity, PhysicsConfig};

/// Arena identifier (1-based, dense, ordered by difficulty)
pub type ArenaId = u32;

/// Theme used when an arena id is unknown
pub const DEFAULT_THEME: &str = "novice-grounds";

/// Special mechanics an arena switches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    GravityChanges,
    ScreenGlitches,
    MovingPlatforms,
    QuantumTunneling,
    GravityDirectionChanges,
    HiddenRelics,
    SchrodingersCat,
    QuantumSuperposition,
    EntanglementEffects,
    MultipleOutcomes,
}

impl Feature {
    /// External flag name
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::GravityChanges => "gravityChanges",
            Feature::ScreenGlitches => "screenGlitches",
            Feature::MovingPlatforms => "movingPlatforms",
            Feature::QuantumTunneling => "quantumTunneling",
            Feature::GravityDirectionChanges => "gravityDirectionChanges",
            Feature::HiddenRelics => "hiddenRelics",
            Feature::SchrodingersCat => "schrodingersCat",
            Feature::QuantumSuperposition => "quantumSuperposition",
            Feature::EntanglementEffects => "entanglementEffects",
            Feature::MultipleOutcomes => "multipleOutcomes",
        }
    }
}

/// A playable arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub id: ArenaId,
    pub name: String,
    pub difficulty: u8,
    pub unlocked: bool,
    pub physics: PhysicsConfig,
    pub features: BTreeSet<Feature>,
}

impl Arena {
    pub fn new(
        id: ArenaId,
        name: &str,
        difficulty: u8,
        physics: PhysicsConfig,
        features: &[Feature],
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            difficulty,
            unlocked: id == 1,
            physics,
            features: features.iter().copied().collect(),
        }
    }

    /// Lowercased name with whitespace runs collapsed to a single hyphen
    pub fn theme_key(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Achievement granted on first completion
    pub fn mastery_achievement(&self) -> String {
        format!("Master of {}", self.name)
    }
}

/// The four arenas every player starts with
pub fn seed_arenas() -> Vec<Arena> {
    vec![
        Arena::new(1, "Novice Grounds", 1, PhysicsConfig::default(), &[]),
        Arena::new(
            2,
            "Glitch Valley",
            2,
            PhysicsConfig {
                gravity: Gravity::Range { lo: 5.0, hi: 15.0 },
                bounce_damping: Damping::Fixed(0.6),
                friction: 0.2,
            },
            &[
                Feature::GravityChanges,
                Feature::ScreenGlitches,
                Feature::MovingPlatforms,
            ],
        ),
        Arena::new(
            3,
            "Myth Caverns",
            3,
            PhysicsConfig {
                gravity: Gravity::Range { lo: -5.0, hi: 20.0 },
                bounce_damping: Damping::Fixed(0.4),
                friction: 0.3,
            },
            &[
                Feature::QuantumTunneling,
                Feature::GravityDirectionChanges,
                Feature::HiddenRelics,
            ],
        ),
        Arena::new(
            4,
            "Quantum Field",
            4,
            PhysicsConfig {
                gravity: Gravity::Chaotic,
                bounce_damping: Damping::Range(0.2, 0.8),
                friction: 0.05,
            },
            &[
                Feature::SchrodingersCat,
                Feature::QuantumSuperposition,
                Feature::EntanglementEffects,
                Feature::MultipleOutcomes,
            ],
        ),
    ]
}

/// Ordered, validated set of arenas owned by one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Arena>", into = "Vec<Arena>")]
pub struct ArenaCatalog {
    arenas: Vec<Arena>,
}

impl TryFrom<Vec<Arena>> for ArenaCatalog {
    type Error = SimError;

    fn try_from(arenas: Vec<Arena>) -> Result<Self> {
        Self::from_arenas(arenas)
    }
}

impl From<ArenaCatalog> for Vec<Arena> {
    fn from(catalog: ArenaCatalog) -> Self {
        catalog.arenas
    }
}

impl ArenaCatalog {
    /// Catalog built from the canonical seed arenas
    pub fn seeded() -> Result<Self> {
        Self::from_arenas(seed_arenas())
    }

    /// Validate and sort arena definitions.
    ///
    /// Ids must be exactly 1..=N and every physics range well-formed. Arena 1
    /// is forced unlocked.
    pub fn from_arenas(mut arenas: Vec<Arena>) -> Result<Self> {
        if arenas.is_empty() {
            return Err(SimError::InvalidCatalog("no arenas defined".into()));
        }
        arenas.sort_by_key(|a| a.id);
        for (expected, arena) in (1..).zip(arenas.iter()) {
            if arena.id != expected {
                return Err(SimError::InvalidCatalog(format!(
                    "arena ids must be dense from 1, found {} at position {}",
                    arena.id, expected
                )));
            }
            arena.physics.validate()?;
        }
        arenas[0].unlocked = true;
        log::debug!("Arena catalog loaded with {} arenas", arenas.len());
        Ok(Self { arenas })
    }

    /// All arenas by ascending id
    pub fn list_arenas(&self) -> &[Arena] {
        &self.arenas
    }

    pub fn len(&self) -> usize {
        self.arenas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arenas.is_empty()
    }

    pub fn get_arena(&self, id: ArenaId) -> Result<&Arena> {
        self.index_of(id)
            .map(|i| &self.arenas[i])
            .ok_or(SimError::NotFound { id })
    }

    /// Mark an arena unlocked. Idempotent.
    pub fn unlock(&mut self, id: ArenaId) -> Result<&Arena> {
        let i = self.index_of(id).ok_or(SimError::NotFound { id })?;
        let arena = &mut self.arenas[i];
        if !arena.unlocked {
            arena.unlocked = true;
            log::info!("Arena {} ({}) unlocked", arena.id, arena.name);
        }
        Ok(arena)
    }

    /// Arena gated behind `id`, if any
    pub fn next_arena(&self, id: ArenaId) -> Option<&Arena> {
        let next = id.checked_add(1)?;
        self.get_arena(next).ok()
    }

    /// Linear gating: arena 1 is always open, arena k > 1 needs arena k-1
    /// both unlocked and completed.
    pub fn can_access(&self, completed_arenas: &BTreeSet<ArenaId>, id: ArenaId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        if id == 1 {
            return true;
        }
        match self.get_arena(id - 1) {
            Ok(previous) => previous.unlocked && completed_arenas.contains(&previous.id),
            Err(_) => false,
        }
    }

    /// Theme slug for an arena, `DEFAULT_THEME` for unknown ids
    pub fn theme_key(&self, id: ArenaId) -> String {
        self.get_arena(id)
            .map(Arena::theme_key)
            .unwrap_or_else(|_| DEFAULT_THEME.to_string())
    }

    /// Copy an arena's physics and features into a session
    pub fn apply_physics(&self, id: ArenaId, session: &mut GameSession) -> Result<()> {
        let arena = self.get_arena(id)?;
        session.apply_arena(arena);
        Ok(())
    }

    fn index_of(&self, id: ArenaId) -> Option<usize> {
        // Ids are dense from 1
        let i = usize::try_from(id).ok()?.checked_sub(1)?;
        (i < self.arenas.len()).then_some(i)
    }
}
