//! End-to-end: a player works through the arena chain session by session.

use slap_arena::sim::CollisionBox;
use slap_arena::{
    ArenaCatalog, GameSession, ProgressionEvent, ProgressionState, SessionPhase, SimError,
    SlapInput,
};

/// Covers the launch point, so every slap lands on its first sample
fn point_blank() -> [CollisionBox; 1] {
    [CollisionBox::new(-20.0, -20.0, 40.0, 40.0)]
}

fn clear_arena(
    seed: u64,
    arena_id: u32,
    catalog: &mut ArenaCatalog,
    progress: &mut ProgressionState,
) -> Vec<ProgressionEvent> {
    let mut session = GameSession::new(seed);
    session.start_game(catalog, progress, arena_id).unwrap();
    while !session.arena_cleared() {
        session
            .slap(SlapInput::new(100.0, 45.0), &point_blank())
            .unwrap();
    }
    session.end_session().unwrap();
    session.claim_rewards(progress, catalog).unwrap()
}

#[test]
fn test_full_arena_chain() {
    let mut catalog = ArenaCatalog::seeded().unwrap();
    let mut progress = ProgressionState::new("user123");

    for id in 1..=4 {
        assert!(catalog.can_access(progress.completed_arenas(), id));
        if id < 4 {
            assert!(!catalog.can_access(progress.completed_arenas(), id + 1));
        }
        let events = clear_arena(id as u64, id, &mut catalog, &mut progress);
        assert!(events.contains(&ProgressionEvent::ArenaCompleted { id }));
    }

    assert_eq!(progress.completed_arenas().len(), 4);
    for name in [
        "Master of Novice Grounds",
        "Master of Glitch Valley",
        "Master of Myth Caverns",
        "Master of Quantum Field",
    ] {
        assert!(progress.has_achievement(name), "missing {name}");
    }
    assert!(catalog.list_arenas().iter().all(|a| a.unlocked));
    assert!(progress.level() >= 1);
}

#[test]
fn test_replaying_cleared_arena_adds_xp_only() {
    let mut catalog = ArenaCatalog::seeded().unwrap();
    let mut progress = ProgressionState::new("user123");
    clear_arena(1, 1, &mut catalog, &mut progress);
    let achievements = progress.achievements().len();
    let xp = progress.xp();

    let events = clear_arena(2, 1, &mut catalog, &mut progress);
    assert!(progress.xp() > xp);
    assert_eq!(progress.achievements().len(), achievements);
    assert_eq!(progress.completed_arenas().len(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, ProgressionEvent::ArenaCompleted { .. })));
}

#[test]
fn test_players_do_not_share_unlocks() {
    let seed_catalog = ArenaCatalog::seeded().unwrap();
    let mut alice_catalog = seed_catalog.clone();
    let bob_catalog = seed_catalog.clone();
    let mut alice = ProgressionState::new("alice");
    let bob = ProgressionState::new("bob");

    clear_arena(1, 1, &mut alice_catalog, &mut alice);
    assert!(alice_catalog.can_access(alice.completed_arenas(), 2));
    assert!(!bob_catalog.can_access(bob.completed_arenas(), 2));

    let mut session = GameSession::new(9);
    assert_eq!(
        session.start_game(&bob_catalog, &bob, 2),
        Err(SimError::ArenaLocked { id: 2 })
    );
    assert_eq!(session.phase(), SessionPhase::Menu);
}

#[test]
fn test_progress_snapshot_survives_json() {
    let mut catalog = ArenaCatalog::seeded().unwrap();
    let mut progress = ProgressionState::new("user123");
    clear_arena(5, 1, &mut catalog, &mut progress);

    let json = serde_json::to_string(&progress.snapshot()).unwrap();
    let restored: ProgressionState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.level(), progress.level());
    assert_eq!(restored.xp(), progress.xp());
    assert_eq!(restored.completed_arenas(), progress.completed_arenas());
    assert_eq!(restored.achievements(), progress.achievements());
}

#[test]
fn test_summary_json_shape() {
    let catalog = ArenaCatalog::seeded().unwrap();
    let progress = ProgressionState::new("user123");
    let mut session = GameSession::new(1);
    session.start_game(&catalog, &progress, 1).unwrap();
    session
        .slap(SlapInput::new(60.0, 30.0), &point_blank())
        .unwrap();
    let summary = session.end_session().unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["arenaId"], 1);
    assert_eq!(value["arenaName"], "Novice Grounds");
    assert_eq!(value["stats"]["successfulSlaps"], 1);
    assert_eq!(value["stats"]["highestCombo"], 1);
}
