//! Slap Arena demo entry point
//!
//! Plays one seeded session per arena with a scripted sweep of slaps, feeding
//! the rewards into a single player's progression, then prints the summaries
//! and the final progression snapshot as JSON.
//!
//! Usage: `slap-arena [seed] [tuning.json]`

use std::error::Error;

use slap_arena::sim::CollisionBox;
use slap_arena::{ArenaCatalog, GameSession, ProgressionState, SlapInput, Tuning};

const DEFAULT_SEED: u64 = 0x5EED;
/// Slap attempts per arena before giving up
const MAX_SLAPS_PER_ARENA: u32 = 40;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    log::info!("Slap Arena (native) starting with seed {seed}");
    if let Err(e) = run(seed, tuning) {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(seed: u64, tuning: Tuning) -> Result<(), Box<dyn Error>> {
    let mut catalog = ArenaCatalog::seeded()?;
    let mut progress = ProgressionState::new("demo-player");
    // Ground-level target near the flat-ground range of a 75-power 45-degree slap
    let targets = [
        CollisionBox::new(520.0, 0.0, 80.0, 60.0),
        CollisionBox::new(250.0, 120.0, 60.0, 60.0),
    ];

    let arena_ids: Vec<_> = catalog.list_arenas().iter().map(|a| a.id).collect();
    for (offset, arena_id) in (0u64..).zip(arena_ids) {
        if !catalog.can_access(progress.completed_arenas(), arena_id) {
            println!(
                "Arena {} ({}) still locked, stopping",
                arena_id,
                catalog.theme_key(arena_id)
            );
            break;
        }

        let mut session = GameSession::with_tuning(seed.wrapping_add(offset), tuning.clone());
        session.start_game(&catalog, &progress, arena_id)?;

        for i in 0..MAX_SLAPS_PER_ARENA {
            if session.arena_cleared() {
                break;
            }
            let input = SlapInput::new(70.0 + f64::from(i % 6), 40.0 + f64::from(i % 11));
            let outcome = session.slap(input, &targets)?;
            log::debug!(
                "Slap {i}: g={:.2} hit={} points={}",
                outcome.physics.gravity,
                outcome.hit.is_some(),
                outcome.points
            );
        }

        let summary = session.end_session()?;
        println!("{}", serde_json::to_string_pretty(&summary)?);

        for event in session.claim_rewards(&mut progress, &mut catalog)? {
            println!("  event: {}", serde_json::to_string(&event)?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&progress.snapshot())?);
    println!("Level progress: {:.1}%", progress.xp_progress());
    Ok(())
}
