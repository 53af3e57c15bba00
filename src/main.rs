//! Headless demo driver
//!
//! Runs the simulation at its fixed timestep with a scripted pilot for a
//! while and prints what happened. Useful for profiling the core and for
//! eyeballing spawn/score behavior without a renderer attached; a real
//! frontend would pump window input into `InputState` and draw from the
//! world's accessors instead.

use std::time::{SystemTime, UNIX_EPOCH};

use swoop::SaveData;
use swoop::consts::SIM_DT;
use swoop::input::{InputState, Key};
use swoop::sim::{GameWorld, WorldState};

/// Simulated seconds to run for
const DEMO_SECS: u32 = 60;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    log::info!("seed {seed}");

    let mut world = GameWorld::new(seed, SaveData::load());
    let mut input = InputState::new();

    // Dismiss the title, then wander: gentle turns, a poop every couple of
    // seconds, the odd dive
    input.begin_frame(&[Key::Space]);
    world.update(SIM_DT, &input);

    let mut commands = 0usize;
    for frame in 0..DEMO_SECS * 60 {
        let keys: &[Key] = match frame % 150 {
            0..30 => &[Key::A],
            60 => &[Key::ShiftLeft],
            100 => &[Key::Space],
            _ => &[],
        };
        input.begin_frame(keys);
        world.update(SIM_DT, &input);
        commands += world.audio_mut().drain_commands().len();

        if world.state() == WorldState::Score {
            // Scripted pilot met a drone; go again
            input.begin_frame(&[Key::Space]);
            world.update(SIM_DT, &input);
            input.begin_frame(&[]);
        }
    }

    println!(
        "{}s simulated: score {}, {} actors on the roster, {} audio commands",
        DEMO_SECS,
        world.score().current_score(),
        world.actors().len(),
        commands,
    );
    if let Some(summary) = world.summary() {
        println!("last round ended at {} (best {})", summary.score, summary.high_score);
    }
}
