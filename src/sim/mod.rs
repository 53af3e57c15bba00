//! Deterministic game simulation
//!
//! Everything in here steps on a fixed timestep with an injected RNG and no
//! device handles; the host feeds input snapshots in and drains audio
//! commands and render state out.

pub mod anim;
pub mod bird;
pub mod camera;
pub mod characters;
pub mod events;
pub mod graph;
pub mod intro;
pub mod poop;
pub mod score;
pub mod spawn;
pub mod world;

pub use bird::{Bird, BirdState};
pub use camera::Camera;
pub use characters::{Actor, ActorKind};
pub use events::{EventBus, EventKind, EventPayload};
pub use world::{GameWorld, ScoreSummary, WorldState};
