//! Swoop - a bird-over-town arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird state machine, actor roster,
//!   waypoint AI, event bus, camera, orchestrator)
//! - `audio`: Sound-effect command layer (device backend is the host's job)
//! - `input`: Binding-based input snapshots
//! - `save`: Persisted settings (best-effort, line-per-field file)
//! - `strings`: Localized string table with built-in defaults

pub mod audio;
pub mod input;
pub mod save;
pub mod sim;
pub mod strings;

pub use save::SaveData;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Base resolution the world-to-screen scale is derived from
    pub const BASE_WIDTH: f32 = 640.0;
    pub const BASE_HEIGHT: f32 = 480.0;

    /// Region the bird is kept inside (min x/y, max x/y)
    pub const WORLD_MIN: f32 = 96.0;
    pub const WORLD_MAX: f32 = 928.0;

    /// Bird flight tuning
    pub const BIRD_ROTATE_SPEED: f32 = 0.025;
    pub const BIRD_TURN_AROUND_OFFSET: f32 = 20.0;

    /// Walk speed of roaming pedestrians (units per frame)
    pub const ROAM_SPEED: f32 = 0.25;
    /// Drone pursuit speed (units per frame)
    pub const DRONE_SPEED: f32 = 0.5;

    /// Roster cap (drones not counted)
    pub const MAX_CHARACTERS: usize = 60;

    /// Seconds an actor must live before the despawn sweep may take it
    pub const MIN_LIFETIME_SECS: f32 = 10.0;
    /// Despawn also requires being at least this far from the bird
    pub const DESPAWN_DISTANCE: f32 = 100.0;

    /// Unconsumed events are swept after this long
    pub const EVENT_EXPIRY_SECS: f32 = 1.0;

    /// Node grid tile size in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Lane offsets keeping opposite-direction walkers visually apart
    pub const LANE_OFFSET_NORTH: f32 = 8.0;
    pub const LANE_OFFSET_SOUTH: f32 = 24.0;
}

/// Axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test, matching the event-bus bounds filter
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Facing angle toward `direction` in sprite space (sprites face down-screen
/// at zero rotation, so this is not the math convention).
#[inline]
pub fn sprite_facing_angle(direction: Vec2) -> f32 {
    (-direction.x).atan2(direction.y) - std::f32::consts::FRAC_PI_2
}

/// Unit heading vector for a rotation angle
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 8.0, 8.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(18.0, 18.0)));
        assert!(!r.contains(Vec2::new(18.1, 18.0)));
        assert!(!r.contains(Vec2::new(9.9, 12.0)));
    }

    #[test]
    fn test_heading_is_unit() {
        for i in 0..8 {
            let v = heading(i as f32 * 0.5);
            assert!((v.length() - 1.0).abs() < 1e-6);
        }
    }
}
