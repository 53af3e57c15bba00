//! Camera
//!
//! Lagged exponential follow of the bird, engaged once the `SpawnBird`
//! signal is observed and suspended while the bird is dead so the death
//! sequence stays framed. Also owns the world-to-screen scale (uniform,
//! derived from viewport height so aspect changes crop rather than
//! stretch) and the three visibility predicates the spawn/despawn policy
//! and sound triggers rely on.

use glam::Vec2;

use crate::consts::BASE_HEIGHT;

use super::bird::{Bird, BirdState};
use super::characters::Actor;
use super::events::{EventBus, EventKind};
use super::spawn::SpawnPoint;

const START_POSITION: Vec2 = Vec2::new(300.0, 640.0);
const FOLLOW_SPEED: f32 = 1.25;

/// Extra slack for poop visibility tests
const POOP_PAD: f32 = 4.0;
/// Spawn points get a generous pad so actors never pop in on screen
const SPAWN_POINT_PAD: f32 = 30.0;

/// World-to-screen transform for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// World position at the top-left of the screen
    pub translation: Vec2,
    pub scale: f32,
}

#[derive(Debug)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    scale: f32,
    following: bool,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        let mut camera = Self {
            position: START_POSITION,
            viewport,
            scale: 1.0,
            following: false,
        };
        camera.rescale();
        camera
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn reset(&mut self) {
        self.position = START_POSITION;
    }

    /// Half the visible world area on each axis
    fn half_extents(&self) -> Vec2 {
        self.viewport / self.scale / 2.0
    }

    fn rescale(&mut self) {
        self.scale = self.viewport.y / BASE_HEIGHT;
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            translation: self.position - self.half_extents(),
            scale: self.scale,
        }
    }

    pub fn update(&mut self, dt: f32, bird: &Bird, bus: &EventBus, viewport: Vec2) {
        if bus.exists(EventKind::ResolutionChanged) {
            self.viewport = viewport;
            self.rescale();
            log::info!("camera rescaled: viewport {:?}, scale {}", viewport, self.scale);
        }

        if self.following {
            // Hold position while dead so the death sequence stays in frame
            if bird.state() != BirdState::Dead {
                self.position += (bird.position() - self.position) * FOLLOW_SPEED * dt;
            }
        } else if bus.exists(EventKind::SpawnBird) {
            self.following = true;
        }
    }

    /// AABB test against the camera extents with per-axis padding
    fn in_view(&self, min: Vec2, max: Vec2) -> bool {
        let half = self.half_extents();
        !(max.x < self.position.x - half.x
            || min.x > self.position.x + half.x
            || max.y < self.position.y - half.y
            || min.y > self.position.y + half.y)
    }

    pub fn actor_in_view(&self, actor: &Actor) -> bool {
        self.bounds_in_view(actor.position(), actor.origin(), actor.width(), actor.height())
    }

    /// Same test with the actor's fields spelled out, for callers that are
    /// mid-mutation on the actor itself
    pub fn bounds_in_view(&self, position: Vec2, origin: Vec2, width: f32, height: f32) -> bool {
        self.in_view(position - origin, position + Vec2::new(width, height))
    }

    pub fn poop_in_view(&self, position: Vec2) -> bool {
        self.in_view(position - POOP_PAD, position + POOP_PAD)
    }

    pub fn spawn_point_in_view(&self, point: &SpawnPoint) -> bool {
        self.in_view(point.position - SPAWN_POINT_PAD, point.position + SPAWN_POINT_PAD)
    }
}
