//! Poop projectile / decal
//!
//! Spawned at the bird's position, falls until its drop animation finishes,
//! fires `PoopLanded` once at the landing position, then sits as a stain.
//! If a character claims the landing hit, the stain attaches to them by
//! actor id and follows at a fixed offset. When the actor is later removed
//! the handle stops resolving and the stain freezes where it last was.

use glam::Vec2;

use crate::audio::{AudioManager, SoundEffect};

use super::anim::Animation;
use super::characters::ActorId;
use super::events::{EventBus, EventKind, EventPayload};

pub type PoopId = u32;

#[derive(Debug, Clone)]
pub struct Poop {
    pub id: PoopId,
    position: Vec2,
    rotation: f32,
    falling: bool,
    fall_clip: Animation,
    attached_to: Option<ActorId>,
    attached_offset: Vec2,
}

impl Poop {
    pub fn new(id: PoopId, position: Vec2) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            falling: true,
            fall_clip: Animation::one_shot(4, 0.1),
            attached_to: None,
            attached_offset: Vec2::ZERO,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn falling(&self) -> bool {
        self.falling
    }

    pub fn attached_to(&self) -> Option<ActorId> {
        self.attached_to
    }

    /// Claimed by a character hit test; the stain follows them from now on.
    pub fn attach(&mut self, actor: ActorId, offset: Vec2) {
        self.attached_to = Some(actor);
        self.attached_offset = offset;
    }

    /// Called by the orchestrator when the attached actor still resolves
    pub fn follow(&mut self, actor_position: Vec2, actor_rotation: f32) {
        self.position = actor_position + self.attached_offset;
        self.rotation = actor_rotation;
    }

    pub fn update(&mut self, dt: f32, bus: &mut EventBus, audio: &mut AudioManager) {
        if self.falling {
            self.fall_clip.update(dt);
            if self.fall_clip.at_end() {
                self.falling = false;
                audio.play(SoundEffect::Splat);
                bus.fire_with(
                    EventKind::PoopLanded,
                    EventPayload::PoopAt {
                        poop: self.id,
                        position: self.position,
                    },
                );
            }
        }
    }
}
