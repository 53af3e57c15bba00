//! The bird
//!
//! A finite-state machine over {Spawning, Flying, DivingDown, DivingUp,
//! Pooping, Dead}. Continuous flight advances one unit per frame along the
//! current heading; steering is a fixed rotation step while the left/right
//! bindings are down. Leaving the world bounds forces a turn-around
//! maneuver: rotate 180 degrees, then nudge back inside, so the bird can
//! never permanently escape without an instant snap.

use glam::Vec2;
use rand::Rng;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::{BIRD_ROTATE_SPEED, BIRD_TURN_AROUND_OFFSET, WORLD_MAX, WORLD_MIN};
use crate::input::{InputState, bindings};
use crate::{Rect, heading};

use super::anim::Animation;
use super::events::{EventBus, EventKind, EventPayload};

pub const BIRD_WIDTH: f32 = 32.0;
pub const BIRD_HEIGHT: f32 = 32.0;

/// First-round spawn position, just off the west edge
const SPAWN_POSITION: Vec2 = Vec2::new(-10.0, 640.0);
/// Where later rounds start the bird, already inside the bounds
const RESPAWN_POSITION: Vec2 = Vec2::new(200.0, 640.0);
/// Fly-in target for the first spawn
const FLY_IN_TARGET: Vec2 = Vec2::new(200.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdState {
    Spawning,
    Flying,
    DivingDown,
    DivingUp,
    Pooping,
    Dead,
}

#[derive(Debug)]
pub struct Bird {
    state: BirdState,
    position: Vec2,
    rotation: f32,
    origin: Vec2,
    can_move: bool,
    flapped: bool,
    turning_around: bool,
    target_rotation: f32,
    /// Only the axis being corrected is set; the other stays zero
    target_position: Vec2,
    death_reported: bool,
    flying_clip: Animation,
    dive_down_clip: Animation,
    dive_up_clip: Animation,
    poop_clip: Animation,
    dead_clip: Animation,
}

impl Bird {
    pub fn new() -> Self {
        let mut bird = Self {
            state: BirdState::Spawning,
            position: SPAWN_POSITION,
            rotation: 0.0,
            origin: Vec2::new(BIRD_WIDTH / 2.0, BIRD_HEIGHT / 2.0),
            can_move: false,
            flapped: false,
            turning_around: true,
            target_rotation: 0.0,
            target_position: FLY_IN_TARGET,
            death_reported: false,
            flying_clip: Animation::looping(4, 0.1),
            dive_down_clip: Animation::one_shot(5, 0.08),
            dive_up_clip: Animation::one_shot(5, 0.08),
            poop_clip: Animation::one_shot(6, 0.06),
            dead_clip: Animation::one_shot(8, 0.1),
        };
        bird.reset(false);
        bird
    }

    pub fn state(&self) -> BirdState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn width(&self) -> f32 {
        BIRD_WIDTH
    }

    pub fn height(&self) -> f32 {
        BIRD_HEIGHT
    }

    /// Sprite bounds used by drone collision and dive-steal tests
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, BIRD_WIDTH, BIRD_HEIGHT)
    }

    /// Reset between rounds. The bird instance persists for the whole
    /// session; only the first round flies in from off-screen.
    pub fn reset(&mut self, played_before: bool) {
        self.state = BirdState::Spawning;
        self.reset_clips();
        self.flapped = false;
        self.position = SPAWN_POSITION;
        self.rotation = 0.0;
        self.target_rotation = 0.0;
        self.death_reported = false;

        if played_before {
            self.position = RESPAWN_POSITION;
            self.turning_around = false;
            self.allow_control();
        } else {
            self.target_position = FLY_IN_TARGET;
        }
    }

    pub fn allow_movement(&mut self, movement: bool) {
        self.can_move = movement;
    }

    /// Hand control to the player once the intro finishes
    pub fn allow_control(&mut self) {
        if self.state == BirdState::Spawning {
            self.state = BirdState::Flying;
        }
    }

    /// External hazards (drones) kill the bird mid-air only
    pub fn kill(&mut self) {
        if matches!(self.state, BirdState::Flying | BirdState::Pooping) {
            log::info!("bird killed at {:?}", self.position);
            self.state = BirdState::Dead;
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        bus: &mut EventBus,
        audio: &mut AudioManager,
        rng: &mut impl Rng,
    ) {
        match self.state {
            BirdState::Spawning => {
                self.advance();
                self.flying_clip.update(dt);
            }
            BirdState::Flying => self.fly_update(dt, input, audio, rng),
            BirdState::DivingDown => {
                self.dive_down_clip.update(dt);
                if self.dive_down_clip.at_end() {
                    self.swap_to(BirdState::DivingUp);
                }
            }
            BirdState::DivingUp => {
                self.dive_up_clip.update(dt);
                if self.dive_up_clip.at_end() {
                    self.swap_to(BirdState::Flying);
                }
            }
            BirdState::Pooping => {
                self.poop_clip.update(dt);
                if self.poop_clip.at_end() {
                    self.swap_to(BirdState::Flying);
                    audio.play(SoundEffect::Poop);
                    bus.fire_with(EventKind::PoopSpawned, EventPayload::Point(self.position));
                }
            }
            BirdState::Dead => {
                self.dead_clip.update(dt);
                if self.dead_clip.at_end() && !self.death_reported {
                    // One-shot: Dead is re-evaluated every frame but the
                    // event must fire exactly once per round
                    self.death_reported = true;
                    bus.fire(EventKind::BirdDead);
                }
            }
        }
    }

    fn fly_update(&mut self, dt: f32, input: &InputState, audio: &mut AudioManager, rng: &mut impl Rng) {
        self.advance();
        self.flying_clip.update(dt);
        self.flap_cue(audio, rng);

        if self.turning_around {
            self.turn_around();
            return;
        }

        self.check_bounds();

        if input.pressed(bindings::LEFT) || input.held(bindings::LEFT) {
            self.rotation -= BIRD_ROTATE_SPEED;
        }
        if input.pressed(bindings::RIGHT) || input.held(bindings::RIGHT) {
            self.rotation += BIRD_ROTATE_SPEED;
        }

        if input.pressed(bindings::DIVE) {
            audio.play(SoundEffect::Dive);
            self.swap_to(BirdState::DivingDown);
        }

        if input.pressed(bindings::POOP) {
            self.swap_to(BirdState::Pooping);
        }
    }

    /// One flap sound per animation loop, edge-triggered on the last frame
    fn flap_cue(&mut self, audio: &mut AudioManager, rng: &mut impl Rng) {
        let on_last = self.flying_clip.current_frame() == self.flying_clip.last_frame();
        if on_last && !self.flapped {
            self.flapped = true;
            let effect = if rng.random_range(0..2) == 0 {
                SoundEffect::WingsFlap1
            } else {
                SoundEffect::WingsFlap2
            };
            audio.play(effect);
        } else if self.flapped && !on_last {
            self.flapped = false;
        }
    }

    /// Crossing any world edge starts the forced 180-degree maneuver
    fn check_bounds(&mut self) {
        use std::f32::consts::PI;

        if self.position.x < WORLD_MIN {
            self.turning_around = true;
            self.target_rotation = self.rotation + PI;
            self.target_position = Vec2::new(self.position.x + BIRD_TURN_AROUND_OFFSET, 0.0);
        } else if self.position.y < WORLD_MIN {
            self.turning_around = true;
            self.target_rotation = self.rotation + PI;
            self.target_position = Vec2::new(0.0, self.position.y + BIRD_TURN_AROUND_OFFSET);
        } else if self.position.x > WORLD_MAX {
            self.turning_around = true;
            self.target_rotation = self.rotation - PI;
            self.target_position = Vec2::new(self.position.x - BIRD_TURN_AROUND_OFFSET, 0.0);
        } else if self.position.y > WORLD_MAX {
            self.turning_around = true;
            self.target_rotation = self.rotation - PI;
            self.target_position = Vec2::new(0.0, self.position.y - BIRD_TURN_AROUND_OFFSET);
        }
    }

    /// Ease rotation to the target first, then nudge the crossed axis back
    /// inside until both are within tolerance
    fn turn_around(&mut self) {
        let settle = BIRD_TURN_AROUND_OFFSET / 4.0;

        if self.rotation > self.target_rotation - BIRD_ROTATE_SPEED
            && self.rotation < self.target_rotation + BIRD_ROTATE_SPEED
        {
            if self.target_position.x != 0.0 && self.position.x < self.target_position.x - settle {
                self.position.x += 1.0;
            } else if self.target_position.x != 0.0 && self.position.x > self.target_position.x + settle {
                self.position.x -= 1.0;
            } else if self.target_position.y != 0.0 && self.position.y < self.target_position.y - settle {
                self.position.y += 1.0;
            } else if self.target_position.y != 0.0 && self.position.y > self.target_position.y + settle {
                self.position.y -= 1.0;
            } else {
                self.turning_around = false;
            }
        } else if self.rotation < self.target_rotation {
            self.rotation += BIRD_ROTATE_SPEED;
        } else {
            self.rotation -= BIRD_ROTATE_SPEED;
        }
    }

    fn advance(&mut self) {
        if self.can_move {
            self.position += heading(self.rotation);
        }
    }

    fn swap_to(&mut self, state: BirdState) {
        self.state = state;
        self.reset_clips();
    }

    fn reset_clips(&mut self) {
        self.flying_clip.reset();
        self.dive_down_clip.reset();
        self.dive_up_clip.reset();
        self.poop_clip.reset();
        self.dead_clip.reset();
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}
