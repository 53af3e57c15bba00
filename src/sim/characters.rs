//! The actor roster: roaming pedestrians, parked cars, pursuit drones
//!
//! One `Actor` struct carries the fields every kind shares (position,
//! lifetime, claimed spawn point); the closed `ActorKind` sum holds the
//! per-kind state. Pedestrians walk a pre-derived node route and claim
//! `PoopLanded` events against three hit regions; cars are stationary
//! targets; drones chase the bird and kill on contact.

use glam::Vec2;
use rand::Rng;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::{DRONE_SPEED, MIN_LIFETIME_SECS, ROAM_SPEED};
use crate::{Rect, sprite_facing_angle};

use super::anim::Animation;
use super::bird::{Bird, BirdState};
use super::camera::Camera;
use super::events::{EventBus, EventKind, EventPayload};
use super::graph::{NodeGraph, NodeIndex};
use super::poop::Poop;
use super::score::{ScoreCounter, Target};
use super::spawn::{SpawnPointId, SpawnRegistry};

pub type ActorId = u32;

const PEDESTRIAN_SIZE: Vec2 = Vec2::new(16.0, 16.0);
const CAR_SIZE: Vec2 = Vec2::new(32.0, 24.0);
const DRONE_SIZE: Vec2 = Vec2::new(24.0, 24.0);

/// How close a walker must get to a node before stepping to the next one
const NODE_TOLERANCE: f32 = 4.0;
/// Half-width of the dive-steal overlap window around the carried item
const STEAL_REACH: f32 = 8.0;
/// Roaming walkers free their spawn point this long after appearing
const ROAM_VACATE_SECS: f32 = 1.0;
/// Number of pedestrian sprite skins
const SKIN_COUNT: u8 = 6;

/// Everything an actor may touch during its update
pub struct ActorCtx<'a> {
    pub dt: f32,
    pub bus: &'a mut EventBus,
    pub audio: &'a mut AudioManager,
    pub score: &'a mut ScoreCounter,
    pub spawns: &'a mut SpawnRegistry,
    pub graph: &'a NodeGraph,
    pub camera: &'a Camera,
    pub bird: &'a mut Bird,
    pub poops: &'a mut [Poop],
}

/// Items a pedestrian may carry, each worth points two ways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Coffee,
    IceCream,
    Chips,
}

impl Item {
    fn poop_target(self) -> Target {
        match self {
            Item::Coffee => Target::PoopCoffee,
            Item::IceCream => Target::PoopIceCream,
            Item::Chips => Target::PoopChips,
        }
    }

    fn dive_target(self) -> Target {
        match self {
            Item::Coffee => Target::DiveCoffee,
            Item::IceCream => Target::DiveIceCream,
            Item::Chips => Target::DiveChips,
        }
    }
}

#[derive(Debug)]
pub struct Roaming {
    skin: u8,
    route: Vec<NodeIndex>,
    next_hop: usize,
    held: Option<Item>,
    walk_clip: Animation,
}

#[derive(Debug)]
pub struct StaticCar;

#[derive(Debug)]
pub struct Drone {
    rotor_clip: Animation,
    was_visible: bool,
}

#[derive(Debug)]
pub enum ActorKind {
    Roaming(Roaming),
    Static(StaticCar),
    Drone(Drone),
}

#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    position: Vec2,
    rotation: f32,
    lifetime: f32,
    /// Seconds before the despawn sweep may take this actor. Negative means
    /// never; drones leave on their own terms.
    min_lifetime: f32,
    spawn_point: SpawnPointId,
    vacated: bool,
    kind: ActorKind,
}

impl Actor {
    pub fn roaming(
        id: ActorId,
        spawn_point: SpawnPointId,
        position: Vec2,
        route: Vec<NodeIndex>,
        rng: &mut impl Rng,
    ) -> Self {
        let held = if rng.random_range(0..5) >= 3 {
            Some(match rng.random_range(0..3) {
                0 => Item::Coffee,
                1 => Item::IceCream,
                _ => Item::Chips,
            })
        } else {
            None
        };

        Self {
            id,
            position,
            rotation: 0.0,
            lifetime: 0.0,
            min_lifetime: MIN_LIFETIME_SECS,
            spawn_point,
            vacated: false,
            kind: ActorKind::Roaming(Roaming {
                skin: rng.random_range(1..=SKIN_COUNT),
                route,
                next_hop: 0,
                held,
                walk_clip: Animation::looping(2, 0.3),
            }),
        }
    }

    pub fn static_car(id: ActorId, spawn_point: SpawnPointId, position: Vec2) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            lifetime: 0.0,
            min_lifetime: MIN_LIFETIME_SECS,
            spawn_point,
            vacated: false,
            kind: ActorKind::Static(StaticCar),
        }
    }

    pub fn drone(id: ActorId, spawn_point: SpawnPointId, position: Vec2) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            lifetime: 0.0,
            min_lifetime: -1.0,
            spawn_point,
            vacated: false,
            kind: ActorKind::Drone(Drone {
                rotor_clip: Animation::looping(4, 0.05),
                was_visible: false,
            }),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn spawn_point(&self) -> SpawnPointId {
        self.spawn_point
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn kind(&self) -> &ActorKind {
        &self.kind
    }

    pub fn is_drone(&self) -> bool {
        matches!(self.kind, ActorKind::Drone(_))
    }

    /// The carried item, if this is a pedestrian still holding one
    pub fn carrying(&self) -> Option<Item> {
        match &self.kind {
            ActorKind::Roaming(r) => r.held,
            _ => None,
        }
    }

    fn size(&self) -> Vec2 {
        match self.kind {
            ActorKind::Roaming(_) => PEDESTRIAN_SIZE,
            ActorKind::Static(_) => CAR_SIZE,
            ActorKind::Drone(_) => DRONE_SIZE,
        }
    }

    pub fn width(&self) -> f32 {
        self.size().x
    }

    pub fn height(&self) -> f32 {
        self.size().y
    }

    pub fn origin(&self) -> Vec2 {
        self.size() / 2.0
    }

    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::new(self.position.x, self.position.y, size.x, size.y)
    }

    /// Lifetime gate of the despawn sweep; visibility and distance are the
    /// orchestrator's part of the test.
    pub fn despawn_eligible(&self) -> bool {
        self.min_lifetime > 0.0 && self.lifetime > self.min_lifetime
    }

    #[cfg(test)]
    pub fn set_lifetime(&mut self, secs: f32) {
        self.lifetime = secs;
    }

    /// Remove the actor from play, freeing its spawn point
    pub fn kill(&mut self, spawns: &mut SpawnRegistry) {
        if !self.vacated {
            self.vacated = true;
            spawns.vacate(self.spawn_point);
        }
    }

    pub fn update(&mut self, ctx: &mut ActorCtx) {
        self.lifetime += ctx.dt;

        // Split borrow: the kind is mutated while the shared fields are
        // passed in separately.
        let mut body = ActorBody {
            id: self.id,
            position: self.position,
            rotation: self.rotation,
            lifetime: self.lifetime,
            size: self.size(),
        };

        let vacate = match &mut self.kind {
            ActorKind::Roaming(r) => r.update(&mut body, ctx, self.vacated),
            ActorKind::Static(c) => c.update(&mut body, ctx),
            ActorKind::Drone(d) => d.update(&mut body, ctx, !self.vacated),
        };

        self.position = body.position;
        self.rotation = body.rotation;

        if vacate && !self.vacated {
            self.vacated = true;
            ctx.spawns.vacate(self.spawn_point);
        }
    }
}

/// The shared fields, detached from the kind for the split borrow
struct ActorBody {
    id: ActorId,
    position: Vec2,
    rotation: f32,
    lifetime: f32,
    size: Vec2,
}

impl ActorBody {
    fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

impl Roaming {
    pub fn skin(&self) -> u8 {
        self.skin
    }

    pub fn walk_frame(&self) -> usize {
        self.walk_clip.current_frame()
    }

    /// Returns whether the spawn point should be vacated this frame.
    fn update(&mut self, body: &mut ActorBody, ctx: &mut ActorCtx, vacated: bool) -> bool {
        self.walk_clip.update(ctx.dt);
        self.walk(body, ctx.graph);
        self.dive_steal(body, ctx);
        self.claim_landings(body, ctx);
        !vacated && body.lifetime > ROAM_VACATE_SECS
    }

    /// Advance toward the current route node; step the cursor once inside
    /// the arrival tolerance. The route has no wrap: walkers hold course at
    /// the final node and are despawned long before it matters.
    fn walk(&mut self, body: &mut ActorBody, graph: &NodeGraph) {
        let target = graph.node(self.route[self.next_hop]).position;
        let to_target = target - body.position;

        if to_target.x.abs() <= NODE_TOLERANCE
            && to_target.y.abs() <= NODE_TOLERANCE
            && self.next_hop < self.route.len() - 1
        {
            self.next_hop += 1;
        }

        if to_target != Vec2::ZERO {
            let direction = to_target.normalize();
            body.rotation = sprite_facing_angle(direction);
            body.position += direction * ROAM_SPEED;
        }
    }

    /// Bird swooping up through the carried item snatches it
    fn dive_steal(&mut self, body: &mut ActorBody, ctx: &mut ActorCtx) {
        let Some(item) = self.held else { return };
        if ctx.bird.state() != BirdState::DivingUp {
            return;
        }

        let bird = ctx.bird.bounds();
        let overlaps = body.position.x + STEAL_REACH > bird.x
            && body.position.x - STEAL_REACH < bird.x + bird.w
            && body.position.y + STEAL_REACH > bird.y
            && body.position.y - STEAL_REACH < bird.y + bird.h;

        if overlaps {
            self.held = None;
            ctx.score.add(item.dive_target(), ctx.bus);
        }
    }

    /// Three landing regions, most valuable checked first: the carried item,
    /// then the head, then anywhere on the body. Each region consumes at
    /// most one `PoopLanded` per frame, but the regions are independent, so
    /// three separate stored poops can score in the same frame.
    fn claim_landings(&mut self, body: &mut ActorBody, ctx: &mut ActorCtx) {
        if let Some(item) = self.held {
            let item_bounds = Rect::new(body.position.x, body.position.y, 8.0, 8.0);
            if let Some(payload) = ctx.bus.consume_in_bounds(EventKind::PoopLanded, item_bounds) {
                ctx.score.add(item.poop_target(), ctx.bus);
                attach_poop(ctx.poops, payload, body);
            }
        }

        let center = body.position + body.size / 2.0;
        let head_bounds = Rect::new(center.x - 4.0, center.y - 4.0, 8.0, 8.0);
        if let Some(payload) = ctx.bus.consume_in_bounds(EventKind::PoopLanded, head_bounds) {
            ctx.score.add(Target::PoopHead, ctx.bus);
            attach_poop(ctx.poops, payload, body);
        }

        if let Some(payload) = ctx.bus.consume_in_bounds(EventKind::PoopLanded, body.bounds()) {
            ctx.score.add(Target::PoopJacket, ctx.bus);
            attach_poop(ctx.poops, payload, body);
        }
    }
}

impl StaticCar {
    fn update(&mut self, body: &mut ActorBody, ctx: &mut ActorCtx) -> bool {
        if let Some(payload) = ctx.bus.consume_in_bounds(EventKind::PoopLanded, body.bounds()) {
            ctx.score.add(Target::PoopCar, ctx.bus);
            attach_poop(ctx.poops, payload, body);
        }
        // Cars hold their slot until killed
        false
    }
}

impl Drone {
    pub fn rotor_frame(&self) -> usize {
        self.rotor_clip.current_frame()
    }

    /// Chase the bird while it lives; once it is dead, fly off toward the
    /// world origin forever. Drones are never retired mid-round.
    fn update(&mut self, body: &mut ActorBody, ctx: &mut ActorCtx, first_frame: bool) -> bool {
        self.rotor_clip.update(ctx.dt);

        let chasing = ctx.bird.state() != BirdState::Dead;
        let target = if chasing {
            ctx.bird.position()
        } else {
            Vec2::ZERO
        };

        let to_target = target - body.position;
        if to_target != Vec2::ZERO {
            let direction = to_target.normalize();
            // Drone sprites face the opposite way to pedestrians
            body.rotation = sprite_facing_angle(direction) + std::f32::consts::PI;
            body.position += direction * DRONE_SPEED;
        }

        if chasing && body.bounds().contains(ctx.bird.position()) {
            ctx.bird.kill();
        }

        self.visibility_cues(body, ctx);

        // The spawn point is released immediately; a drone's slot is only a
        // launch position.
        first_frame
    }

    /// Rotor loop and enter/leave stingers keyed on camera visibility edges
    fn visibility_cues(&mut self, body: &ActorBody, ctx: &mut ActorCtx) {
        let visible = ctx.camera.bounds_in_view(
            body.position,
            body.size / 2.0,
            body.size.x,
            body.size.y,
        );

        if visible && !self.was_visible {
            ctx.audio.play(SoundEffect::DroneEnter);
            ctx.audio.play_looping(SoundEffect::DroneFly);
        } else if !visible && self.was_visible {
            ctx.audio.play(SoundEffect::DroneLeave);
            ctx.audio.stop_looping(SoundEffect::DroneFly);
        }
        self.was_visible = visible;
    }
}

/// Stick the landed poop to the actor that claimed it, keeping its world
/// position as an offset from the actor.
fn attach_poop(poops: &mut [Poop], payload: EventPayload, body: &ActorBody) {
    let EventPayload::PoopAt { poop, position } = payload else {
        return;
    };
    if let Some(stain) = poops.iter_mut().find(|p| p.id == poop) {
        stain.attach(body.id, position - body.position);
    }
}
