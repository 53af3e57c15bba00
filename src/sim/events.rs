//! Event bus
//!
//! A central list of timestamped events decoupling collision and scoring
//! signals from their producers. Readers either peek (`exists`), consume
//! everything matching (`consume_if_exists`), consume the first match
//! inside a rectangle (`consume_in_bounds`) or take the first payload
//! (`take_payload`). Anything older than one second is swept on tick so
//! unconsumed events cannot pile up.

use glam::Vec2;

use crate::Rect;
use crate::consts::EVENT_EXPIRY_SECS;

use super::poop::PoopId;
use super::score::PopupId;

/// The closed set of event ids the game fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Title screen dismissed; the bird starts flying in
    SpawnBird,
    /// Intro text finished scrolling; control handed to the player
    IntroFinished,
    /// Bird finished its pooping pose at the payload position
    PoopSpawned,
    /// A poop hit the ground; payload carries the poop and where it landed
    PoopLanded,
    /// Death animation completed (fired exactly once per round)
    BirdDead,
    /// A target was hit; payload is the point value
    PointsAwarded,
    /// A score popup finished rising and wants removing
    HidePoints,
    /// Host window resolution changed; camera must rescale
    ResolutionChanged,
}

/// Closed payload variant, so consumers pattern-match instead of
/// type-testing at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    None,
    Point(Vec2),
    PoopAt { poop: PoopId, position: Vec2 },
    Points(u32),
    Popup(PopupId),
}

impl EventPayload {
    /// Position used by the bounds-filtered read, if the payload has one
    fn position(&self) -> Option<Vec2> {
        match self {
            EventPayload::Point(p) => Some(*p),
            EventPayload::PoopAt { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct GameEvent {
    kind: EventKind,
    fired_at: f32,
    payload: EventPayload,
}

/// The bus itself. Time is the simulation clock, advanced by `tick`.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
    now: f32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self, kind: EventKind) {
        self.fire_with(kind, EventPayload::None);
    }

    pub fn fire_with(&mut self, kind: EventKind, payload: EventPayload) {
        self.events.push(GameEvent {
            kind,
            fired_at: self.now,
            payload,
        });
    }

    /// Non-consuming existence check
    pub fn exists(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// Consume every matching event so nothing else can react to them.
    /// Returns whether at least one existed.
    pub fn consume_if_exists(&mut self, kind: EventKind) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.kind != kind);
        self.events.len() != before
    }

    /// Consume the first matching event whose payload position falls inside
    /// `bounds` and return its payload. Only one event is resolved per call;
    /// callers run once per frame per region of interest.
    pub fn consume_in_bounds(&mut self, kind: EventKind, bounds: Rect) -> Option<EventPayload> {
        let index = self.events.iter().position(|e| {
            e.kind == kind && e.payload.position().is_some_and(|p| bounds.contains(p))
        })?;
        Some(self.events.remove(index).payload)
    }

    /// Remove and return the first matching event's payload regardless of
    /// position.
    pub fn take_payload(&mut self, kind: EventKind) -> Option<EventPayload> {
        let index = self.events.iter().position(|e| e.kind == kind)?;
        Some(self.events.remove(index).payload)
    }

    /// Advance the clock and sweep everything older than the expiry window,
    /// consumed or not.
    pub fn tick(&mut self, dt: f32) {
        self.now += dt;
        let cutoff = self.now - EVENT_EXPIRY_SECS;
        self.events.retain(|e| e.fired_at >= cutoff);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exists_does_not_consume() {
        let mut bus = EventBus::new();
        bus.fire(EventKind::SpawnBird);
        assert!(bus.exists(EventKind::SpawnBird));
        assert!(bus.exists(EventKind::SpawnBird));
        assert!(!bus.exists(EventKind::BirdDead));
    }

    #[test]
    fn test_consume_removes_all_matches() {
        let mut bus = EventBus::new();
        bus.fire(EventKind::PoopSpawned);
        bus.fire(EventKind::PoopSpawned);
        bus.fire(EventKind::BirdDead);
        assert!(bus.consume_if_exists(EventKind::PoopSpawned));
        assert!(!bus.consume_if_exists(EventKind::PoopSpawned));
        assert!(bus.exists(EventKind::BirdDead));
    }

    #[test]
    fn test_consume_in_bounds_takes_first_match_only() {
        let mut bus = EventBus::new();
        bus.fire_with(
            EventKind::PoopLanded,
            EventPayload::PoopAt { poop: 1, position: Vec2::new(5.0, 5.0) },
        );
        bus.fire_with(
            EventKind::PoopLanded,
            EventPayload::PoopAt { poop: 2, position: Vec2::new(6.0, 6.0) },
        );

        let hit = bus.consume_in_bounds(EventKind::PoopLanded, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(hit, Some(EventPayload::PoopAt { poop: 1, position: Vec2::new(5.0, 5.0) }));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_consume_in_bounds_skips_outside() {
        let mut bus = EventBus::new();
        bus.fire_with(EventKind::PoopLanded, EventPayload::Point(Vec2::new(50.0, 50.0)));
        let hit = bus.consume_in_bounds(EventKind::PoopLanded, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(hit.is_none());
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_payloadless_event_never_matches_bounds() {
        let mut bus = EventBus::new();
        bus.fire(EventKind::PoopLanded);
        assert!(
            bus.consume_in_bounds(EventKind::PoopLanded, Rect::new(-1e9, -1e9, 2e9, 2e9))
                .is_none()
        );
    }

    #[test]
    fn test_expiry_after_one_second() {
        let mut bus = EventBus::new();
        bus.fire(EventKind::SpawnBird);
        bus.tick(0.99);
        assert!(bus.exists(EventKind::SpawnBird));
        bus.tick(0.02);
        assert!(!bus.exists(EventKind::SpawnBird));
    }

    #[test]
    fn test_take_payload_fifo() {
        let mut bus = EventBus::new();
        bus.fire_with(EventKind::PointsAwarded, EventPayload::Points(10));
        bus.fire_with(EventKind::PointsAwarded, EventPayload::Points(50));
        assert_eq!(bus.take_payload(EventKind::PointsAwarded), Some(EventPayload::Points(10)));
        assert_eq!(bus.take_payload(EventKind::PointsAwarded), Some(EventPayload::Points(50)));
        assert_eq!(bus.take_payload(EventKind::PointsAwarded), None);
    }

    proptest! {
        #[test]
        fn prop_unconsumed_events_expire(ticks in 1u32..200, step in 0.005f32..0.1) {
            let mut bus = EventBus::new();
            bus.fire(EventKind::ResolutionChanged);
            let mut elapsed = 0.0f32;
            for _ in 0..ticks {
                bus.tick(step);
                elapsed += step;
            }
            if elapsed > EVENT_EXPIRY_SECS + 0.01 {
                prop_assert!(!bus.exists(EventKind::ResolutionChanged));
            }
        }
    }
}
