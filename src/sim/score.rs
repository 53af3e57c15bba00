//! Scoring: target table, animated counter, transient popups
//!
//! Hit tests report a `Target`; each target maps to a point value and a
//! localized label. Points travel through the event bus (`PointsAwarded`)
//! so the counter does not care who scored. The displayed number counts up
//! one per frame toward the real score. Popups rise until past a fixed
//! offset, then request their own removal via `HidePoints`.

use glam::Vec2;

use super::events::{EventBus, EventKind, EventPayload};

pub type PopupId = u32;

/// Score display clamp
const MAX_SCORE: u32 = 999_999;

/// How far a popup rises before hiding
const POPUP_RISE: f32 = 30.0;

/// Where popups appear in UI space
const POPUP_ORIGIN: Vec2 = Vec2::new(150.0, 200.0);

/// Things the bird can score off, split by delivery method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    PoopHead,
    PoopJacket,
    PoopCoffee,
    PoopCar,
    PoopIceCream,
    PoopChips,
    DiveCoffee,
    DiveIceCream,
    DiveChips,
}

impl Target {
    pub fn points(self) -> u32 {
        match self {
            Target::PoopHead => 50,
            Target::PoopJacket => 20,
            Target::PoopCoffee => 100,
            Target::PoopCar => 10,
            Target::PoopIceCream => 150,
            Target::PoopChips => 75,
            Target::DiveCoffee => 100,
            Target::DiveIceCream => 100,
            Target::DiveChips => 100,
        }
    }

    /// String-table id for the popup label
    pub fn label_id(self) -> &'static str {
        match self {
            Target::PoopHead => "PoopHead",
            Target::PoopJacket => "PoopJacket",
            Target::PoopCoffee => "PoopCoffee",
            Target::PoopCar => "PoopCar",
            Target::PoopIceCream => "PoopIceCream",
            Target::PoopChips => "PoopChips",
            Target::DiveCoffee => "DiveCoffee",
            Target::DiveIceCream => "DiveIceCream",
            Target::DiveChips => "DiveChips",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub id: PopupId,
    pub label_id: &'static str,
    pub points: u32,
    pub position: Vec2,
    target_y: f32,
}

impl ScorePopup {
    fn new(id: PopupId, target: Target) -> Self {
        Self {
            id,
            label_id: target.label_id(),
            points: target.points(),
            position: POPUP_ORIGIN,
            target_y: POPUP_ORIGIN.y - POPUP_RISE,
        }
    }

    fn update(&mut self, bus: &mut EventBus) {
        if self.position.y < self.target_y {
            bus.fire_with(EventKind::HidePoints, EventPayload::Popup(self.id));
        } else {
            self.position.y -= 1.0;
        }
    }
}

#[derive(Debug, Default)]
pub struct ScoreCounter {
    target_score: u32,
    display_score: u32,
    popups: Vec<ScorePopup>,
    next_popup_id: PopupId,
}

impl ScoreCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The real score (the display lags behind it)
    pub fn current_score(&self) -> u32 {
        self.target_score
    }

    pub fn display_score(&self) -> u32 {
        self.display_score
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    /// Record a hit: spawn a popup and push the points onto the bus
    pub fn add(&mut self, target: Target, bus: &mut EventBus) {
        let id = self.next_popup_id;
        self.next_popup_id += 1;
        self.popups.push(ScorePopup::new(id, target));
        bus.fire_with(EventKind::PointsAwarded, EventPayload::Points(target.points()));
    }

    pub fn reset(&mut self) {
        self.popups.clear();
        self.target_score = 0;
        self.display_score = 0;
    }

    pub fn update(&mut self, bus: &mut EventBus) {
        if let Some(EventPayload::Popup(id)) = bus.take_payload(EventKind::HidePoints) {
            self.popups.retain(|p| p.id != id);
        }

        if let Some(EventPayload::Points(points)) = bus.take_payload(EventKind::PointsAwarded) {
            self.target_score = (self.target_score + points).min(MAX_SCORE);
        }

        if self.display_score < self.target_score {
            self.display_score += 1;
        }

        for popup in &mut self.popups {
            popup.update(bus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_flow_through_bus() {
        let mut bus = EventBus::new();
        let mut counter = ScoreCounter::new();

        counter.add(Target::PoopHead, &mut bus);
        assert_eq!(counter.current_score(), 0);

        counter.update(&mut bus);
        assert_eq!(counter.current_score(), 50);
        assert_eq!(counter.display_score(), 1);
    }

    #[test]
    fn test_display_catches_up_one_per_frame() {
        let mut bus = EventBus::new();
        let mut counter = ScoreCounter::new();
        counter.add(Target::PoopCar, &mut bus);

        for _ in 0..10 {
            counter.update(&mut bus);
        }
        assert_eq!(counter.display_score(), 10);
        assert_eq!(counter.current_score(), 10);
    }

    #[test]
    fn test_popup_rises_then_hides() {
        let mut bus = EventBus::new();
        let mut counter = ScoreCounter::new();
        counter.add(Target::PoopJacket, &mut bus);
        assert_eq!(counter.popups().len(), 1);

        // 30 frames to rise past the offset, one more to observe the hide
        // request, one more to consume it
        for _ in 0..33 {
            counter.update(&mut bus);
        }
        assert!(counter.popups().is_empty());
    }

    #[test]
    fn test_score_clamps_at_max() {
        let mut bus = EventBus::new();
        let mut counter = ScoreCounter::new();
        for _ in 0..10 {
            counter.add(Target::PoopIceCream, &mut bus);
            counter.update(&mut bus);
        }
        counter.target_score = MAX_SCORE - 10;
        counter.add(Target::PoopIceCream, &mut bus);
        counter.update(&mut bus);
        assert_eq!(counter.current_score(), MAX_SCORE);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut bus = EventBus::new();
        let mut counter = ScoreCounter::new();
        counter.add(Target::DiveChips, &mut bus);
        counter.update(&mut bus);
        counter.reset();
        assert_eq!(counter.current_score(), 0);
        assert_eq!(counter.display_score(), 0);
        assert!(counter.popups().is_empty());
    }
}
