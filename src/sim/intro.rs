//! Title sequence
//!
//! Two text blocks (the title card and the copyright line) slide to their
//! rest positions in UI space. Any gameplay binding dismisses the screen:
//! the bird is told to spawn straight away while the texts slide back off,
//! and only once both are clear does `IntroFinished` hand control to the
//! player. The gap between the two events is what makes the fly-in visible.

use crate::input::InputState;

use super::events::{EventBus, EventKind};

/// Rest and exit offsets for the two blocks, in UI units
const TITLE_ENTER_Y: f32 = -100.0;
const TITLE_REST_Y: f32 = 100.0;
const TITLE_EXIT_Y: f32 = -200.0;
const COPYRIGHT_ENTER_Y: f32 = 600.0;
const COPYRIGHT_REST_Y: f32 = 400.0;
const COPYRIGHT_EXIT_Y: f32 = 700.0;

/// Slide speeds, units per frame
const ENTER_SPEED: f32 = 1.0;
const EXIT_SPEED: f32 = 2.0;

#[derive(Debug)]
pub struct Intro {
    title_y: f32,
    copyright_y: f32,
    leaving: bool,
    finished: bool,
}

impl Intro {
    pub fn new() -> Self {
        Self {
            title_y: TITLE_ENTER_Y,
            copyright_y: COPYRIGHT_ENTER_Y,
            leaving: false,
            finished: false,
        }
    }

    pub fn title_y(&self) -> f32 {
        self.title_y
    }

    pub fn copyright_y(&self) -> f32 {
        self.copyright_y
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn update(&mut self, input: &InputState, bus: &mut EventBus) {
        if self.finished {
            return;
        }

        if self.leaving {
            self.title_y -= EXIT_SPEED;
            self.copyright_y += EXIT_SPEED;
            if self.title_y < TITLE_EXIT_Y && self.copyright_y > COPYRIGHT_EXIT_Y {
                self.finished = true;
                bus.fire(EventKind::IntroFinished);
            }
            return;
        }

        if self.title_y < TITLE_REST_Y {
            self.title_y += ENTER_SPEED;
        }
        if self.copyright_y > COPYRIGHT_REST_Y {
            self.copyright_y -= ENTER_SPEED;
        }

        if input.any_gameplay_pressed() {
            log::info!("title dismissed");
            self.leaving = true;
            bus.fire(EventKind::SpawnBird);
        }
    }
}

impl Default for Intro {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_texts_slide_to_rest() {
        let mut intro = Intro::new();
        let input = InputState::new();
        let mut bus = EventBus::new();

        for _ in 0..400 {
            intro.update(&input, &mut bus);
        }
        assert_eq!(intro.title_y(), TITLE_REST_Y);
        assert_eq!(intro.copyright_y(), COPYRIGHT_REST_Y);
        assert!(!bus.exists(EventKind::SpawnBird));
    }

    #[test]
    fn test_dismiss_spawns_bird_then_finishes() {
        let mut intro = Intro::new();
        let mut input = InputState::new();
        let mut bus = EventBus::new();

        for _ in 0..400 {
            intro.update(&input, &mut bus);
        }

        input.begin_frame(&[Key::Space]);
        intro.update(&input, &mut bus);
        assert!(bus.exists(EventKind::SpawnBird));
        assert!(!intro.finished());

        input.begin_frame(&[]);
        for _ in 0..400 {
            intro.update(&input, &mut bus);
        }
        assert!(intro.finished());
        assert!(bus.exists(EventKind::IntroFinished));
    }

    #[test]
    fn test_pause_key_does_not_dismiss() {
        let mut intro = Intro::new();
        let mut input = InputState::new();
        let mut bus = EventBus::new();

        input.begin_frame(&[Key::Escape]);
        for _ in 0..10 {
            intro.update(&input, &mut bus);
        }
        assert!(!bus.exists(EventKind::SpawnBird));
    }

    #[test]
    fn test_finish_fires_once() {
        let mut intro = Intro::new();
        let mut input = InputState::new();
        let mut bus = EventBus::new();

        input.begin_frame(&[Key::W]);
        intro.update(&input, &mut bus);
        input.begin_frame(&[]);
        for _ in 0..800 {
            intro.update(&input, &mut bus);
        }
        bus.consume_if_exists(EventKind::IntroFinished);
        for _ in 0..100 {
            intro.update(&input, &mut bus);
        }
        assert!(!bus.exists(EventKind::IntroFinished));
    }
}
