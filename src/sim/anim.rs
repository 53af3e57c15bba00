//! Animation clip timing
//!
//! The renderer is out of scope, but several state transitions key off
//! animation progress (dive phases end when their clip ends, the flap sound
//! triggers on the flying clip's last frame). This is the minimal
//! deterministic playback model those transitions need: a frame counter
//! driven by the simulation clock. Looping clips wrap; one-shot clips clamp
//! at their final frame.

#[derive(Debug, Clone)]
pub struct Animation {
    frame_count: usize,
    frame_secs: f32,
    elapsed: f32,
    looping: bool,
}

impl Animation {
    pub fn looping(frame_count: usize, frame_secs: f32) -> Self {
        Self {
            frame_count,
            frame_secs,
            elapsed: 0.0,
            looping: true,
        }
    }

    pub fn one_shot(frame_count: usize, frame_secs: f32) -> Self {
        Self {
            frame_count,
            frame_secs,
            elapsed: 0.0,
            looping: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.looping {
            let total = self.frame_secs * self.frame_count as f32;
            while self.elapsed >= total {
                self.elapsed -= total;
            }
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn current_frame(&self) -> usize {
        let frame = (self.elapsed / self.frame_secs) as usize;
        frame.min(self.frame_count - 1)
    }

    pub fn last_frame(&self) -> usize {
        self.frame_count - 1
    }

    /// For one-shot clips: has the clip clamped at its final frame?
    /// Looping clips never report ended.
    pub fn at_end(&self) -> bool {
        !self.looping && self.elapsed >= self.frame_secs * self.frame_count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_clamps() {
        let mut clip = Animation::one_shot(4, 0.1);
        assert_eq!(clip.current_frame(), 0);
        assert!(!clip.at_end());

        clip.update(0.35);
        assert_eq!(clip.current_frame(), 3);
        assert!(!clip.at_end());

        clip.update(0.1);
        assert!(clip.at_end());
        assert_eq!(clip.current_frame(), 3);
    }

    #[test]
    fn test_looping_wraps() {
        let mut clip = Animation::looping(4, 0.1);
        clip.update(0.45);
        assert_eq!(clip.current_frame(), 0);
        assert!(!clip.at_end());
    }

    #[test]
    fn test_reset_restarts() {
        let mut clip = Animation::one_shot(2, 0.1);
        clip.update(1.0);
        assert!(clip.at_end());
        clip.reset();
        assert!(!clip.at_end());
        assert_eq!(clip.current_frame(), 0);
    }
}
