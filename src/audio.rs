//! Audio command layer
//!
//! The simulation decides *what* should sound; an out-of-scope device
//! backend decides how. Sounds are queued as commands the host drains once
//! per frame, which keeps the core deterministic and testable. Looping
//! effects are tracked so callers can ask whether one is already playing.

/// Sound effect ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Wing flap variants, picked at random per flap
    WingsFlap1,
    WingsFlap2,
    /// Bird starts a dive
    Dive,
    /// Pooping pose finished
    Poop,
    /// Poop hit the ground
    Splat,
    /// Drone entered / left the visible area
    DroneEnter,
    DroneLeave,
    /// Looping drone rotor while one is on screen
    DroneFly,
    /// Looping town ambience
    Ambience,
}

/// What the host should do with its mixer this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    OneShot(SoundEffect),
    StartLoop(SoundEffect),
    StopLoop(SoundEffect),
}

#[derive(Debug, Default)]
pub struct AudioManager {
    queue: Vec<AudioCommand>,
    active_loops: Vec<SoundEffect>,
    volume: f32,
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            active_loops: Vec::new(),
            volume: 1.0,
        }
    }

    /// Volume arrives from the save file as a 0-10 step
    pub fn set_volume_step(&mut self, step: u32) {
        self.volume = (step.min(10) as f32) / 10.0;
    }

    /// Effective mixer volume, 0.0 - 1.0
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.queue.push(AudioCommand::OneShot(effect));
    }

    pub fn play_looping(&mut self, effect: SoundEffect) {
        if self.is_looping_active(effect) {
            return;
        }
        self.active_loops.push(effect);
        self.queue.push(AudioCommand::StartLoop(effect));
    }

    pub fn stop_looping(&mut self, effect: SoundEffect) {
        if !self.is_looping_active(effect) {
            return;
        }
        self.active_loops.retain(|&e| e != effect);
        self.queue.push(AudioCommand::StopLoop(effect));
    }

    pub fn is_looping_active(&self, effect: SoundEffect) -> bool {
        self.active_loops.contains(&effect)
    }

    /// Hand the frame's commands to the device backend
    pub fn drain_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_start_is_idempotent() {
        let mut audio = AudioManager::new();
        audio.play_looping(SoundEffect::DroneFly);
        audio.play_looping(SoundEffect::DroneFly);
        assert_eq!(audio.drain_commands(), vec![AudioCommand::StartLoop(SoundEffect::DroneFly)]);
        assert!(audio.is_looping_active(SoundEffect::DroneFly));
    }

    #[test]
    fn test_stop_only_active_loops() {
        let mut audio = AudioManager::new();
        audio.stop_looping(SoundEffect::Ambience);
        assert!(audio.drain_commands().is_empty());

        audio.play_looping(SoundEffect::Ambience);
        audio.stop_looping(SoundEffect::Ambience);
        assert!(!audio.is_looping_active(SoundEffect::Ambience));
        assert_eq!(
            audio.drain_commands(),
            vec![
                AudioCommand::StartLoop(SoundEffect::Ambience),
                AudioCommand::StopLoop(SoundEffect::Ambience),
            ]
        );
    }

    #[test]
    fn test_volume_steps() {
        let mut audio = AudioManager::new();
        audio.set_volume_step(7);
        assert!((audio.volume() - 0.7).abs() < 1e-6);
        audio.set_volume_step(25);
        assert!((audio.volume() - 1.0).abs() < 1e-6);
    }
}
