//! Persisted settings and high score
//!
//! A deliberately dumb line-per-field text file: high score, sound volume
//! step, resolution, fullscreen flag, language name. Loading is
//! best-effort, field by field; a malformed or missing line falls back to
//! that field's default rather than discarding the whole file. I/O errors
//! are logged and swallowed so a broken disk never takes the game down.

use std::fs;
use std::path::{Path, PathBuf};

pub const SAVE_FILE: &str = "swoop.save";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub high_score: u32,
    /// Mixer volume as a 0-10 step
    pub sound_volume: u32,
    /// "WIDTHxHEIGHT"
    pub resolution: String,
    pub fullscreen: bool,
    pub language: String,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            high_score: 0,
            sound_volume: 7,
            resolution: "640x480".into(),
            fullscreen: false,
            language: "English".into(),
        }
    }
}

impl SaveData {
    pub fn resolution_width(&self) -> u32 {
        parse_resolution(&self.resolution).0
    }

    pub fn resolution_height(&self) -> u32 {
        parse_resolution(&self.resolution).1
    }

    /// Load from the default location next to the executable's working dir
    pub fn load() -> Self {
        Self::load_from(&PathBuf::from(SAVE_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        let defaults = Self::default();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                log::info!("no readable save at {}: {err}", path.display());
                return defaults;
            }
        };

        let mut lines = text.lines();
        let mut field = |name: &str| -> Option<String> {
            let line = lines.next().map(str::trim).map(str::to_owned);
            if line.is_none() {
                log::warn!("save file missing field {name}");
            }
            line
        };

        let high_score = field("high_score")
            .and_then(|l| l.parse().ok())
            .unwrap_or(defaults.high_score);
        let sound_volume = field("sound_volume")
            .and_then(|l| l.parse().ok())
            .map(|v: u32| v.min(10))
            .unwrap_or(defaults.sound_volume);
        let resolution = field("resolution")
            .filter(|l| l.split_once('x').is_some_and(|(w, h)| {
                w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok()
            }))
            .unwrap_or(defaults.resolution);
        let fullscreen = field("fullscreen")
            .and_then(|l| l.parse().ok())
            .unwrap_or(defaults.fullscreen);
        let language = field("language")
            .filter(|l| !l.is_empty())
            .unwrap_or(defaults.language);

        Self {
            high_score,
            sound_volume,
            resolution,
            fullscreen,
            language,
        }
    }

    pub fn save(&self) {
        self.save_to(&PathBuf::from(SAVE_FILE));
    }

    pub fn save_to(&self, path: &Path) {
        let text = format!(
            "{}\n{}\n{}\n{}\n{}\n",
            self.high_score, self.sound_volume, self.resolution, self.fullscreen, self.language
        );
        if let Err(err) = fs::write(path, text) {
            log::warn!("could not write save to {}: {err}", path.display());
        }
    }
}

fn parse_resolution(resolution: &str) -> (u32, u32) {
    resolution
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .unwrap_or((640, 480))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("swoop-save-roundtrip");
        let data = SaveData {
            high_score: 4200,
            sound_volume: 3,
            resolution: "1920x1080".into(),
            fullscreen: true,
            language: "English".into(),
        };
        data.save_to(&path);
        assert_eq!(SaveData::load_from(&path), data);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let loaded = SaveData::load_from(Path::new("/definitely/not/here.save"));
        assert_eq!(loaded, SaveData::default());
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let path = temp_path("swoop-save-malformed");
        fs::write(&path, "1234\nloud\n800x600\nmaybe\n").expect("temp write");

        let loaded = SaveData::load_from(&path);
        assert_eq!(loaded.high_score, 1234);
        assert_eq!(loaded.sound_volume, SaveData::default().sound_volume);
        assert_eq!(loaded.resolution, "800x600");
        assert!(!loaded.fullscreen);
        assert_eq!(loaded.language, "English");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_resolution_parsing() {
        let mut data = SaveData::default();
        assert_eq!(data.resolution_width(), 640);
        assert_eq!(data.resolution_height(), 480);

        data.resolution = "1280x720".into();
        assert_eq!((data.resolution_width(), data.resolution_height()), (1280, 720));

        data.resolution = "garbage".into();
        assert_eq!((data.resolution_width(), data.resolution_height()), (640, 480));
    }

    #[test]
    fn test_volume_clamped_on_load() {
        let path = temp_path("swoop-save-volume");
        fs::write(&path, "0\n99\n640x480\nfalse\nEnglish\n").expect("temp write");
        assert_eq!(SaveData::load_from(&path).sound_volume, 10);
        let _ = fs::remove_file(&path);
    }
}
