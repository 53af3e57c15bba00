//! Localized string table
//!
//! Every user-facing string is looked up by id. A built-in English table is
//! always present; a per-language JSON file (flat id-to-string object) can
//! be layered on top, with misses falling through to the built-ins so a
//! partial translation never shows raw ids.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Built-in English strings
const DEFAULTS: &[(&str, &str)] = &[
    ("GameTitle", "Bird Game"),
    ("Copyright", "A game about a bird"),
    ("PressAnyKey", "Press any key"),
    ("Paused", "Paused"),
    ("GameOver", "Game Over"),
    ("NewScore", "New High Score"),
    ("PersonalBest", "Personal Best: {0}"),
    ("PoopHead", "Shampoo"),
    ("PoopJacket", "Designer Label"),
    ("PoopCoffee", "Crapuccino"),
    ("PoopCar", "Mini Pooper"),
    ("PoopIceCream", "Extra Sprinkles"),
    ("PoopChips", "Side of Mayo"),
    ("DiveCoffee", "Stay Hydrated"),
    ("DiveIceCream", "Swoop and Scoop"),
    ("DiveChips", "Chippy Tea"),
];

#[derive(Debug)]
pub struct StringTable {
    overrides: HashMap<String, String>,
}

impl StringTable {
    /// The built-ins only
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Layer a translation file over the built-ins. A missing or invalid
    /// file is logged and ignored.
    pub fn load(path: &Path) -> Self {
        let mut table = Self::new();
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(overrides) => table.overrides = overrides,
                Err(err) => log::warn!("bad string table {}: {err}", path.display()),
            },
            Err(err) => log::info!("no string table at {}: {err}", path.display()),
        }
        table
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        if let Some(s) = self.overrides.get(id) {
            return Some(s);
        }
        DEFAULTS.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
    }

    /// `get` with `{0}` substituted, for the one-argument strings
    pub fn format1(&self, id: &str, arg: &str) -> Option<String> {
        self.get(id).map(|s| s.replace("{0}", arg))
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}
