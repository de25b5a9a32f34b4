//! Skeleton data attached to the loaded character.
//!
//! The only part of the skeleton the locomotion core cares about is its table
//! of named animation ranges. Authoring tools can attach a range named after a
//! player state (`"Run"`, `"Strafe_L"`, ...) and it then overrides the frame
//! bounds of the static [`AnimationRangeTable`](crate::resources::rangetable::AnimationRangeTable).
//!
//! Ranges are read from JSON:
//!
//! ```json
//! { "ranges": { "Run": { "from": 10, "to": 30 }, "Jump": { "from": 40, "to": 58 } } }
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Frame bounds of a named range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NamedRange {
    pub from: f32,
    pub to: f32,
}

/// Named animation ranges of a loaded character skeleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    #[serde(default)]
    pub ranges: FxHashMap<String, NamedRange>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, name: impl Into<String>, from: f32, to: f32) -> Self {
        self.ranges.insert(name.into(), NamedRange { from, to });
        self
    }

    /// Look up a named range. `None` when the skeleton does not define it.
    pub fn named_range(&self, name: &str) -> Option<NamedRange> {
        self.ranges.get(name).copied()
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse skeleton ranges: {}", e))
    }

    /// Load named ranges from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&text)
    }
}
