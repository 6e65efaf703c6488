//! Static catalog of named effect presets.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::request::Controls;

/// A named set of control values used to prefill an effect request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    #[serde(skip)]
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub controls: Controls,
}

static PRESETS: [Preset; 5] = [
    Preset {
        key: "slapback",
        name: "Slapback Delay",
        description: "Classic rockabilly delay",
        controls: Controls::new(0.1, 0.0, 0.0, 0.0),
    },
    Preset {
        key: "standard",
        name: "Standard Echo",
        description: "Balanced delay with repeats",
        controls: Controls::new(0.3, 0.0, 0.0, 0.5),
    },
    Preset {
        key: "ambient",
        name: "Ambient Echo",
        description: "Long spacey delay",
        controls: Controls::new(0.5, 0.0, 0.2, 0.7),
    },
    Preset {
        key: "chorus",
        name: "Chorus Effect",
        description: "Short delay with modulation",
        controls: Controls::new(0.02, 0.0, 0.5, 0.3),
    },
    Preset {
        key: "tape",
        name: "Tape Echo",
        description: "Warm tape-style delay",
        controls: Controls::new(0.25, 0.0, 0.1, 0.6),
    },
];

/// Read-only preset lookup.
pub struct PresetCatalog;

impl PresetCatalog {
    /// Looks up a preset by key.
    pub fn get(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.key == name)
    }

    /// All presets in declaration order.
    pub fn all() -> &'static [Preset] {
        &PRESETS
    }

    /// Presets keyed by name, as served to clients.
    pub fn as_map() -> BTreeMap<&'static str, &'static Preset> {
        PRESETS.iter().map(|p| (p.key, p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_preset_values() {
        let preset = PresetCatalog::get("standard").unwrap();
        assert_eq!(preset.controls.as_array(), [0.3, 0.0, 0.0, 0.5]);
        assert_eq!(preset.name, "Standard Echo");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(PresetCatalog::get("fuzz").is_none());
        assert!(PresetCatalog::get("").is_none());
    }

    #[test]
    fn test_all_presets_are_in_range() {
        assert_eq!(PresetCatalog::all().len(), 5);
        for preset in PresetCatalog::all() {
            assert!(preset.controls.validate().is_ok(), "{}", preset.key);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(PresetCatalog::as_map()).unwrap();
        assert_eq!(json["chorus"]["name"], "Chorus Effect");
        assert_eq!(json["chorus"]["pot1"], 0.02);
        assert_eq!(json["chorus"]["pot3"], 0.5);
        assert!(json["chorus"].get("key").is_none());
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
