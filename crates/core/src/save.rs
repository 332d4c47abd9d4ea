//! Save file schema.
//!
//! A save is one JSON object with camelCase keys:
//! `{seed, turn, phase, units, enemies, globalResources, hand, deckSize,
//! discardSize, revealedTiles}`. Terrain is never stored; it is regenerated
//! from the seed and only the revealed tile keys round-trip.
//!
//! Optional extensions (absent means default): per-unit `maxActionPoints`
//! and `interior`, and a top-level `interiors` list of cached building
//! interiors. Older saves without them still load.

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::game::GlobalResources;
use crate::interior::BuildingInterior;
use crate::types::Phase;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub seed: u64,
    pub turn: u32,
    pub phase: Phase,
    pub units: Vec<SavedUnit>,
    pub enemies: Vec<SavedEnemy>,
    pub global_resources: GlobalResources,
    pub hand: Vec<SavedCard>,
    pub deck_size: usize,
    pub discard_size: usize,
    /// `"x,y"` keys.
    pub revealed_tiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<BuildingInterior>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedUnit {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub action_points: i32,
    pub radiation_dose: f64,
    pub hydration: i32,
    pub nutrition: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_action_points: Option<i32>,
    /// Anchor key of the building the unit is inside; `x`/`y` are then
    /// interior coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEnemy {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub health: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCard {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
}

impl SaveData {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "seed": 12345,
        "turn": 4,
        "phase": "ACTIONS",
        "units": [
            {"id": 1, "name": "Alex", "x": 2, "y": -1, "health": 80, "actionPoints": 2,
             "radiationDose": 12.5, "hydration": 85, "nutrition": 91}
        ],
        "enemies": [{"id": 1, "name": "Raider", "x": 12, "y": 9, "health": 40}],
        "globalResources": {"scrap": 14, "medicine": 1, "food": 3, "water": 2},
        "hand": [{"name": "Sprint", "type": "action"}],
        "deckSize": 15,
        "discardSize": 4,
        "revealedTiles": ["0,0", "2,-1"]
    }"#;

    #[test]
    fn reads_the_base_shape_without_extensions() {
        let data = SaveData::from_json(MINIMAL).expect("valid save");
        assert_eq!(data.phase, Phase::Actions);
        assert_eq!(data.units[0].max_action_points, None);
        assert_eq!(data.units[0].interior, None);
        assert!(data.interiors.is_empty());
        assert_eq!(data.hand[0].card_type, "action");
        assert_eq!(data.global_resources.scrap, 14);
    }

    #[test]
    fn writes_camel_case_keys_and_screaming_phase() {
        let data = SaveData::from_json(MINIMAL).expect("valid save");
        let json = data.to_json().expect("serialize");
        for key in ["\"globalResources\"", "\"revealedTiles\"", "\"actionPoints\"", "\"ACTIONS\""] {
            assert!(json.contains(key), "missing {key}");
        }
        assert!(!json.contains("interiors"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SaveData::from_json("{\"seed\": ").expect_err("truncated");
        assert!(matches!(err, SaveError::Parse(_)));
    }
}
