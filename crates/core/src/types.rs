use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::error::GameError;

new_key_type! {
    pub struct UnitId;
    pub struct EnemyId;
}

/// World or interior grid coordinate. Ordered row-major so ordered
/// collections iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// `"x,y"` key used by the save format and the interior cache.
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    pub fn parse_key(raw: &str) -> Option<Self> {
        let (x, y) = raw.split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }

    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn euclidean(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// What stands on a tile. A tile holds at most one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occupant {
    Unit(UnitId),
    Enemy(EnemyId),
    #[default]
    Empty,
}

impl Occupant {
    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }

    pub fn unit(self) -> Option<UnitId> {
        match self {
            Occupant::Unit(id) => Some(id),
            _ => None,
        }
    }

    pub fn enemy(self) -> Option<EnemyId> {
        match self {
            Occupant::Enemy(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    EventDraw,
    PlayerHand,
    Actions,
    EndPhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Scrap,
    Medicine,
    Food,
    Water,
}

impl Resource {
    pub fn label(self) -> &'static str {
        match self {
            Resource::Scrap => "scrap",
            Resource::Medicine => "medicine",
            Resource::Food => "food",
            Resource::Water => "water",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// Which scene the player is looking at. Only one interior is ever active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Outdoor,
    Indoor { building: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Player intents consumed by [`crate::Game::apply_intent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    TileClicked { pos: Pos, button: MouseButton },
    ActionInvoked { action: crate::ActionId, pos: Pos },
    PlayCard { hand_index: usize },
    DiscardCard { hand_index: usize },
    UseSupply { resource: Resource },
    EndTurnRequested,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Selected(UnitId),
    Deselected,
    Moved { unit: UnitId, to: Pos, ap_spent: i32 },
    Acted(crate::ActionId),
    CardPlayed(&'static str),
    CardDiscarded(&'static str),
    SupplyUsed(Resource),
    TurnEnded { turn: u32 },
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    PhaseChanged { turn: u32, phase: Phase },
    UnitMoved { unit: UnitId, to: Pos, ap_spent: i32 },
    RadiationTaken { unit: UnitId, dose: f64 },
    ArsStageChanged { unit: UnitId, stage: u8 },
    Attack { attacker: String, defender: String, hit: bool, damage: i32, killed: bool },
    UnitDied { name: String },
    EnemyDied { enemy: EnemyId, scrap_dropped: i32 },
    EnemySpawned { enemy: EnemyId, pos: Pos },
    ResourceGained { resource: Resource, amount: i32 },
    NothingFound,
    CardPlayed { name: &'static str },
    CardDiscarded { name: &'static str },
    SupplyUsed { unit: UnitId, resource: Resource },
    DoorChanged { pos: Pos },
    FurnitureUnlocked { pos: Pos },
    LockHeld { pos: Pos },
    EnteredBuilding { unit: UnitId, building: Pos },
    ExitedBuilding { unit: UnitId, to: Pos },
    GameOver(RunOutcome),
    Rejected(GameError),
}
