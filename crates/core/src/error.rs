//! Rejection and persistence errors.
//! Guard rejections never mutate state; their `Display` text is the
//! transient message shown to the player.

use thiserror::Error;

use crate::types::{Phase, Pos, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,
    #[error("not allowed during the {0:?} phase")]
    WrongPhase(Phase),
    #[error("no survivor selected")]
    NoSelection,
    #[error("unknown survivor")]
    UnknownUnit,
    #[error("not enough AP (need {needed}, have {available})")]
    NotEnoughAp { needed: i32, available: i32 },
    #[error("no unit nearby")]
    NoAdjacentUnit,
    #[error("target is out of range")]
    OutOfRange,
    #[error("tile {0:?} is outside the world")]
    OutOfBounds(Pos),
    #[error("cannot reach that tile")]
    Unreachable,
    #[error("nothing to do here")]
    NoTarget,
    #[error("that action is not available here")]
    ActionUnavailable,
    #[error("this is locked, unlock it first")]
    Locked,
    #[error("no card at hand slot {0}")]
    CardNotInHand(usize),
    #[error("no {} left", .0.label())]
    OutOfSupplies(Resource),
    #[error("that needs the outdoor view")]
    NotOutdoors,
    #[error("that needs the indoor view")]
    NotIndoors,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed tile key {0:?}")]
    BadTileKey(String),
    #[error("unknown card {0:?} in saved hand")]
    UnknownCard(String),
    #[error("saved interior {0:?} does not match any building")]
    UnknownInterior(String),
}
