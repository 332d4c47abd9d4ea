//! Save slot on disk.
//! The game save and a small session record are written side by side under
//! the platform data directory, each through a temporary file and a rename.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use wasteland_core::{Game, GameConfig};

use crate::{APP_NAME, format_snapshot_hash};

/// Summary of the last save, readable without loading the game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub format_version: u32,
    pub seed: u64,
    pub turn: u32,
    pub snapshot_hash_hex: String,
    pub saved_at_unix_ms: u64,
}

impl SessionRecord {
    pub fn of(game: &Game) -> Self {
        let saved_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_millis() as u64);
        Self {
            format_version: 1,
            seed: game.seed(),
            turn: game.turn(),
            snapshot_hash_hex: format_snapshot_hash(game.snapshot_hash()),
            saved_at_unix_ms,
        }
    }
}

pub struct SaveSlot {
    dir: PathBuf,
}

impl SaveSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_slot() -> Option<Self> {
        ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| Self::new(proj_dirs.data_dir()))
    }

    pub fn save_path(&self) -> PathBuf {
        self.dir.join("savegame.json")
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.join("last_session.json")
    }

    pub fn write(&self, game: &Game) -> io::Result<SessionRecord> {
        let json = game.save_json().map_err(io::Error::other)?;
        write_atomic(&self.save_path(), &json)?;
        let record = SessionRecord::of(game);
        let record_json = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;
        write_atomic(&self.record_path(), &record_json)?;
        info!(path = %self.save_path().display(), turn = record.turn, "save slot written");
        Ok(record)
    }

    pub fn load(&self, config: GameConfig) -> io::Result<Game> {
        let raw = fs::read_to_string(self.save_path())?;
        Game::load_json(&raw, config).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn last_session(&self) -> io::Result<SessionRecord> {
        let content = fs::read_to_string(self.record_path())?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_load_restores_the_game() {
        let dir = tempdir().expect("tempdir");
        let slot = SaveSlot::new(dir.path().join("nested"));
        let mut game = Game::new(99);
        game.end_turn().expect("turn ends");

        let record = slot.write(&game).expect("write");
        assert_eq!(record.turn, 2);
        assert_eq!(slot.last_session().expect("record"), record);

        let loaded = slot.load(GameConfig::default()).expect("load");
        assert_eq!(loaded.seed(), 99);
        assert_eq!(loaded.turn(), 2);
        assert!(!slot.save_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_save_is_invalid_data() {
        let dir = tempdir().expect("tempdir");
        let slot = SaveSlot::new(dir.path());
        fs::write(slot.save_path(), "{\"seed\": 1").expect("write");
        let err = slot.load(GameConfig::default()).err().expect("corrupt save");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn missing_save_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let err = SaveSlot::new(dir.path()).load(GameConfig::default()).err().expect("no save");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
