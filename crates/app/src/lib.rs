pub mod app_loop;
pub mod save_file;
pub mod seed;

use wasteland_core::RunOutcome;

pub const APP_NAME: &str = "Wasteland";

/// Format a seed as an exact decimal string with no prefix or suffix.
pub fn format_seed(seed: u64) -> String {
    seed.to_string()
}

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

/// Map a `RunOutcome` to its reason code string.
pub fn reason_code(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Victory => "WIN_SURVIVED",
        RunOutcome::Defeat => "DEF_PARTY_LOST",
    }
}
