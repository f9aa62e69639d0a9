//! Severity thresholds and per-level embed colors.

use crate::core::Level;
use serde::{Deserialize, Serialize};

/// Returns every level at least as severe as `min_level`, most severe first.
///
/// The result is derived from `Level::ALL` so that levels added to the
/// enumeration are picked up without touching this function.
pub fn level_threshold(min_level: Level) -> Vec<Level> {
    Level::ALL
        .iter()
        .copied()
        .filter(|level| *level >= min_level)
        .collect()
}

/// Embed colors (as 24-bit RGB integers) for each level.
///
/// When deserialized, a level left out of the table gets `0` (black); a
/// custom table is used as-is and is never merged with `DEFAULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelColors {
    pub trace: u32,
    pub debug: u32,
    pub info: u32,
    pub warn: u32,
    pub error: u32,
    pub fatal: u32,
    pub panic: u32,
}

impl LevelColors {
    /// The built-in colors, from calm grey-blue to alarm red.
    pub const DEFAULT: LevelColors = LevelColors {
        trace: 3_092_790,
        debug: 10_170_623,
        info: 3_581_519,
        warn: 14_327_864,
        error: 13_631_488,
        fatal: 13_631_488,
        panic: 13_631_488,
    };

    /// A table with every entry set to zero. Used as the deserialization base.
    pub const ZERO: LevelColors = LevelColors {
        trace: 0,
        debug: 0,
        info: 0,
        warn: 0,
        error: 0,
        fatal: 0,
        panic: 0,
    };

    pub fn level_color(&self, level: Level) -> u32 {
        match level {
            Level::Trace => self.trace,
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Fatal => self.fatal,
            Level::Panic => self.panic,
        }
    }
}

// `#[serde(default)]` fills missing entries from here, so deserialized
// tables start from zero rather than from the built-in colors.
impl Default for LevelColors {
    fn default() -> Self {
        Self::ZERO
    }
}
