//! Engine configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```
//! use gomoku::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "depths": { "hard": 4 } }"#).unwrap();
//! assert_eq!(config.depths.hard, 4);
//! assert_eq!(config.depths.medium, 2);
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GameError, Result};
use crate::eval::{DEFAULT_CACHE_CAPACITY, DEFAULT_DEFENSE_WEIGHT};

/// Deepest search a config may request
pub const MAX_SEARCH_DEPTH: u8 = 8;

/// AI strength levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        };
        f.write_str(name)
    }
}

/// Search depth in plies per difficulty. Depth 0 means one-ply evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyDepths {
    pub easy: u8,
    pub medium: u8,
    pub hard: u8,
    pub extreme: u8,
}

impl Default for DifficultyDepths {
    fn default() -> Self {
        Self {
            easy: 0,
            medium: 2,
            hard: 3,
            extreme: 4,
        }
    }
}

impl DifficultyDepths {
    #[inline]
    pub fn depth(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Extreme => self.extreme,
        }
    }
}

/// Tunables for evaluation, search and the GUI's AI worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub depths: DifficultyDepths,
    /// Multiplier on the opponent's pattern total; must be at least 1
    pub defense_weight: f64,
    /// Line cache entries kept before the cache is cleared
    pub cache_capacity: usize,
    /// Recursive nodes suspend when their remaining depth exceeds this
    pub yield_depth_threshold: u8,
    /// Artificial delay before the GUI's AI worker answers
    pub think_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depths: DifficultyDepths::default(),
            defense_weight: DEFAULT_DEFENSE_WEIGHT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            yield_depth_threshold: 2,
            think_delay_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.defense_weight.is_finite() || self.defense_weight < 1.0 {
            return Err(GameError::InvalidConfig(format!(
                "defense_weight must be a finite value >= 1, got {}",
                self.defense_weight
            )));
        }
        for difficulty in Difficulty::ALL {
            let depth = self.depths.depth(difficulty);
            if depth > MAX_SEARCH_DEPTH {
                return Err(GameError::InvalidConfig(format!(
                    "{difficulty} depth {depth} exceeds {MAX_SEARCH_DEPTH}"
                )));
            }
        }
        Ok(())
    }
}
