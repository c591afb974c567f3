//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{BOARD_WIDTH, BUFFER_HEIGHT, VISIBLE_HEIGHT};

pub const MIN_WIDTH: u8 = 6;
pub const MAX_WIDTH: u8 = 64;
pub const MIN_VISIBLE_HEIGHT: u8 = 1;
pub const MAX_VISIBLE_HEIGHT: u8 = 100;
pub const MAX_BUFFER_HEIGHT: u8 = 8;

/// Board geometry and RNG seed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: u8,
    pub visible_height: u8,
    pub buffer_height: u8,
    pub seed: u32,
}

impl GameConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check dimensions against the supported ranges.
    ///
    /// Coordinates are `i8`, so the total height must stay below 128.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(ConfigError::InvalidWidth {
                width: self.width,
                min: MIN_WIDTH,
                max: MAX_WIDTH,
            });
        }
        if !(MIN_VISIBLE_HEIGHT..=MAX_VISIBLE_HEIGHT).contains(&self.visible_height) {
            return Err(ConfigError::InvalidVisibleHeight {
                height: self.visible_height,
                min: MIN_VISIBLE_HEIGHT,
                max: MAX_VISIBLE_HEIGHT,
            });
        }
        if self.buffer_height > MAX_BUFFER_HEIGHT {
            return Err(ConfigError::InvalidBufferHeight {
                height: self.buffer_height,
                max: MAX_BUFFER_HEIGHT,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            visible_height: VISIBLE_HEIGHT,
            buffer_height: BUFFER_HEIGHT,
            seed: 1,
        }
    }
}
