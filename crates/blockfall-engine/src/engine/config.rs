use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    core::catalog::PieceCatalog,
    engine::piece_generator::PieceSeed,
};

/// Invalid game configuration, detected once when a game is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("playfield must have at least one row and one column")]
    EmptyPlayfield,
    #[display("playfield {width}x{height} cannot hold a {shape_width}x{shape_height} piece")]
    PlayfieldTooSmall {
        width: usize,
        height: usize,
        shape_width: usize,
        shape_height: usize,
    },
    #[display("fall interval must be greater than zero")]
    ZeroFallInterval,
}

/// Immutable parameters of one game.
///
/// Passed to [`GameState`](crate::GameState) at construction; nothing is
/// read from global state, so independent games can run side by side.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, PieceCatalog};
///
/// let config = GameConfig {
///     width: 6,
///     fall_interval: Duration::from_millis(250),
///     ..GameConfig::default()
/// };
/// assert!(config.validate(&PieceCatalog::standard()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Columns in the playfield.
    pub width: usize,
    /// Rows in the playfield.
    pub height: usize,
    /// Delay between automatic falls.
    #[serde(rename = "fall_interval_ms", with = "duration_millis")]
    pub fall_interval: Duration,
    /// Seed for piece generation; a random one is drawn when `None`.
    pub seed: Option<PieceSeed>,
}

impl GameConfig {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;
    pub const DEFAULT_FALL_INTERVAL: Duration = Duration::from_millis(500);

    /// Checks the configuration against the catalog it will be played with.
    pub fn validate(&self, catalog: &PieceCatalog) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyPlayfield);
        }
        if self.fall_interval.is_zero() {
            return Err(ConfigError::ZeroFallInterval);
        }
        // Every template must fit at its spawn position.
        for (_, shape) in catalog.templates() {
            if shape.width() > self.width || shape.height() > self.height {
                return Err(ConfigError::PlayfieldTooSmall {
                    width: self.width,
                    height: self.height,
                    shape_width: shape.width(),
                    shape_height: shape.height(),
                });
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            fall_interval: Self::DEFAULT_FALL_INTERVAL,
            seed: None,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
