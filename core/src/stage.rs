//! Stage metadata and the grid it embeds.

use serde::{Deserialize, Serialize};

use crate::Grid;

/// Stage format revision understood by this build.
pub const STAGE_FORMAT_VERSION: u32 = 1;

/// Descriptive metadata attached to a stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    /// Display name.
    pub name: String,
    /// Key of the music track played while the stage runs.
    pub music_track: String,
    /// Resource pack used to resolve the stage's assets.
    pub resource_pack: String,
}

impl StageInfo {
    /// Creates stage metadata from its three keys.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        music_track: impl Into<String>,
        resource_pack: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            music_track: music_track.into(),
            resource_pack: resource_pack.into(),
        }
    }
}

/// A playable stage: metadata, format revision and tile grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    /// Descriptive metadata.
    pub info: StageInfo,
    /// Format revision the stage was read with or will be written as.
    pub format_version: u32,
    /// Tile grid of the stage.
    pub grid: Grid,
}

impl Stage {
    /// Creates a stage at the current format revision.
    #[must_use]
    pub fn new(info: StageInfo, grid: Grid) -> Self {
        Self {
            info,
            format_version: STAGE_FORMAT_VERSION,
            grid,
        }
    }
}
