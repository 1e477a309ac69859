#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map and stage persistence for Scurry.
//!
//! The codec turns grids and stages into line streams and back; a
//! [`LineStorage`] decides where those streams live. The load helpers treat a
//! missing file or a foreign format revision as ordinary outcomes and leave
//! the caller's state alone.

mod error;
mod lines;
pub mod map_format;
pub mod stage_format;
mod storage;

use log::{info, warn};
use scurry_core::{Grid, Stage};

pub use error::{CodecError, StorageError};
pub use lines::{LineReader, LineWriter};
pub use map_format::{decode_map, decode_map_into, encode_map};
pub use stage_format::{decode_stage, encode_stage};
pub use storage::{FsStorage, LineStorage, MemoryStorage};

/// Result of attempting to load a stage.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The stage decoded successfully.
    Loaded(Box<Stage>),
    /// Nothing is stored under the requested path.
    Missing,
    /// The stored stage uses another format revision.
    Rejected {
        /// Revision found in the stream.
        found: u32,
    },
}

/// Reads the stage stored under `path`.
///
/// Malformed content is an error; a missing path or a foreign format revision
/// is logged as a warning and reported through [`LoadOutcome`].
pub fn load_stage<S>(storage: &S, path: &str, tile_size: f32) -> Result<LoadOutcome, StorageError>
where
    S: LineStorage + ?Sized,
{
    let Some(lines) = storage.read_lines(path)? else {
        warn!("stage '{path}' not found; keeping current state");
        return Ok(LoadOutcome::Missing);
    };

    match decode_stage(&lines, tile_size) {
        Ok(stage) => {
            info!(
                "read stage '{}' from '{path}' ({}x{})",
                stage.info.name,
                stage.grid.rows(),
                stage.grid.columns()
            );
            Ok(LoadOutcome::Loaded(Box::new(stage)))
        }
        Err(CodecError::UnsupportedVersion { found, expected }) => {
            warn!("stage '{path}' has format version {found}, expected {expected}; load aborted");
            Ok(LoadOutcome::Rejected { found })
        }
        Err(source) => Err(StorageError::Codec {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Writes `stage` under `path` at the current format revision.
pub fn save_stage<S>(storage: &mut S, path: &str, stage: &Stage) -> Result<(), StorageError>
where
    S: LineStorage + ?Sized,
{
    storage.write_lines(path, &encode_stage(stage))?;
    info!("saved stage '{}' to '{path}'", stage.info.name);
    Ok(())
}

/// Reads the map stored under `path` into `grid`.
///
/// Returns `Ok(false)`, leaving `grid` untouched, when nothing is stored.
pub fn load_map<S>(storage: &S, path: &str, grid: &mut Grid) -> Result<bool, StorageError>
where
    S: LineStorage + ?Sized,
{
    let Some(lines) = storage.read_lines(path)? else {
        warn!("map '{path}' not found; keeping current grid");
        return Ok(false);
    };

    decode_map_into(grid, &lines).map_err(|source| StorageError::Codec {
        path: path.to_owned(),
        source,
    })?;
    info!("read map '{path}' ({}x{})", grid.rows(), grid.columns());
    Ok(true)
}

/// Writes `grid` under `path` as a standalone map.
pub fn save_map<S>(storage: &mut S, path: &str, grid: &Grid) -> Result<(), StorageError>
where
    S: LineStorage + ?Sized,
{
    storage.write_lines(path, &encode_map(grid))?;
    info!("saved map to '{path}'");
    Ok(())
}
