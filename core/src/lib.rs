#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scurry engine.
//!
//! This crate owns the grid data model and the message surface that connects
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and presentation layers react to deterministically.
//!
//! The grid itself ([`Grid`], [`Tile`], [`WallSet`]) lives here so persistence
//! adapters can build and read grids without depending on the world.

mod direction;
mod grid;
mod stage;
mod tile;
mod walls;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use direction::Direction;
pub use grid::{neighbor_coord, Grid};
pub use stage::{Stage, StageInfo, STAGE_FORMAT_VERSION};
pub use tile::{ArrowStrike, Improvement, Occupant, Tile};
pub use walls::WallSet;

/// Head-on cat strikes that break a direction arrow.
pub const DESTRUCTION_THRESHOLD: u8 = 2;

/// Whether simulated time is currently advancing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationState {
    /// Ticks advance every mover and emit [`Event::TimeAdvanced`].
    Running,
    /// Ticks are ignored entirely.
    #[default]
    Suspended,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current tiles and movers and generates a blank grid.
    GenerateGrid {
        /// Number of tile rows.
        rows: u32,
        /// Number of tile columns.
        columns: u32,
    },
    /// Updates mover travel speeds.
    ConfigureMovers {
        /// Mouse speed in world units per second.
        mouse_speed: f32,
        /// Cat speed in world units per second.
        cat_speed: f32,
    },
    /// Starts or suspends the simulation clock.
    SetSimulationState {
        /// State the world should enter.
        state: SimulationState,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets or removes the wall on one side of a tile, mirrored onto its neighbour.
    SetWall {
        /// Tile whose side changes.
        tile: TileCoord,
        /// Side of the tile.
        direction: Direction,
        /// Whether a wall should stand on that side.
        present: bool,
    },
    /// Places an improvement on a tile.
    PlaceImprovement {
        /// Target tile.
        tile: TileCoord,
        /// Improvement to place; [`Improvement::None`] removes the current one.
        improvement: Improvement,
    },
    /// Places or removes the starting mover recorded on a tile.
    PlaceOccupant {
        /// Target tile.
        tile: TileCoord,
        /// Occupant to record, or `None` to remove it.
        occupant: Option<Occupant>,
    },
    /// Updates the ownership tag of a tile.
    SetOwner {
        /// Target tile.
        tile: TileCoord,
        /// New tag, `0` for unowned.
        owner: u32,
    },
    /// Resets improvement, occupant and owner of a tile, keeping its walls.
    ClearTile {
        /// Target tile.
        tile: TileCoord,
    },
    /// Creates a mover centred on a tile.
    SpawnMover {
        /// Tile the mover starts on.
        tile: TileCoord,
        /// Kind of mover to create.
        kind: MoverKind,
        /// Initial facing.
        facing: Direction,
    },
    /// Creates one mover for every occupant recorded on the grid.
    ReleaseOccupants,
    /// Replaces the stage metadata and grid contents.
    LoadStage {
        /// Stage to install.
        stage: Box<Stage>,
    },
    /// Replaces the stage metadata, keeping the grid.
    RenameStage {
        /// New metadata.
        info: StageInfo,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation started or stopped.
    SimulationStateChanged {
        /// State that became active.
        state: SimulationState,
    },
    /// A tile was allocated.
    TileCreated {
        /// Coordinate of the new tile.
        tile: TileCoord,
    },
    /// A tile was discarded.
    TileDestroyed {
        /// Coordinate of the discarded tile.
        tile: TileCoord,
    },
    /// A tile's improvement changed.
    ImprovementChanged {
        /// Tile that changed.
        tile: TileCoord,
        /// Improvement now on the tile.
        improvement: Improvement,
    },
    /// A cat struck a direction arrow head-on without breaking it.
    ArrowDamaged {
        /// Tile carrying the arrow.
        tile: TileCoord,
        /// Damage after the strike.
        damage: u8,
    },
    /// A tile's starting mover changed.
    OccupantChanged {
        /// Tile that changed.
        tile: TileCoord,
        /// Occupant now recorded on the tile.
        occupant: Option<Occupant>,
    },
    /// A wall appeared or disappeared on one side of a tile.
    WallChanged {
        /// Tile whose side changed.
        tile: TileCoord,
        /// Side of the tile.
        direction: Direction,
        /// Whether a wall now stands there.
        present: bool,
    },
    /// A tile's ownership tag changed.
    OwnerChanged {
        /// Tile that changed.
        tile: TileCoord,
        /// New tag.
        owner: u32,
    },
    /// A mover entered the grid.
    MoverCreated {
        /// Identifier assigned to the mover.
        mover: MoverId,
        /// Kind of the mover.
        kind: MoverKind,
        /// Starting position in world units.
        position: Vec2,
        /// Initial facing.
        facing: Direction,
    },
    /// A mover advanced during a tick.
    MoverMoved {
        /// Identifier of the mover.
        mover: MoverId,
        /// Position after the tick.
        position: Vec2,
        /// Facing after the tick.
        facing: Direction,
    },
    /// A mover left the simulation.
    MoverDestroyed {
        /// Identifier of the mover.
        mover: MoverId,
        /// Kind of the mover.
        kind: MoverKind,
        /// Why the mover was removed.
        cause: DestroyCause,
    },
    /// A stage finished loading.
    StageLoaded {
        /// Metadata of the stage.
        info: StageInfo,
        /// Rows of the installed grid.
        rows: u32,
        /// Columns of the installed grid.
        columns: u32,
    },
}

/// Reasons a mover leaves the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroyCause {
    /// The mover arrived on a goal tile.
    ReachedGoal,
    /// The mover arrived on a hole tile.
    FellInHole,
    /// A cat overlapped the mouse.
    Caught,
    /// The grid the mover lived on was replaced.
    GridReset,
}

/// Kinds of grid movers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoverKind {
    /// Prey; never damages arrows.
    Mouse,
    /// Predator; damages arrows it runs into head-on and catches mice.
    Cat,
}

/// Unique identifier assigned to a mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoverId(u32);

impl MoverId {
    /// Creates a new mover identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    row: u32,
    column: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Immutable representation of a single mover's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct MoverSnapshot {
    /// Unique identifier assigned to the mover.
    pub id: MoverId,
    /// Kind of the mover.
    pub kind: MoverKind,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Current heading.
    pub facing: Direction,
    /// Tile of the most recent arrival, `None` before the first one.
    pub current_tile: Option<TileCoord>,
    /// Distance left before the next tile-centre arrival.
    pub remaining_distance: f32,
    /// Whether the current tile lies on the grid's outer ring.
    pub on_edge_ring: bool,
}

/// Read-only snapshot describing all movers on the grid.
#[derive(Clone, Debug, Default)]
pub struct MoverView {
    snapshots: Vec<MoverSnapshot>,
}

impl MoverView {
    /// Creates a new mover view from snapshots already in update order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<MoverSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in update order.
    pub fn iter(&self) -> impl Iterator<Item = &MoverSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the mover with the provided identifier.
    #[must_use]
    pub fn get(&self, id: MoverId) -> Option<&MoverSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of movers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no movers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MoverSnapshot> {
        self.snapshots
    }
}
