#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that turns player requests into world edits.
//!
//! Requests that the current game mode does not allow produce no command at
//! all. Rejection is a normal outcome; callers that want to give feedback can
//! compare the command buffer before and after [`Builder::handle`].

use std::collections::BTreeMap;

use log::debug;
use scurry_core::{Command, Direction, Event, Improvement, Occupant, SimulationState, TileCoord};

/// Rules that govern which placements are accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Stage editing: every edit is allowed at any time.
    #[default]
    Editor,
    /// Puzzle play: only arrows from the inventory, only while suspended.
    Puzzle,
}

/// Direction arrows the player may still place, counted per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Inventory {
    arrows: [u32; 4],
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self { arrows: [0; 4] }
    }

    /// Returns a copy of the inventory holding `count` arrows facing `direction`.
    #[must_use]
    pub const fn with_arrows(mut self, direction: Direction, count: u32) -> Self {
        self.arrows[slot(direction)] = count;
        self
    }

    /// Remaining arrows facing `direction`.
    #[must_use]
    pub const fn arrows(&self, direction: Direction) -> u32 {
        self.arrows[slot(direction)]
    }

    fn take(&mut self, direction: Direction) -> bool {
        let count = &mut self.arrows[slot(direction)];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    fn refund(&mut self, direction: Direction) {
        let count = &mut self.arrows[slot(direction)];
        *count = count.saturating_add(1);
    }
}

const fn slot(direction: Direction) -> usize {
    match direction {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
    }
}

/// Edit a player or editor UI asks to perform on a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementRequest {
    /// Place an improvement; [`Improvement::None`] asks to remove the current one.
    Improvement {
        /// Target tile.
        tile: TileCoord,
        /// Improvement to place.
        improvement: Improvement,
    },
    /// Place or remove the starting mover of a tile.
    Occupant {
        /// Target tile.
        tile: TileCoord,
        /// Occupant to record, `None` to remove.
        occupant: Option<Occupant>,
    },
    /// Raise or lower a wall.
    Wall {
        /// Target tile.
        tile: TileCoord,
        /// Side of the tile.
        direction: Direction,
        /// Whether the wall should stand.
        present: bool,
    },
    /// Reset a tile's contents, keeping its walls.
    Clear {
        /// Target tile.
        tile: TileCoord,
    },
}

impl PlacementRequest {
    /// Tile the request targets.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        match *self {
            Self::Improvement { tile, .. }
            | Self::Occupant { tile, .. }
            | Self::Wall { tile, .. }
            | Self::Clear { tile } => tile,
        }
    }
}

/// Placement system that validates requests against the active game mode.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    mode: GameMode,
    inventory: Inventory,
    simulation: SimulationState,
    placed: BTreeMap<TileCoord, Direction>,
}

impl Builder {
    /// Creates a builder for the given mode and starting inventory.
    #[must_use]
    pub fn new(mode: GameMode, inventory: Inventory) -> Self {
        Self {
            mode,
            inventory,
            simulation: SimulationState::Suspended,
            placed: BTreeMap::new(),
        }
    }

    /// Active game mode.
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Arrows still available to the player.
    #[must_use]
    pub const fn inventory(&self) -> Inventory {
        self.inventory
    }

    /// Consumes world events and an optional request to emit placement commands.
    ///
    /// The `improvement_at` closure should mirror the world's `query::tile`
    /// helper, returning `None` for coordinates outside the grid.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        request: Option<PlacementRequest>,
        mut improvement_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(TileCoord) -> Option<Improvement>,
    {
        for event in events {
            self.observe(event);
        }

        let Some(request) = request else {
            return;
        };

        let accepted = match self.mode {
            GameMode::Editor => Self::edit(request, &mut improvement_at),
            GameMode::Puzzle => self.solve(request, &mut improvement_at),
        };

        match accepted {
            Some(command) => out.push(command),
            None => debug!("rejected placement {request:?} in {:?} mode", self.mode),
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::SimulationStateChanged { state } => self.simulation = *state,
            Event::ImprovementChanged { tile, improvement } => {
                if !improvement.is_arrow() {
                    let _ = self.placed.remove(tile);
                }
            }
            Event::StageLoaded { .. } | Event::TileDestroyed { .. } => self.placed.clear(),
            _ => {}
        }
    }

    fn edit<F>(request: PlacementRequest, improvement_at: &mut F) -> Option<Command>
    where
        F: FnMut(TileCoord) -> Option<Improvement>,
    {
        let command = match request {
            PlacementRequest::Improvement { tile, improvement } => {
                Command::PlaceImprovement { tile, improvement }
            }
            PlacementRequest::Occupant { tile, occupant } => {
                Command::PlaceOccupant { tile, occupant }
            }
            PlacementRequest::Wall {
                tile,
                direction,
                present,
            } => Command::SetWall {
                tile,
                direction,
                present,
            },
            PlacementRequest::Clear { tile } => Command::ClearTile { tile },
        };

        improvement_at(request.tile()).map(|_| command)
    }

    fn solve<F>(&mut self, request: PlacementRequest, improvement_at: &mut F) -> Option<Command>
    where
        F: FnMut(TileCoord) -> Option<Improvement>,
    {
        if self.simulation != SimulationState::Suspended {
            return None;
        }

        let PlacementRequest::Improvement { tile, improvement } = request else {
            return None;
        };
        let current = improvement_at(tile)?;
        let previous = self.placed.get(&tile).copied();

        match improvement {
            Improvement::Arrow(direction) => {
                if !(current.is_none() || previous.is_some()) {
                    return None;
                }
                if previous == Some(direction) {
                    return None;
                }
                if !self.inventory.take(direction) {
                    return None;
                }
                if let Some(previous) = previous {
                    self.inventory.refund(previous);
                }
                let _ = self.placed.insert(tile, direction);
                Some(Command::PlaceImprovement { tile, improvement })
            }
            Improvement::None => {
                let previous = self.placed.remove(&tile)?;
                self.inventory.refund(previous);
                Some(Command::PlaceImprovement { tile, improvement })
            }
            Improvement::Hole | Improvement::Goal | Improvement::Spawner(_) => None,
        }
    }
}
