//! Tile state: improvement, occupant, ownership and walls.

use serde::{Deserialize, Serialize};

use crate::{Direction, MoverKind, TileCoord, WallSet, DESTRUCTION_THRESHOLD};

/// Special behaviour attached to a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Improvement {
    /// Plain floor.
    #[default]
    None,
    /// Destroys any mover arriving on the tile.
    Hole,
    /// Collects any mover arriving on the tile.
    Goal,
    /// Emits movers facing the stored direction.
    Spawner(Direction),
    /// Turns arriving movers toward the stored direction.
    Arrow(Direction),
}

impl Improvement {
    /// Direction carried by the improvement, if it has one.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Spawner(direction) | Self::Arrow(direction) => Some(direction),
            Self::None | Self::Hole | Self::Goal => None,
        }
    }

    /// Reports whether this is a direction arrow.
    #[must_use]
    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::Arrow(_))
    }

    /// Reports whether the tile has no improvement.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Starting mover recorded on a tile by stage editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    /// Kind of mover released from the tile.
    pub kind: MoverKind,
    /// Initial facing of the released mover.
    pub facing: Direction,
}

impl Occupant {
    /// Creates a new occupant descriptor.
    #[must_use]
    pub const fn new(kind: MoverKind, facing: Direction) -> Self {
        Self { kind, facing }
    }
}

/// Outcome of a cat striking a direction arrow head-on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowStrike {
    /// The arrow survived and now carries the given damage.
    Damaged(u8),
    /// The arrow broke and the tile reverted to plain floor.
    Destroyed,
}

/// A single grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    coord: TileCoord,
    improvement: Improvement,
    damage: u8,
    occupant: Option<Occupant>,
    owner: u32,
    walls: WallSet,
}

impl Tile {
    pub(crate) const fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            improvement: Improvement::None,
            damage: 0,
            occupant: None,
            owner: 0,
            walls: WallSet::EMPTY,
        }
    }

    /// Row and column of the tile.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Improvement placed on the tile.
    #[must_use]
    pub const fn improvement(&self) -> Improvement {
        self.improvement
    }

    /// Head-on strikes absorbed by the tile's arrow, always below
    /// [`DESTRUCTION_THRESHOLD`].
    #[must_use]
    pub const fn damage(&self) -> u8 {
        self.damage
    }

    /// Starting mover recorded on the tile.
    #[must_use]
    pub const fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    /// Ownership tag, `0` when unset.
    #[must_use]
    pub const fn owner(&self) -> u32 {
        self.owner
    }

    /// Walls standing around the tile.
    #[must_use]
    pub const fn walls(&self) -> WallSet {
        self.walls
    }

    pub(crate) fn walls_mut(&mut self) -> &mut WallSet {
        &mut self.walls
    }

    /// Applies the placement rule: anything other than an arrow evicts the occupant.
    pub(crate) fn place_improvement(&mut self, improvement: Improvement) {
        if !improvement.is_arrow() && !improvement.is_none() {
            self.occupant = None;
        }
        self.improvement = improvement;
        self.damage = 0;
    }

    /// Applies the placement rule: an occupant evicts anything but an arrow.
    pub(crate) fn place_occupant(&mut self, occupant: Option<Occupant>) {
        if occupant.is_some() && !self.improvement.is_arrow() {
            self.improvement = Improvement::None;
            self.damage = 0;
        }
        self.occupant = occupant;
    }

    pub(crate) fn restore(
        &mut self,
        improvement: Improvement,
        occupant: Option<Occupant>,
        owner: u32,
    ) {
        self.improvement = improvement;
        self.occupant = occupant;
        self.owner = owner;
        self.damage = 0;
    }

    pub(crate) fn set_owner(&mut self, owner: u32) {
        self.owner = owner;
    }

    pub(crate) fn clear(&mut self) {
        self.improvement = Improvement::None;
        self.occupant = None;
        self.owner = 0;
        self.damage = 0;
    }

    pub(crate) fn reset(&mut self) {
        self.clear();
        self.walls = WallSet::EMPTY;
    }

    pub(crate) fn strike(&mut self) -> Option<ArrowStrike> {
        if !self.improvement.is_arrow() {
            return None;
        }

        if self.damage + 1 >= DESTRUCTION_THRESHOLD {
            self.improvement = Improvement::None;
            self.damage = 0;
            Some(ArrowStrike::Destroyed)
        } else {
            self.damage += 1;
            Some(ArrowStrike::Damaged(self.damage))
        }
    }
}
