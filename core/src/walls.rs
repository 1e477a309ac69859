//! Per-tile wall presence.

use serde::{Deserialize, Serialize};

use crate::Direction;

const ALL_WALLS: u8 = 0b1111;

/// Walls standing on the four sides of a tile, keyed by [`Direction`] bits.
///
/// A wall on side `d` of a tile is the same wall as the one on side
/// `d.opposite()` of the neighbouring tile. `WallSet` values only change
/// through [`crate::Grid::set_wall`], which keeps both sides in step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSet(u8);

impl WallSet {
    /// A wall set without any walls.
    pub const EMPTY: WallSet = WallSet(0);

    /// Builds a wall set from a 4-bit mask of direction bits.
    ///
    /// Bits above the low nibble are discarded.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & ALL_WALLS)
    }

    /// Raw 4-bit mask of direction bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether a wall stands on the given side.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bits() != 0
    }

    /// Number of sides carrying a wall.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Reports whether no side is walled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Reports whether every side is walled.
    #[must_use]
    pub const fn is_enclosed(self) -> bool {
        self.0 == ALL_WALLS
    }

    /// Iterates the walled sides in clockwise order from north.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }

    pub(crate) fn put(&mut self, direction: Direction, present: bool) {
        if present {
            self.0 |= direction.bits();
        } else {
            self.0 &= !direction.bits();
        }
    }
}
