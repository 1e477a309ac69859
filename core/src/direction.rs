//! Cardinal direction algebra shared by the grid and its movers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

const DIRECTION_FIELD: u8 = 0b1111;
const FIELD_WIDTH: u32 = 4;

/// One of the four cardinal directions, stored as a single bit of a 4-bit field.
///
/// Bits advance clockwise (north, east, south, west), so turning is a cyclic
/// rotation of the field: one position for a quarter turn and two for a
/// reversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward decreasing row indices.
    North = 0b0001,
    /// Toward increasing column indices.
    East = 0b0010,
    /// Toward increasing row indices.
    South = 0b0100,
    /// Toward decreasing column indices.
    West = 0b1000,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Single-bit representation of the direction.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a single-bit value, returning `None` for anything else.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b0001 => Some(Self::North),
            0b0010 => Some(Self::East),
            0b0100 => Some(Self::South),
            0b1000 => Some(Self::West),
            _ => None,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        rotate(self, 2)
    }

    /// Direction a quarter turn clockwise from this one.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        rotate(self, 1)
    }

    /// Direction a quarter turn counter-clockwise from this one.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        rotate(self, FIELD_WIDTH - 1)
    }

    /// Unit vector in grid space, `x` along columns and `y` along rows.
    #[must_use]
    pub const fn to_vector(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }
}

const fn rotate(direction: Direction, steps: u32) -> Direction {
    let bits = direction.bits();
    let rotated = ((bits << steps) | (bits >> (FIELD_WIDTH - steps))) & DIRECTION_FIELD;
    match Direction::from_bits(rotated) {
        Some(turned) => turned,
        None => direction,
    }
}

#[cfg(test)]
mod tests {
    use super::Direction;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn four_clockwise_turns_are_identity() {
        for direction in Direction::ALL {
            let turned = direction.clockwise().clockwise().clockwise().clockwise();
            assert_eq!(turned, direction);
        }
    }

    #[test]
    fn counter_clockwise_undoes_clockwise() {
        for direction in Direction::ALL {
            assert_eq!(direction.clockwise().counter_clockwise(), direction);
            assert_eq!(direction.counter_clockwise().clockwise(), direction);
        }
    }

    #[test]
    fn clockwise_order_matches_compass() {
        assert_eq!(Direction::North.clockwise(), Direction::East);
        assert_eq!(Direction::East.clockwise(), Direction::South);
        assert_eq!(Direction::South.clockwise(), Direction::West);
        assert_eq!(Direction::West.clockwise(), Direction::North);
    }

    #[test]
    fn opposite_vectors_cancel() {
        for direction in Direction::ALL {
            let sum = direction.to_vector() + direction.opposite().to_vector();
            assert_eq!(sum.length_squared(), 0.0);
        }
    }

    #[test]
    fn from_bits_rejects_multi_bit_values() {
        assert_eq!(Direction::from_bits(0), None);
        assert_eq!(Direction::from_bits(0b0011), None);
        assert_eq!(Direction::from_bits(0b1_0000), None);
        for direction in Direction::ALL {
            assert_eq!(Direction::from_bits(direction.bits()), Some(direction));
        }
    }
}
