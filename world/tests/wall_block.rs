use scurry_core::{Direction, WallSet};
use scurry_world::resolve_wall_block;

const INCOMING: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

use Direction::{East, North, South, West};

/// Outgoing heading for every wall mask (N=1, E=2, S=4, W=8) and incoming
/// heading, listed in `INCOMING` order.
const FIXTURES: [(u8, [Direction; 4]); 16] = [
    (0b0000, [North, East, South, West]),
    (0b0001, [East, East, South, West]),
    (0b0010, [North, South, South, West]),
    (0b0011, [South, South, South, West]),
    (0b0100, [North, East, West, West]),
    (0b0101, [East, East, West, West]),
    (0b0110, [North, West, West, West]),
    (0b0111, [West, West, West, West]),
    (0b1000, [North, East, South, North]),
    (0b1001, [East, East, South, East]),
    (0b1010, [North, South, South, North]),
    (0b1011, [South, South, South, South]),
    (0b1100, [North, East, North, North]),
    (0b1101, [East, East, East, East]),
    (0b1110, [North, North, North, North]),
    (0b1111, [South, West, North, East]),
];

#[test]
fn wall_block_resolution_matches_fixture_table() {
    for (mask, expected) in FIXTURES {
        let walls = WallSet::from_bits(mask);
        for (incoming, outgoing) in INCOMING.into_iter().zip(expected) {
            assert_eq!(
                resolve_wall_block(walls, incoming),
                outgoing,
                "walls {mask:#06b}, incoming {incoming:?}"
            );
        }
    }
}

#[test]
fn north_east_corner_sends_northbound_mover_south() {
    let walls = WallSet::from_bits(Direction::North.bits() | Direction::East.bits());
    assert_eq!(resolve_wall_block(walls, Direction::North), Direction::South);
}

#[test]
fn resolved_heading_is_open_unless_enclosed() {
    for mask in 0..16u8 {
        let walls = WallSet::from_bits(mask);
        if walls.is_enclosed() {
            continue;
        }
        for incoming in INCOMING {
            let outgoing = resolve_wall_block(walls, incoming);
            assert!(
                !walls.contains(outgoing),
                "walls {mask:#06b} left {incoming:?} facing a wall"
            );
        }
    }
}
