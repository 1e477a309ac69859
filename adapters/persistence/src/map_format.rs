//! Line-oriented map format.
//!
//! A map is its height and width followed by one record per tile in
//! row-major order. Each record starts with a flag byte that announces which
//! optional fields follow:
//!
//! | bit   | meaning                                      |
//! |-------|----------------------------------------------|
//! | 0     | improvement kind and direction follow        |
//! | 1     | occupant kind and direction follow           |
//! | 2     | bits 4..7 carry the tile's walls             |
//! | 3     | owner tag follows                            |
//! | 4..7  | North, East, South, West walls               |
//!
//! Fields follow the flags in the order owner, improvement, occupant. Walls
//! are written only for tiles on row 0, column 0, or with an even
//! `row + column`; every wall edge touches at least one such tile, so the
//! rest are rebuilt by mirroring.

use scurry_core::{Direction, Grid, Improvement, MoverKind, Occupant, TileCoord, WallSet};

use crate::{CodecError, LineReader, LineWriter};

const HAS_IMPROVEMENT: u32 = 1 << 0;
const HAS_OCCUPANT: u32 = 1 << 1;
const HAS_WALLS: u32 = 1 << 2;
const HAS_OWNER: u32 = 1 << 3;
const WALL_SHIFT: u32 = 4;
const MAX_FLAGS: u32 = 0xff;

/// Writes `grid` as a map block.
pub fn write_map(grid: &Grid, out: &mut LineWriter) {
    out.push_u32(grid.rows());
    out.push_u32(grid.columns());

    for tile in grid.tiles() {
        let coord = tile.coord();
        let improvement = tile.improvement();
        let occupant = tile.occupant();
        let owner = tile.owner();

        let mut flags = 0;
        if !improvement.is_none() {
            flags |= HAS_IMPROVEMENT;
        }
        if occupant.is_some() {
            flags |= HAS_OCCUPANT;
        }
        if carries_walls(coord) {
            flags |= HAS_WALLS | (u32::from(tile.walls().bits()) << WALL_SHIFT);
        }
        if owner != 0 {
            flags |= HAS_OWNER;
        }
        out.push_u32(flags);

        if owner != 0 {
            out.push_u32(owner);
        }
        if !improvement.is_none() {
            out.push_u32(improvement_ordinal(improvement));
            out.push_u32(improvement.direction().map_or(0, |direction| {
                u32::from(direction.bits())
            }));
        }
        if let Some(occupant) = occupant {
            out.push_u32(kind_ordinal(occupant.kind));
            out.push_u32(u32::from(occupant.facing.bits()));
        }
    }
}

/// Reads a map block into a fresh grid whose tiles measure `tile_size`.
pub fn read_map(reader: &mut LineReader<'_>, tile_size: f32) -> Result<Grid, CodecError> {
    let rows = reader.next_u32("height")?;
    let columns = reader.next_u32("width")?;
    if rows == 0 || columns == 0 {
        return Err(CodecError::ZeroDimensions { rows, columns });
    }

    let mut grid = Grid::with_dimensions(rows, columns, tile_size);
    let mut walls = Vec::new();

    for row in 0..rows {
        for column in 0..columns {
            let coord = TileCoord::new(row, column);
            let flags = reader.next_u32("tile flags")?;
            if flags > MAX_FLAGS {
                return Err(reader.invalid("tile flags", flags));
            }

            let owner = if flags & HAS_OWNER != 0 {
                reader.next_u32("owner")?
            } else {
                0
            };
            let improvement = if flags & HAS_IMPROVEMENT != 0 {
                read_improvement(reader)?
            } else {
                Improvement::None
            };
            let occupant = if flags & HAS_OCCUPANT != 0 {
                Some(read_occupant(reader)?)
            } else {
                None
            };

            let _ = grid.restore_tile(coord, improvement, occupant, owner);
            if flags & HAS_WALLS != 0 {
                // Flags never exceed a byte, so the shifted nibble fits in u8.
                let bits = (flags >> WALL_SHIFT) as u8;
                walls.push((coord, WallSet::from_bits(bits)));
            }
        }
    }

    for (coord, set) in walls {
        for direction in set.iter() {
            let _ = grid.set_wall(coord, direction, true);
        }
    }

    Ok(grid)
}

/// Encodes `grid` as a standalone map stream.
#[must_use]
pub fn encode_map(grid: &Grid) -> Vec<String> {
    let mut writer = LineWriter::new();
    write_map(grid, &mut writer);
    writer.into_lines()
}

/// Decodes a standalone map stream.
pub fn decode_map(lines: &[String], tile_size: f32) -> Result<Grid, CodecError> {
    read_map(&mut LineReader::new(lines), tile_size)
}

/// Decodes a map into an existing grid.
///
/// The tile array is regenerated only when the stored dimensions differ;
/// otherwise tiles are reset and overwritten in place. On error `grid` is
/// left untouched.
pub fn decode_map_into(grid: &mut Grid, lines: &[String]) -> Result<(), CodecError> {
    let decoded = decode_map(lines, grid.tile_size())?;
    if !grid.same_dimensions(&decoded) {
        grid.generate(decoded.rows(), decoded.columns());
    }
    grid.reset();
    let _ = grid.copy_tiles_from(&decoded);
    Ok(())
}

const fn carries_walls(coord: TileCoord) -> bool {
    coord.row() == 0 || coord.column() == 0 || (coord.row() + coord.column()) % 2 == 0
}

const fn improvement_ordinal(improvement: Improvement) -> u32 {
    match improvement {
        Improvement::None => 0,
        Improvement::Hole => 1,
        Improvement::Goal => 2,
        Improvement::Spawner(_) => 3,
        Improvement::Arrow(_) => 4,
    }
}

const fn kind_ordinal(kind: MoverKind) -> u32 {
    match kind {
        MoverKind::Mouse => 1,
        MoverKind::Cat => 2,
    }
}

fn read_improvement(reader: &mut LineReader<'_>) -> Result<Improvement, CodecError> {
    let kind = reader.next_u32("improvement kind")?;
    let kind_error = reader.invalid("improvement kind", kind);
    let direction = reader.next_u32("improvement direction")?;

    let improvement = match kind {
        0 => Improvement::None,
        1 => Improvement::Hole,
        2 => Improvement::Goal,
        3 => Improvement::Spawner(read_direction(reader, "improvement direction", direction)?),
        4 => Improvement::Arrow(read_direction(reader, "improvement direction", direction)?),
        _ => return Err(kind_error),
    };
    Ok(improvement)
}

fn read_occupant(reader: &mut LineReader<'_>) -> Result<Occupant, CodecError> {
    let kind = reader.next_u32("occupant kind")?;
    let kind = match kind {
        1 => MoverKind::Mouse,
        2 => MoverKind::Cat,
        other => return Err(reader.invalid("occupant kind", other)),
    };
    let facing = reader.next_u32("occupant direction")?;
    let facing = read_direction(reader, "occupant direction", facing)?;
    Ok(Occupant::new(kind, facing))
}

fn read_direction(
    reader: &LineReader<'_>,
    field: &'static str,
    value: u32,
) -> Result<Direction, CodecError> {
    u8::try_from(value)
        .ok()
        .and_then(Direction::from_bits)
        .ok_or_else(|| reader.invalid(field, value))
}
