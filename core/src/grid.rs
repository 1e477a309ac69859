//! Dense toroidal tile grid.

use glam::Vec2;

use crate::{ArrowStrike, Direction, Improvement, Occupant, Tile, TileCoord};

/// Rectangular grid of tiles whose rows and columns wrap around.
///
/// Tiles live in a row-major array and refer to each other only through
/// coordinates, so neighbour lookups are pure wrap arithmetic. Tile `(r, c)`
/// is centred at `Vec2::new(c * tile_size, r * tile_size)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates an empty grid whose tiles will measure `tile_size` world units.
    #[must_use]
    pub fn new(tile_size: f32) -> Self {
        Self {
            rows: 0,
            columns: 0,
            tile_size,
            tiles: Vec::new(),
        }
    }

    /// Creates a grid and immediately generates `rows * columns` blank tiles.
    #[must_use]
    pub fn with_dimensions(rows: u32, columns: u32, tile_size: f32) -> Self {
        let mut grid = Self::new(tile_size);
        grid.generate(rows, columns);
        grid
    }

    /// Discards every existing tile and allocates a blank `rows * columns` array.
    ///
    /// A zero extent leaves the grid empty.
    pub fn generate(&mut self, rows: u32, columns: u32) {
        self.tiles.clear();
        if rows == 0 || columns == 0 {
            self.rows = 0;
            self.columns = 0;
            return;
        }

        self.rows = rows;
        self.columns = columns;
        let capacity = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        self.tiles.reserve(capacity);
        for row in 0..rows {
            for column in 0..columns {
                self.tiles.push(Tile::new(TileCoord::new(row, column)));
            }
        }
    }

    /// Returns every tile to its blank state without reallocating.
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.reset();
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Reports whether no tiles have been generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether both grids have the same rows and columns.
    #[must_use]
    pub const fn same_dimensions(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.columns == other.columns
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).and_then(|index| self.tiles.get(index))
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.index(coord).and_then(|index| self.tiles.get_mut(index))
    }

    /// Row-major index of the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.row() < self.rows && coord.column() < self.columns {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    /// Coordinate of the neighbour on the given side, wrapping across edges.
    ///
    /// On a grid with a single row or column a tile can be its own neighbour.
    #[must_use]
    pub fn neighbor_of(&self, coord: TileCoord, direction: Direction) -> TileCoord {
        neighbor_coord(coord, direction, self.rows, self.columns)
    }

    /// Reports whether the tile lies on the outermost ring of rows or columns.
    #[must_use]
    pub fn is_edge_tile(&self, coord: TileCoord) -> bool {
        coord.row() == 0
            || coord.column() == 0
            || coord.row() + 1 == self.rows
            || coord.column() + 1 == self.columns
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn center_of(&self, coord: TileCoord) -> Vec2 {
        Vec2::new(
            coord.column() as f32 * self.tile_size,
            coord.row() as f32 * self.tile_size,
        )
    }

    /// Snaps a world-space position to the nearest tile centre.
    ///
    /// Returns `None` when the rounded index falls outside the grid.
    #[must_use]
    pub fn tile_coord_at(&self, position: Vec2) -> Option<TileCoord> {
        let column = (position.x / self.tile_size).round();
        let row = (position.y / self.tile_size).round();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        Some(TileCoord::new(row as u32, column as u32))
    }

    /// Tile nearest to a world-space position, if it lies inside the grid.
    #[must_use]
    pub fn tile_at(&self, position: Vec2) -> Option<&Tile> {
        self.tile_coord_at(position)
            .and_then(|coord| self.tile(coord))
    }

    /// Like [`Grid::tile_coord_at`] but wraps the rounded index onto the torus.
    #[must_use]
    pub fn wrapped_tile_coord(&self, position: Vec2) -> Option<TileCoord> {
        if self.is_empty() {
            return None;
        }
        let column = (position.x / self.tile_size).round() as i64;
        let row = (position.y / self.tile_size).round() as i64;
        let column = column.rem_euclid(i64::from(self.columns));
        let row = row.rem_euclid(i64::from(self.rows));
        Some(TileCoord::new(
            u32::try_from(row).ok()?,
            u32::try_from(column).ok()?,
        ))
    }

    /// Normalises a position into `[-tile_size / 2, extent * tile_size - tile_size / 2)`
    /// on each axis.
    #[must_use]
    pub fn wrap_coordinate(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(position.x, self.columns, self.tile_size),
            wrap_axis(position.y, self.rows, self.tile_size),
        )
    }

    /// Sets or removes the wall on one side of a tile and mirrors the change
    /// onto the neighbour sharing that wall.
    ///
    /// This is the only way wall state changes. Returns `true` when the wall
    /// changed.
    pub fn set_wall(&mut self, coord: TileCoord, direction: Direction, present: bool) -> bool {
        let Some(tile) = self.tile_mut(coord) else {
            return false;
        };
        if tile.walls().contains(direction) == present {
            return false;
        }
        tile.walls_mut().put(direction, present);

        let neighbor = self.neighbor_of(coord, direction);
        if let Some(neighbor) = self.tile_mut(neighbor) {
            neighbor.walls_mut().put(direction.opposite(), present);
        }
        true
    }

    /// Places an improvement, evicting the occupant unless it is an arrow or
    /// a removal. Returns `false` when the coordinate is outside the grid.
    pub fn place_improvement(&mut self, coord: TileCoord, improvement: Improvement) -> bool {
        self.tile_mut(coord)
            .map(|tile| tile.place_improvement(improvement))
            .is_some()
    }

    /// Places or removes an occupant, evicting any improvement other than an
    /// arrow. Returns `false` when the coordinate is outside the grid.
    pub fn place_occupant(&mut self, coord: TileCoord, occupant: Option<Occupant>) -> bool {
        self.tile_mut(coord)
            .map(|tile| tile.place_occupant(occupant))
            .is_some()
    }

    /// Writes tile fields verbatim, bypassing placement rules.
    ///
    /// Intended for restoring persisted state. Walls are left untouched.
    pub fn restore_tile(
        &mut self,
        coord: TileCoord,
        improvement: Improvement,
        occupant: Option<Occupant>,
        owner: u32,
    ) -> bool {
        self.tile_mut(coord)
            .map(|tile| tile.restore(improvement, occupant, owner))
            .is_some()
    }

    /// Updates the ownership tag of a tile.
    pub fn set_owner(&mut self, coord: TileCoord, owner: u32) -> bool {
        self.tile_mut(coord)
            .map(|tile| tile.set_owner(owner))
            .is_some()
    }

    /// Clears improvement, occupant, damage and owner. Walls are kept.
    pub fn clear_tile(&mut self, coord: TileCoord) -> bool {
        self.tile_mut(coord).map(Tile::clear).is_some()
    }

    /// Registers a head-on strike against the tile's arrow.
    ///
    /// Returns `None` when the tile has no arrow.
    pub fn strike_arrow(&mut self, coord: TileCoord) -> Option<ArrowStrike> {
        self.tile_mut(coord).and_then(Tile::strike)
    }

    /// Copies every tile's contents from a grid with identical dimensions.
    ///
    /// Returns `false`, leaving this grid untouched, when dimensions differ.
    pub fn copy_tiles_from(&mut self, source: &Grid) -> bool {
        if !self.same_dimensions(source) {
            return false;
        }
        self.tiles.clone_from_slice(&source.tiles);
        true
    }

    /// Shortest displacement from `from` to `to` on the torus.
    #[must_use]
    pub fn shortest_delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        Vec2::new(
            shortest_axis_delta(from.x, to.x, self.columns as f32 * self.tile_size),
            shortest_axis_delta(from.y, to.y, self.rows as f32 * self.tile_size),
        )
    }
}

/// Wraps a step from `coord` toward `direction` onto a `rows * columns` torus.
#[must_use]
pub fn neighbor_coord(
    coord: TileCoord,
    direction: Direction,
    rows: u32,
    columns: u32,
) -> TileCoord {
    if rows == 0 || columns == 0 {
        return coord;
    }
    let row = coord.row() % rows;
    let column = coord.column() % columns;
    match direction {
        Direction::North => TileCoord::new((row + rows - 1) % rows, column),
        Direction::South => TileCoord::new((row + 1) % rows, column),
        Direction::East => TileCoord::new(row, (column + 1) % columns),
        Direction::West => TileCoord::new(row, (column + columns - 1) % columns),
    }
}

fn wrap_axis(value: f32, extent: u32, tile_size: f32) -> f32 {
    let span = extent as f32 * tile_size;
    if span <= 0.0 {
        return value;
    }
    let half = tile_size / 2.0;
    // rem_euclid rounds tiny negative inputs up to `span` itself.
    let offset = (value + half).rem_euclid(span);
    let offset = if offset >= span { offset - span } else { offset };
    offset - half
}

fn shortest_axis_delta(from: f32, to: f32, span: f32) -> f32 {
    let mut delta = to - from;
    if span <= 0.0 {
        return delta;
    }
    let half = span / 2.0;
    if delta > half {
        delta -= span;
    }
    if delta < -half {
        delta += span;
    }
    delta
}
