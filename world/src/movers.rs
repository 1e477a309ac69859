//! Continuous grid movers and tile-arrival resolution.

use glam::Vec2;
use scurry_core::{
    ArrowStrike, DestroyCause, Direction, Event, Grid, Improvement, MoverId, MoverKind,
    MoverSnapshot, TileCoord, WallSet,
};

/// Mover state owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Mover {
    pub(crate) id: MoverId,
    pub(crate) kind: MoverKind,
    pub(crate) position: Vec2,
    pub(crate) facing: Direction,
    current_tile: Option<TileCoord>,
    remaining_distance: f32,
    on_edge_ring: bool,
}

impl Mover {
    /// Places a mover on the centre of `tile`, a full tile away from its next arrival.
    pub(crate) fn spawn(
        id: MoverId,
        kind: MoverKind,
        tile: TileCoord,
        facing: Direction,
        grid: &Grid,
    ) -> Self {
        Self {
            id,
            kind,
            position: grid.center_of(tile),
            facing,
            current_tile: None,
            remaining_distance: grid.tile_size(),
            on_edge_ring: grid.is_edge_tile(tile),
        }
    }

    pub(crate) fn snapshot(&self) -> MoverSnapshot {
        MoverSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            facing: self.facing,
            current_tile: self.current_tile,
            remaining_distance: self.remaining_distance,
            on_edge_ring: self.on_edge_ring,
        }
    }

    /// Moves the mover `travel` world units along its facing.
    ///
    /// At most one tile arrival is resolved per call. Travel left over after
    /// that arrival carries the mover past the next centre without resolving
    /// it, so very high speeds or long ticks can skip tiles.
    pub(crate) fn advance(
        &mut self,
        grid: &mut Grid,
        travel: f32,
        out_events: &mut Vec<Event>,
    ) -> Option<DestroyCause> {
        let mut budget = travel;

        if budget >= self.remaining_distance {
            let consumed = self.remaining_distance;
            self.position += self.facing.to_vector() * consumed;
            self.remaining_distance = 0.0;
            budget -= consumed;
            self.wrap_edges(grid);

            if let Some(cause) = self.arrive(grid, out_events) {
                return Some(cause);
            }
        }

        self.position += self.facing.to_vector() * budget;
        self.remaining_distance = (self.remaining_distance - budget).max(0.0);
        self.wrap_edges(grid);
        None
    }

    /// Teleports across a seam so the position stays inside the grid's
    /// canonical `[-size / 2, extent * size - size / 2)` range.
    ///
    /// The range is half-open like [`Grid::wrap_coordinate`]: a mover exactly
    /// on `-size / 2` is already inside and is not teleported.
    fn wrap_edges(&mut self, grid: &Grid) {
        if !self.on_edge_ring {
            return;
        }

        let size = grid.tile_size();
        let half = size / 2.0;
        let width = grid.columns() as f32 * size;
        let height = grid.rows() as f32 * size;

        if self.position.x < -half {
            self.position.x += width;
        } else if self.position.x >= width - half {
            self.position.x -= width;
        }

        if self.position.y < -half {
            self.position.y += height;
        } else if self.position.y >= height - half {
            self.position.y -= height;
        }
    }

    fn arrive(&mut self, grid: &mut Grid, out_events: &mut Vec<Event>) -> Option<DestroyCause> {
        let Some(coord) = grid.wrapped_tile_coord(self.position) else {
            return Some(DestroyCause::GridReset);
        };
        self.current_tile = Some(coord);
        let improvement = grid
            .tile(coord)
            .map_or(Improvement::None, |tile| tile.improvement());

        match improvement {
            Improvement::Goal => return Some(DestroyCause::ReachedGoal),
            Improvement::Hole => return Some(DestroyCause::FellInHole),
            Improvement::Arrow(direction) => {
                let approach = self.facing;
                self.facing = direction;
                if self.kind == MoverKind::Cat && approach == direction.opposite() {
                    match grid.strike_arrow(coord) {
                        Some(ArrowStrike::Damaged(damage)) => {
                            out_events.push(Event::ArrowDamaged {
                                tile: coord,
                                damage,
                            });
                        }
                        Some(ArrowStrike::Destroyed) => {
                            out_events.push(Event::ImprovementChanged {
                                tile: coord,
                                improvement: Improvement::None,
                            });
                        }
                        None => {}
                    }
                }
            }
            Improvement::None | Improvement::Spawner(_) => {}
        }

        // Walls win over arrows, even when the arrow just turned the mover.
        let walls = grid.tile(coord).map_or(WallSet::EMPTY, |tile| tile.walls());
        self.facing = resolve_wall_block(walls, self.facing);

        self.position = grid.center_of(coord);
        self.on_edge_ring = grid.is_edge_tile(coord);
        self.remaining_distance = grid.tile_size();
        None
    }
}

/// Picks the heading a mover leaves a tile with when its facing is walled off.
///
/// An open facing is kept. Otherwise the mover turns clockwise, then
/// reverses, then turns counter-clockwise, taking the first open side. A tile
/// walled on all four sides reverses the mover.
#[must_use]
pub fn resolve_wall_block(walls: WallSet, facing: Direction) -> Direction {
    if !walls.contains(facing) {
        return facing;
    }
    if walls.is_enclosed() {
        return facing.opposite();
    }

    let clockwise = facing.clockwise();
    if !walls.contains(clockwise) {
        return clockwise;
    }

    let reverse = facing.opposite();
    if !walls.contains(reverse) {
        return reverse;
    }

    facing.counter_clockwise()
}

/// Removes every mouse that a cat overlaps, appending the casualties in order.
///
/// Movers listed in `removed` are skipped on both sides.
pub(crate) fn resolve_catches(
    movers: &[Mover],
    grid: &Grid,
    removed: &mut Vec<(MoverId, MoverKind, DestroyCause)>,
) {
    let radius = grid.tile_size() / 2.0;
    let radius_squared = radius * radius;

    for cat in movers.iter().filter(|mover| mover.kind == MoverKind::Cat) {
        if is_removed(removed, cat.id) {
            continue;
        }

        for mouse in movers.iter().filter(|mover| mover.kind == MoverKind::Mouse) {
            if is_removed(removed, mouse.id) {
                continue;
            }
            let delta = grid.shortest_delta(cat.position, mouse.position);
            if delta.length_squared() < radius_squared {
                removed.push((mouse.id, mouse.kind, DestroyCause::Caught));
            }
        }
    }
}

fn is_removed(removed: &[(MoverId, MoverKind, DestroyCause)], id: MoverId) -> bool {
    removed.iter().any(|(removed_id, _, _)| *removed_id == id)
}
