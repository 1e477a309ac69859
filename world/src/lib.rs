#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scurry.

mod movers;

use std::time::Duration;

use log::{debug, info, warn};
use scurry_core::{
    Command, DestroyCause, Direction, Event, Grid, MoverId, MoverKind, Occupant, SimulationState,
    Stage, StageInfo, Tile, TileCoord, STAGE_FORMAT_VERSION,
};

use movers::{resolve_catches, Mover};

pub use movers::resolve_wall_block;

const DEFAULT_GRID_ROWS: u32 = 9;
const DEFAULT_GRID_COLUMNS: u32 = 12;
const DEFAULT_TILE_SIZE: f32 = 1.0;
const DEFAULT_MOUSE_SPEED: f32 = 4.0;
const DEFAULT_CAT_SPEED: f32 = 2.8;

/// Construction parameters that stay fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    tile_size: f32,
    mouse_speed: f32,
    cat_speed: f32,
}

impl WorldConfig {
    /// Creates a configuration with explicit tile size and mover speeds.
    #[must_use]
    pub const fn new(tile_size: f32, mouse_speed: f32, cat_speed: f32) -> Self {
        Self {
            tile_size,
            mouse_speed,
            cat_speed,
        }
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE, DEFAULT_MOUSE_SPEED, DEFAULT_CAT_SPEED)
    }
}

/// Represents the authoritative Scurry world state.
#[derive(Debug)]
pub struct World {
    stage: StageInfo,
    grid: Grid,
    movers: Vec<Mover>,
    next_mover_id: u32,
    simulation: SimulationState,
    mouse_speed: f32,
    cat_speed: f32,
    tick_index: u64,
}

impl World {
    /// Creates a world with the default configuration and a blank grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world with the provided configuration and a blank grid.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let tile_size = if config.tile_size > 0.0 {
            config.tile_size
        } else {
            DEFAULT_TILE_SIZE
        };
        Self {
            stage: StageInfo::default(),
            grid: Grid::with_dimensions(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLUMNS, tile_size),
            movers: Vec::new(),
            next_mover_id: 0,
            simulation: SimulationState::Suspended,
            mouse_speed: config.mouse_speed,
            cat_speed: config.cat_speed,
            tick_index: 0,
        }
    }

    fn speed_of(&self, kind: MoverKind) -> f32 {
        match kind {
            MoverKind::Mouse => self.mouse_speed,
            MoverKind::Cat => self.cat_speed,
        }
    }

    fn regenerate(&mut self, rows: u32, columns: u32, out_events: &mut Vec<Event>) {
        for tile in self.grid.tiles() {
            out_events.push(Event::TileDestroyed { tile: tile.coord() });
        }
        self.grid.generate(rows, columns);
        for tile in self.grid.tiles() {
            out_events.push(Event::TileCreated { tile: tile.coord() });
        }
    }

    fn clear_movers(&mut self, out_events: &mut Vec<Event>) {
        for mover in self.movers.drain(..) {
            out_events.push(Event::MoverDestroyed {
                mover: mover.id,
                kind: mover.kind,
                cause: DestroyCause::GridReset,
            });
        }
    }

    fn edit_tile<F>(&mut self, coord: TileCoord, out_events: &mut Vec<Event>, edit: F)
    where
        F: FnOnce(&mut Grid) -> bool,
    {
        let Some(before) = self.grid.tile(coord).cloned() else {
            debug!("ignoring edit of tile {coord:?} outside the grid");
            return;
        };
        let _ = edit(&mut self.grid);
        if let Some(after) = self.grid.tile(coord) {
            push_tile_changes(&before, after, out_events);
        }
    }

    fn spawn_mover(
        &mut self,
        tile: TileCoord,
        kind: MoverKind,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) {
        if self.grid.tile(tile).is_none() {
            debug!("ignoring spawn on tile {tile:?} outside the grid");
            return;
        }

        let id = MoverId::new(self.next_mover_id);
        self.next_mover_id = self.next_mover_id.saturating_add(1);
        let mover = Mover::spawn(id, kind, tile, facing, &self.grid);
        out_events.push(Event::MoverCreated {
            mover: id,
            kind,
            position: mover.position,
            facing,
        });
        self.movers.push(mover);
    }

    fn release_occupants(&mut self, out_events: &mut Vec<Event>) {
        let occupants: Vec<(TileCoord, Occupant)> = self
            .grid
            .tiles()
            .iter()
            .filter_map(|tile| tile.occupant().map(|occupant| (tile.coord(), occupant)))
            .collect();
        for (tile, occupant) in occupants {
            self.spawn_mover(tile, occupant.kind, occupant.facing, out_events);
        }
    }

    fn load_stage(&mut self, stage: Stage, out_events: &mut Vec<Event>) {
        if stage.format_version != STAGE_FORMAT_VERSION {
            warn!(
                "refusing stage '{}' with format version {} (supported: {})",
                stage.info.name, stage.format_version, STAGE_FORMAT_VERSION
            );
            return;
        }
        if stage.grid.is_empty() {
            warn!("refusing stage '{}' without tiles", stage.info.name);
            return;
        }

        self.clear_movers(out_events);
        if !self.grid.same_dimensions(&stage.grid) {
            self.regenerate(stage.grid.rows(), stage.grid.columns(), out_events);
        }

        let before: Vec<Tile> = self.grid.tiles().to_vec();
        let _ = self.grid.copy_tiles_from(&stage.grid);
        for (old, new) in before.iter().zip(self.grid.tiles()) {
            push_tile_changes(old, new, out_events);
        }

        info!(
            "loaded stage '{}' ({}x{})",
            stage.info.name,
            self.grid.rows(),
            self.grid.columns()
        );
        self.stage = stage.info;
        out_events.push(Event::StageLoaded {
            info: self.stage.clone(),
            rows: self.grid.rows(),
            columns: self.grid.columns(),
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.simulation == SimulationState::Suspended {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let seconds = dt.as_secs_f32();
        let mouse_speed = self.speed_of(MoverKind::Mouse);
        let cat_speed = self.speed_of(MoverKind::Cat);
        let mut removed: Vec<(MoverId, MoverKind, DestroyCause)> = Vec::new();

        for mover in &mut self.movers {
            let speed = match mover.kind {
                MoverKind::Mouse => mouse_speed,
                MoverKind::Cat => cat_speed,
            };
            match mover.advance(&mut self.grid, speed * seconds, out_events) {
                Some(cause) => {
                    removed.push((mover.id, mover.kind, cause));
                    out_events.push(Event::MoverDestroyed {
                        mover: mover.id,
                        kind: mover.kind,
                        cause,
                    });
                }
                None => out_events.push(Event::MoverMoved {
                    mover: mover.id,
                    position: mover.position,
                    facing: mover.facing,
                }),
            }
        }

        let arrivals = removed.len();
        resolve_catches(&self.movers, &self.grid, &mut removed);
        for (mover, kind, cause) in &removed[arrivals..] {
            out_events.push(Event::MoverDestroyed {
                mover: *mover,
                kind: *kind,
                cause: *cause,
            });
        }

        if !removed.is_empty() {
            self.movers
                .retain(|mover| !removed.iter().any(|(id, _, _)| *id == mover.id));
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn push_tile_changes(before: &Tile, after: &Tile, out_events: &mut Vec<Event>) {
    let tile = after.coord();
    if before.improvement() != after.improvement() {
        out_events.push(Event::ImprovementChanged {
            tile,
            improvement: after.improvement(),
        });
    }
    if before.occupant() != after.occupant() {
        out_events.push(Event::OccupantChanged {
            tile,
            occupant: after.occupant(),
        });
    }
    if before.owner() != after.owner() {
        out_events.push(Event::OwnerChanged {
            tile,
            owner: after.owner(),
        });
    }
    for direction in Direction::ALL {
        let present = after.walls().contains(direction);
        if before.walls().contains(direction) != present {
            out_events.push(Event::WallChanged {
                tile,
                direction,
                present,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateGrid { rows, columns } => {
            if rows == 0 || columns == 0 {
                debug!("ignoring grid generation with zero extent ({rows}x{columns})");
                return;
            }
            world.clear_movers(out_events);
            world.regenerate(rows, columns, out_events);
        }
        Command::ConfigureMovers {
            mouse_speed,
            cat_speed,
        } => {
            if !(mouse_speed >= 0.0 && cat_speed >= 0.0) {
                debug!("ignoring invalid mover speeds ({mouse_speed}, {cat_speed})");
                return;
            }
            world.mouse_speed = mouse_speed;
            world.cat_speed = cat_speed;
        }
        Command::SetSimulationState { state } => {
            if world.simulation != state {
                world.simulation = state;
                out_events.push(Event::SimulationStateChanged { state });
            }
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetWall {
            tile,
            direction,
            present,
        } => {
            if !world.grid.set_wall(tile, direction, present) {
                return;
            }
            out_events.push(Event::WallChanged {
                tile,
                direction,
                present,
            });
            out_events.push(Event::WallChanged {
                tile: world.grid.neighbor_of(tile, direction),
                direction: direction.opposite(),
                present,
            });
        }
        Command::PlaceImprovement { tile, improvement } => {
            world.edit_tile(tile, out_events, |grid| {
                grid.place_improvement(tile, improvement)
            });
        }
        Command::PlaceOccupant { tile, occupant } => {
            world.edit_tile(tile, out_events, |grid| grid.place_occupant(tile, occupant));
        }
        Command::SetOwner { tile, owner } => {
            world.edit_tile(tile, out_events, |grid| grid.set_owner(tile, owner));
        }
        Command::ClearTile { tile } => {
            world.edit_tile(tile, out_events, |grid| grid.clear_tile(tile));
        }
        Command::SpawnMover { tile, kind, facing } => {
            world.spawn_mover(tile, kind, facing, out_events);
        }
        Command::ReleaseOccupants => world.release_occupants(out_events),
        Command::LoadStage { stage } => world.load_stage(*stage, out_events),
        Command::RenameStage { info } => world.stage = info,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scurry_core::{
        Direction, Grid, Improvement, MoverView, SimulationState, Stage, StageInfo, Tile,
        TileCoord,
    };

    use super::World;

    /// Provides read-only access to the stage metadata.
    #[must_use]
    pub fn stage_info(world: &World) -> &StageInfo {
        &world.stage
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Tile at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn tile(world: &World, coord: TileCoord) -> Option<&Tile> {
        world.grid.tile(coord)
    }

    /// Captures the stage metadata and grid for persistence.
    #[must_use]
    pub fn stage(world: &World) -> Stage {
        Stage::new(world.stage.clone(), world.grid.clone())
    }

    /// Reports whether ticks currently advance the simulation.
    #[must_use]
    pub fn simulation_state(world: &World) -> SimulationState {
        world.simulation
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the movers in update order.
    #[must_use]
    pub fn mover_view(world: &World) -> MoverView {
        MoverView::from_snapshots(world.movers.iter().map(|mover| mover.snapshot()).collect())
    }

    /// Enumerates spawner tiles with the direction their movers face.
    #[must_use]
    pub fn spawners(world: &World) -> Vec<(TileCoord, Direction)> {
        world
            .grid
            .tiles()
            .iter()
            .filter_map(|tile| match tile.improvement() {
                Improvement::Spawner(direction) => Some((tile.coord(), direction)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scurry_core::Improvement;

    fn running_world(rows: u32, columns: u32) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::GenerateGrid { rows, columns },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetSimulationState {
                state: SimulationState::Running,
            },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn generate_grid_reports_tile_lifecycle() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::GenerateGrid {
                rows: 2,
                columns: 3,
            },
            &mut events,
        );

        let destroyed = events
            .iter()
            .filter(|event| matches!(event, Event::TileDestroyed { .. }))
            .count();
        let created = events
            .iter()
            .filter(|event| matches!(event, Event::TileCreated { .. }))
            .count();
        assert_eq!(destroyed, (DEFAULT_GRID_ROWS * DEFAULT_GRID_COLUMNS) as usize);
        assert_eq!(created, 6);
        assert_eq!(query::grid(&world).rows(), 2);
        assert_eq!(query::grid(&world).columns(), 3);
    }

    #[test]
    fn zero_extent_grid_is_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::GenerateGrid {
                rows: 0,
                columns: 4,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::grid(&world).rows(), DEFAULT_GRID_ROWS);
    }

    #[test]
    fn suspended_tick_is_a_no_op() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnMover {
                tile: TileCoord::new(1, 1),
                kind: MoverKind::Mouse,
                facing: Direction::East,
            },
            &mut events,
        );
        let before = query::mover_view(&world).into_vec();

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::mover_view(&world).into_vec(), before);
        assert_eq!(query::tick_index(&world), 0);
    }

    #[test]
    fn set_wall_reports_both_sides() {
        let (mut world, _) = running_world(3, 3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetWall {
                tile: TileCoord::new(0, 0),
                direction: Direction::West,
                present: true,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::WallChanged {
                    tile: TileCoord::new(0, 0),
                    direction: Direction::West,
                    present: true,
                },
                Event::WallChanged {
                    tile: TileCoord::new(0, 2),
                    direction: Direction::East,
                    present: true,
                },
            ]
        );

        events.clear();
        apply(
            &mut world,
            Command::SetWall {
                tile: TileCoord::new(0, 2),
                direction: Direction::East,
                present: true,
            },
            &mut events,
        );
        assert!(events.is_empty(), "unchanged wall must not notify");
    }

    #[test]
    fn placing_goal_over_occupant_reports_both_changes() {
        let (mut world, _) = running_world(3, 3);
        let tile = TileCoord::new(1, 1);
        let occupant = Occupant::new(MoverKind::Mouse, Direction::North);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceOccupant {
                tile,
                occupant: Some(occupant),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::PlaceImprovement {
                tile,
                improvement: Improvement::Goal,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::ImprovementChanged {
                    tile,
                    improvement: Improvement::Goal,
                },
                Event::OccupantChanged {
                    tile,
                    occupant: None,
                },
            ]
        );
    }

    #[test]
    fn out_of_bounds_edits_are_silent() {
        let (mut world, _) = running_world(3, 3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceImprovement {
                tile: TileCoord::new(7, 0),
                improvement: Improvement::Hole,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnMover {
                tile: TileCoord::new(0, 9),
                kind: MoverKind::Cat,
                facing: Direction::South,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::mover_view(&world).is_empty());
    }

    #[test]
    fn release_occupants_spawns_in_row_major_order() {
        let (mut world, _) = running_world(3, 3);
        let mut events = Vec::new();
        for (tile, kind) in [
            (TileCoord::new(2, 0), MoverKind::Cat),
            (TileCoord::new(0, 1), MoverKind::Mouse),
        ] {
            apply(
                &mut world,
                Command::PlaceOccupant {
                    tile,
                    occupant: Some(Occupant::new(kind, Direction::East)),
                },
                &mut events,
            );
        }

        apply(&mut world, Command::ReleaseOccupants, &mut events);
        let kinds: Vec<_> = query::mover_view(&world)
            .iter()
            .map(|mover| mover.kind)
            .collect();
        assert_eq!(kinds, vec![MoverKind::Mouse, MoverKind::Cat]);
    }

    #[test]
    fn load_stage_with_foreign_version_leaves_world_untouched() {
        let (mut world, _) = running_world(3, 3);
        let mut stage = query::stage(&world);
        stage.info = StageInfo::new("Future", "track", "pack");
        stage.format_version = STAGE_FORMAT_VERSION + 1;
        assert!(stage
            .grid
            .place_improvement(TileCoord::new(0, 0), Improvement::Goal));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadStage {
                stage: Box::new(stage),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::stage_info(&world), &StageInfo::default());
        let tile = query::tile(&world, TileCoord::new(0, 0)).map(Tile::improvement);
        assert_eq!(tile, Some(Improvement::None));
    }

    #[test]
    fn load_stage_with_same_dimensions_resets_in_place() {
        let (mut world, _) = running_world(3, 3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceImprovement {
                tile: TileCoord::new(1, 1),
                improvement: Improvement::Hole,
            },
            &mut events,
        );

        let mut grid = Grid::with_dimensions(3, 3, 1.0);
        assert!(grid.place_improvement(TileCoord::new(2, 2), Improvement::Goal));
        let stage = Stage::new(StageInfo::new("Swap", "calm", "default"), grid);

        events.clear();
        apply(
            &mut world,
            Command::LoadStage {
                stage: Box::new(stage),
            },
            &mut events,
        );

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::TileCreated { .. })));
        assert!(events.contains(&Event::ImprovementChanged {
            tile: TileCoord::new(1, 1),
            improvement: Improvement::None,
        }));
        assert!(events.contains(&Event::ImprovementChanged {
            tile: TileCoord::new(2, 2),
            improvement: Improvement::Goal,
        }));
        assert_eq!(query::stage_info(&world).name, "Swap");
    }
}
