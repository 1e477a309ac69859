//! Stage creation through the editor placement rules.

use anyhow::{bail, Result};
use rand::Rng;
use scurry_core::{
    Command, Direction, Event, Improvement, MoverKind, Occupant, Stage, StageInfo, Tile, TileCoord,
};
use scurry_system_builder::{Builder, GameMode, Inventory, PlacementRequest};
use scurry_world::{self as world, query, World, WorldConfig};

/// Chance that a scrambled tile receives a non-empty improvement.
const IMPROVEMENT_CHANCE: f64 = 0.3;
const OCCUPANT_CHANCE: f64 = 0.1;
const WALL_CHANCE: f64 = 0.15;
const OWNER_CHANCE: f64 = 0.05;

/// Builds a stage by routing edits through an editor-mode [`Builder`].
#[derive(Debug)]
pub(crate) struct StageAuthor {
    world: World,
    builder: Builder,
}

impl StageAuthor {
    pub(crate) fn new(config: WorldConfig, rows: u32, columns: u32, info: StageInfo) -> Result<Self> {
        if rows == 0 || columns == 0 {
            bail!("stage dimensions must be positive, got {rows}x{columns}");
        }

        let mut world = World::with_config(config);
        let mut events = Vec::new();
        world::apply(&mut world, Command::GenerateGrid { rows, columns }, &mut events);
        world::apply(&mut world, Command::RenameStage { info }, &mut events);

        Ok(Self {
            world,
            builder: Builder::new(GameMode::Editor, Inventory::new()),
        })
    }

    /// Submits a placement request, reporting whether it changed the stage.
    pub(crate) fn request(&mut self, request: PlacementRequest) -> bool {
        let mut commands = Vec::new();
        let world = &self.world;
        self.builder.handle(
            &[],
            Some(request),
            |tile| query::tile(world, tile).map(Tile::improvement),
            &mut commands,
        );

        let mut events: Vec<Event> = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        !events.is_empty()
    }

    /// Walls off the north edge of row 0 and the west edge of column 0, which
    /// the torus shares with the south and east edges.
    pub(crate) fn add_border_walls(&mut self) {
        let grid = query::grid(&self.world);
        let (rows, columns) = (grid.rows(), grid.columns());
        for column in 0..columns {
            let _ = self.request(PlacementRequest::Wall {
                tile: TileCoord::new(0, column),
                direction: Direction::North,
                present: true,
            });
        }
        for row in 0..rows {
            let _ = self.request(PlacementRequest::Wall {
                tile: TileCoord::new(row, 0),
                direction: Direction::West,
                present: true,
            });
        }
    }

    /// Fills the stage with random improvements, occupants, walls and owners.
    pub(crate) fn scramble<R: Rng>(&mut self, rng: &mut R) {
        let grid = query::grid(&self.world);
        let (rows, columns) = (grid.rows(), grid.columns());

        for row in 0..rows {
            for column in 0..columns {
                let tile = TileCoord::new(row, column);
                if rng.gen_bool(IMPROVEMENT_CHANCE) {
                    let improvement = random_improvement(rng);
                    let _ = self.request(PlacementRequest::Improvement { tile, improvement });
                }
                if rng.gen_bool(OCCUPANT_CHANCE) {
                    let kind = if rng.gen_bool(0.5) {
                        MoverKind::Mouse
                    } else {
                        MoverKind::Cat
                    };
                    let occupant = Some(Occupant::new(kind, random_direction(rng)));
                    let _ = self.request(PlacementRequest::Occupant { tile, occupant });
                }
                for direction in Direction::ALL {
                    if rng.gen_bool(WALL_CHANCE) {
                        let _ = self.request(PlacementRequest::Wall {
                            tile,
                            direction,
                            present: true,
                        });
                    }
                }
                if rng.gen_bool(OWNER_CHANCE) {
                    let owner = rng.gen_range(1..=4);
                    let mut events = Vec::new();
                    world::apply(
                        &mut self.world,
                        Command::SetOwner { tile, owner },
                        &mut events,
                    );
                }
            }
        }
    }

    pub(crate) fn finish(self) -> Stage {
        query::stage(&self.world)
    }
}

fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

fn random_improvement<R: Rng>(rng: &mut R) -> Improvement {
    match rng.gen_range(0..10) {
        0 => Improvement::Hole,
        1 => Improvement::Goal,
        2 => Improvement::Spawner(random_direction(rng)),
        _ => Improvement::Arrow(random_direction(rng)),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn author(rows: u32, columns: u32) -> StageAuthor {
        StageAuthor::new(
            WorldConfig::default(),
            rows,
            columns,
            StageInfo::new("Test", "theme_a", "default"),
        )
        .expect("author")
    }

    #[test]
    fn border_walls_close_every_seam() {
        let mut author = author(3, 4);
        author.add_border_walls();
        let stage = author.finish();

        for column in 0..4 {
            let top = stage.grid.tile(TileCoord::new(0, column)).map(Tile::walls);
            let bottom = stage.grid.tile(TileCoord::new(2, column)).map(Tile::walls);
            assert_eq!(top.map(|walls| walls.contains(Direction::North)), Some(true));
            assert_eq!(bottom.map(|walls| walls.contains(Direction::South)), Some(true));
        }
        let interior = stage.grid.tile(TileCoord::new(1, 1)).map(Tile::walls);
        assert_eq!(interior.map(|walls| walls.is_empty()), Some(true));
        assert_eq!(stage.info.name, "Test");
    }

    #[test]
    fn scramble_is_reproducible_per_seed() {
        let build = |seed| {
            let mut author = author(6, 7);
            author.scramble(&mut ChaCha8Rng::seed_from_u64(seed));
            author.finish()
        };
        assert_eq!(build(11), build(11));
        assert_ne!(build(11), build(12));
    }

    #[test]
    fn zero_dimensions_are_refused() {
        let result = StageAuthor::new(WorldConfig::default(), 0, 3, StageInfo::default());
        assert!(result.is_err());
    }
}
