use scurry_core::{
    Command, Direction, Event, Improvement, MoverKind, Occupant, SimulationState, Tile, TileCoord,
};
use scurry_system_builder::{Builder, GameMode, Inventory, PlacementRequest};
use scurry_world::{self as world, query, World};

fn blank_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateGrid {
            rows: 3,
            columns: 3,
        },
        &mut events,
    );
    world
}

fn submit(
    builder: &mut Builder,
    world: &mut World,
    events: &[Event],
    request: PlacementRequest,
) -> Vec<Event> {
    let mut commands = Vec::new();
    builder.handle(
        events,
        Some(request),
        |tile| query::tile(world, tile).map(Tile::improvement),
        &mut commands,
    );

    let mut produced = Vec::new();
    for command in commands {
        world::apply(world, command, &mut produced);
    }
    produced
}

fn arrow(tile: TileCoord, direction: Direction) -> PlacementRequest {
    PlacementRequest::Improvement {
        tile,
        improvement: Improvement::Arrow(direction),
    }
}

fn improvement_at(world: &World, tile: TileCoord) -> Option<Improvement> {
    query::tile(world, tile).map(Tile::improvement)
}

#[test]
fn editor_accepts_any_edit() {
    let mut world = blank_world();
    let mut builder = Builder::new(GameMode::Editor, Inventory::new());
    let tile = TileCoord::new(1, 1);
    assert_eq!(builder.mode(), GameMode::Editor);

    let _ = submit(
        &mut builder,
        &mut world,
        &[],
        PlacementRequest::Improvement {
            tile,
            improvement: Improvement::Goal,
        },
    );
    assert_eq!(improvement_at(&world, tile), Some(Improvement::Goal));

    let events = submit(
        &mut builder,
        &mut world,
        &[],
        PlacementRequest::Wall {
            tile,
            direction: Direction::East,
            present: true,
        },
    );
    assert_eq!(events.len(), 2, "wall change is reported on both sides");

    let _ = submit(
        &mut builder,
        &mut world,
        &[],
        PlacementRequest::Occupant {
            tile: TileCoord::new(0, 0),
            occupant: Some(Occupant::new(MoverKind::Cat, Direction::South)),
        },
    );
    let occupant = query::tile(&world, TileCoord::new(0, 0)).and_then(Tile::occupant);
    assert_eq!(occupant.map(|occupant| occupant.kind), Some(MoverKind::Cat));
}

#[test]
fn editor_silently_rejects_tiles_outside_grid() {
    let mut builder = Builder::new(GameMode::Editor, Inventory::new());
    let world = blank_world();
    let mut commands = Vec::new();
    builder.handle(
        &[],
        Some(PlacementRequest::Clear {
            tile: TileCoord::new(5, 5),
        }),
        |tile| query::tile(&world, tile).map(Tile::improvement),
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn puzzle_spends_and_refunds_arrow_credits() {
    let mut world = blank_world();
    let inventory = Inventory::new().with_arrows(Direction::North, 1);
    let mut builder = Builder::new(GameMode::Puzzle, inventory);
    let tile = TileCoord::new(2, 1);
    assert_eq!(builder.mode(), GameMode::Puzzle);

    let _ = submit(&mut builder, &mut world, &[], arrow(tile, Direction::North));
    assert_eq!(
        improvement_at(&world, tile),
        Some(Improvement::Arrow(Direction::North))
    );
    assert_eq!(builder.inventory().arrows(Direction::North), 0);

    let events = submit(
        &mut builder,
        &mut world,
        &[],
        arrow(TileCoord::new(0, 0), Direction::North),
    );
    assert!(events.is_empty(), "no credit left");

    let _ = submit(
        &mut builder,
        &mut world,
        &[],
        PlacementRequest::Improvement {
            tile,
            improvement: Improvement::None,
        },
    );
    assert_eq!(improvement_at(&world, tile), Some(Improvement::None));
    assert_eq!(builder.inventory().arrows(Direction::North), 1);
}

#[test]
fn puzzle_rejects_non_arrow_requests() {
    let mut world = blank_world();
    let mut builder = Builder::new(
        GameMode::Puzzle,
        Inventory::new().with_arrows(Direction::East, 3),
    );
    let tile = TileCoord::new(1, 1);

    for request in [
        PlacementRequest::Improvement {
            tile,
            improvement: Improvement::Hole,
        },
        PlacementRequest::Wall {
            tile,
            direction: Direction::North,
            present: true,
        },
        PlacementRequest::Occupant {
            tile,
            occupant: Some(Occupant::new(MoverKind::Mouse, Direction::West)),
        },
        PlacementRequest::Clear { tile },
    ] {
        let events = submit(&mut builder, &mut world, &[], request);
        assert!(events.is_empty(), "{request:?} should be rejected");
    }
    assert_eq!(builder.inventory().arrows(Direction::East), 3);
}

#[test]
fn puzzle_keeps_authored_improvements() {
    let mut world = blank_world();
    let tile = TileCoord::new(0, 2);
    let mut setup = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceImprovement {
            tile,
            improvement: Improvement::Arrow(Direction::West),
        },
        &mut setup,
    );
    let mut builder = Builder::new(
        GameMode::Puzzle,
        Inventory::new().with_arrows(Direction::South, 1),
    );

    let events = submit(&mut builder, &mut world, &[], arrow(tile, Direction::South));
    assert!(events.is_empty());
    let events = submit(
        &mut builder,
        &mut world,
        &[],
        PlacementRequest::Improvement {
            tile,
            improvement: Improvement::None,
        },
    );
    assert!(events.is_empty());
    assert_eq!(
        improvement_at(&world, tile),
        Some(Improvement::Arrow(Direction::West))
    );
}

#[test]
fn puzzle_turning_a_placed_arrow_swaps_credits() {
    let mut world = blank_world();
    let inventory = Inventory::new()
        .with_arrows(Direction::North, 1)
        .with_arrows(Direction::West, 1);
    let mut builder = Builder::new(GameMode::Puzzle, inventory);
    let tile = TileCoord::new(1, 0);

    let _ = submit(&mut builder, &mut world, &[], arrow(tile, Direction::North));
    let _ = submit(&mut builder, &mut world, &[], arrow(tile, Direction::West));

    assert_eq!(
        improvement_at(&world, tile),
        Some(Improvement::Arrow(Direction::West))
    );
    assert_eq!(builder.inventory().arrows(Direction::North), 1);
    assert_eq!(builder.inventory().arrows(Direction::West), 0);
}

#[test]
fn puzzle_locks_placement_while_running() {
    let mut world = blank_world();
    let mut builder = Builder::new(
        GameMode::Puzzle,
        Inventory::new().with_arrows(Direction::East, 1),
    );

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetSimulationState {
            state: SimulationState::Running,
        },
        &mut events,
    );

    let produced = submit(
        &mut builder,
        &mut world,
        &events,
        arrow(TileCoord::new(1, 1), Direction::East),
    );
    assert!(produced.is_empty());
    assert_eq!(builder.inventory().arrows(Direction::East), 1);
}

#[test]
fn destroyed_arrow_is_not_refunded() {
    let mut world = blank_world();
    let mut builder = Builder::new(
        GameMode::Puzzle,
        Inventory::new().with_arrows(Direction::East, 1),
    );
    let tile = TileCoord::new(1, 1);
    let _ = submit(&mut builder, &mut world, &[], arrow(tile, Direction::East));

    let broken = [Event::ImprovementChanged {
        tile,
        improvement: Improvement::None,
    }];
    let events = submit(
        &mut builder,
        &mut world,
        &broken,
        PlacementRequest::Improvement {
            tile,
            improvement: Improvement::None,
        },
    );
    assert!(events.is_empty());
    assert_eq!(builder.inventory().arrows(Direction::East), 0);
}
