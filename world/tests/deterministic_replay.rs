use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use scurry_core::{
    Command, DestroyCause, Direction, Event, Improvement, MoverKind, Occupant, SimulationState,
    TileCoord,
};
use scurry_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first
        .events
        .iter()
        .any(|record| record.contains("ReachedGoal")));
}

#[test]
fn replay_destroys_movers_and_counts_ticks() {
    let outcome = replay(scripted_commands());
    let destroyed: Vec<&str> = outcome
        .events
        .iter()
        .filter(|record| record.starts_with("MoverDestroyed"))
        .map(String::as_str)
        .collect();
    assert_eq!(destroyed.len(), 2);
    assert_eq!(outcome.tick_index, 40);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(record));
    }

    let movers = query::mover_view(&world)
        .iter()
        .map(|mover| format!("{mover:?}"))
        .collect();

    ReplayOutcome {
        movers,
        events: log,
        tick_index: query::tick_index(&world),
    }
}

fn record(event: &Event) -> String {
    format!("{event:?}")
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::GenerateGrid {
            rows: 5,
            columns: 6,
        },
        Command::ConfigureMovers {
            mouse_speed: 4.0,
            cat_speed: 2.0,
        },
        Command::PlaceImprovement {
            tile: TileCoord::new(2, 4),
            improvement: Improvement::Arrow(Direction::South),
        },
        Command::PlaceImprovement {
            tile: TileCoord::new(4, 4),
            improvement: Improvement::Goal,
        },
        Command::PlaceImprovement {
            tile: TileCoord::new(0, 1),
            improvement: Improvement::Hole,
        },
        Command::SetWall {
            tile: TileCoord::new(1, 0),
            direction: Direction::East,
            present: true,
        },
        Command::PlaceOccupant {
            tile: TileCoord::new(2, 0),
            occupant: Some(Occupant::new(MoverKind::Mouse, Direction::East)),
        },
        Command::PlaceOccupant {
            tile: TileCoord::new(1, 1),
            occupant: Some(Occupant::new(MoverKind::Mouse, Direction::North)),
        },
        Command::PlaceOccupant {
            tile: TileCoord::new(3, 5),
            occupant: Some(Occupant::new(MoverKind::Cat, Direction::West)),
        },
        Command::ReleaseOccupants,
        Command::SetSimulationState {
            state: SimulationState::Running,
        },
    ];

    for _ in 0..40 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(50),
        });
    }

    commands
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    movers: Vec<String>,
    events: Vec<String>,
    tick_index: u64,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.movers.hash(&mut hasher);
        self.events.hash(&mut hasher);
        self.tick_index.hash(&mut hasher);
        hasher.finish()
    }
}

#[test]
fn hole_swallows_northbound_mouse() {
    let outcome = replay(scripted_commands());
    let expected = format!("{:?}", DestroyCause::FellInHole);
    assert!(outcome
        .events
        .iter()
        .any(|record| record.contains(&expected)));
}
