//! Fixed-step headless driver composing the world and its systems.

use std::time::Duration;

use log::{debug, info};
use scurry_core::{Command, DestroyCause, Event, Improvement, SimulationState, Stage};
use scurry_system_spawning::Spawning;
use scurry_world::{self as world, query, World};

use crate::config::Config;

/// Tallies of mover outcomes observed while driving a stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) spawned: u32,
    pub(crate) reached_goal: u32,
    pub(crate) fell_in_hole: u32,
    pub(crate) caught: u32,
    pub(crate) arrows_broken: u32,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::MoverCreated { .. } => self.spawned += 1,
            Event::MoverDestroyed { cause, .. } => match cause {
                DestroyCause::ReachedGoal => self.reached_goal += 1,
                DestroyCause::FellInHole => self.fell_in_hole += 1,
                DestroyCause::Caught => self.caught += 1,
                DestroyCause::GridReset => {}
            },
            Event::TimeAdvanced { .. } => self.ticks += 1,
            _ => {}
        }
    }
}

/// Owns a world and drives it in fixed steps.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    tick: Duration,
    pending: Duration,
    summary: Summary,
}

impl Simulation {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            world: World::with_config(config.world_config()),
            spawning: Spawning::new(config.spawning_config()),
            tick: config.tick(),
            pending: Duration::ZERO,
            summary: Summary::default(),
        }
    }

    /// Installs `stage`, releases its starting movers and starts the clock.
    pub(crate) fn start(&mut self, stage: Stage) {
        let _ = self.dispatch(Command::LoadStage {
            stage: Box::new(stage),
        });
        let _ = self.dispatch(Command::ReleaseOccupants);
        let _ = self.dispatch(Command::SetSimulationState {
            state: SimulationState::Running,
        });
    }

    /// Feeds wall-clock time into the fixed-step accumulator and returns the
    /// number of steps taken.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending = self.pending.saturating_add(elapsed);
        let mut steps = 0;
        while self.pending >= self.tick && !self.tick.is_zero() {
            self.pending -= self.tick;
            self.step();
            steps += 1;
        }
        steps
    }

    fn step(&mut self) {
        let events = self.dispatch(Command::Tick { dt: self.tick });
        // Only cat strikes clear improvements during a tick.
        self.summary.arrows_broken += events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::ImprovementChanged {
                        improvement: Improvement::None,
                        ..
                    }
                )
            })
            .count() as u32;

        let mut commands = Vec::new();
        let spawners = query::spawners(&self.world);
        self.spawning.handle(&events, &spawners, &mut commands);
        for command in commands {
            let _ = self.dispatch(command);
        }
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            self.summary.record(event);
            if let Event::StageLoaded { info, rows, columns } = event {
                info!("running '{}' on a {rows}x{columns} grid", info.name);
            }
        }
        debug!("applied command producing {} events", events.len());
        events
    }

    pub(crate) fn summary(&self) -> Summary {
        self.summary
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }
}
