#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that releases movers from spawner tiles.

use std::time::Duration;

use scurry_core::{Command, Direction, Event, MoverKind, TileCoord};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const CAT_RATIO_SCALE: u64 = 1_000;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    cat_ratio: u16,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    ///
    /// `cat_ratio` is the chance, in per mille, that a spawned mover is a cat.
    /// Values above 1000 behave like 1000.
    #[must_use]
    pub const fn new(spawn_interval: Duration, cat_ratio: u16, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            cat_ratio,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands while time runs.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    cat_ratio: u64,
    accumulator: Duration,
    rng_state: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            cat_ratio: u64::from(config.cat_ratio).min(CAT_RATIO_SCALE),
            accumulator: Duration::ZERO,
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and the spawner list to emit spawn commands.
    ///
    /// Every spawner releases one mover per elapsed interval, facing the
    /// spawner's direction. Loading a stage discards partially elapsed time.
    pub fn handle(
        &mut self,
        events: &[Event],
        spawners: &[(TileCoord, Direction)],
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::StageLoaded { .. } => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                _ => {}
            }
        }

        if self.spawn_interval.is_zero() || spawners.is_empty() || accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let waves = self.resolve_spawn_waves();

        for _ in 0..waves {
            for &(tile, facing) in spawners {
                let kind = self.next_kind();
                out.push(Command::SpawnMover { tile, kind, facing });
            }
        }
    }

    fn resolve_spawn_waves(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut waves = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            waves += 1;
        }
        waves
    }

    fn next_kind(&mut self) -> MoverKind {
        let roll = (self.advance_rng() >> 33) % CAT_RATIO_SCALE;
        if roll < self.cat_ratio {
            MoverKind::Cat
        } else {
            MoverKind::Mouse
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
