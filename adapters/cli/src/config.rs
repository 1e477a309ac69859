//! Runtime configuration read from `scurry.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use log::info;
use scurry_system_spawning::Config as SpawningConfig;
use scurry_world::WorldConfig;
use serde::Deserialize;

/// Location probed when no configuration path is given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "scurry.toml";

/// Fully resolved CLI configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Simulation clock and mover speeds.
    pub(crate) simulation: SimulationSection,
    /// Spawner cadence and kind selection.
    pub(crate) spawning: SpawningSection,
    /// Resource pack lookup.
    pub(crate) resources: ResourcesSection,
}

/// `[simulation]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationSection {
    pub(crate) tile_size: f32,
    pub(crate) tick_rate_hz: u32,
    pub(crate) mouse_speed: f32,
    pub(crate) cat_speed: f32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            tick_rate_hz: 60,
            mouse_speed: 4.0,
            cat_speed: 2.8,
        }
    }
}

/// `[spawning]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningSection {
    pub(crate) interval_ms: u64,
    /// Per mille chance that a spawned mover is a cat.
    pub(crate) cat_ratio: u16,
    pub(crate) seed: u64,
}

impl Default for SpawningSection {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            cat_ratio: 0,
            seed: 0x5eed,
        }
    }
}

/// `[resources]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ResourcesSection {
    pub(crate) default_pack: String,
    pub(crate) manifest: PathBuf,
}

impl Default for ResourcesSection {
    fn default() -> Self {
        Self {
            default_pack: "default".to_owned(),
            manifest: PathBuf::from("packs.toml"),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_PATH`] when
    /// it exists. An explicitly named file must exist.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !path.exists() {
            info!("no {} found; using built-in defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let simulation = &self.simulation;
        if !(simulation.tile_size > 0.0) {
            bail!("simulation.tile_size must be positive");
        }
        if simulation.tick_rate_hz == 0 {
            bail!("simulation.tick_rate_hz must be at least 1");
        }
        if !(simulation.mouse_speed >= 0.0 && simulation.cat_speed >= 0.0) {
            bail!("mover speeds must not be negative");
        }
        if self.spawning.cat_ratio > 1_000 {
            bail!("spawning.cat_ratio is per mille and must not exceed 1000");
        }
        Ok(())
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig::new(
            self.simulation.tile_size,
            self.simulation.mouse_speed,
            self.simulation.cat_speed,
        )
    }

    pub(crate) fn spawning_config(&self) -> SpawningConfig {
        SpawningConfig::new(
            Duration::from_millis(self.spawning.interval_ms),
            self.spawning.cat_ratio,
            self.spawning.seed,
        )
    }

    /// Length of one fixed simulation step.
    pub(crate) fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.simulation.tick_rate_hz
    }
}
