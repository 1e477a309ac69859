//! Resource pack manifest and asset resolution with default-pack fallback.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Asset tables for every known resource pack.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResourcePacks {
    base: PathBuf,
    default_pack: String,
    packs: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    packs: BTreeMap<String, BTreeMap<String, String>>,
}

impl ResourcePacks {
    /// Loads the manifest at `path`; asset paths resolve relative to its directory.
    pub(crate) fn load(path: &Path, default_pack: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read pack manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, base, default_pack)
    }

    fn parse(contents: &str, base: PathBuf, default_pack: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse pack manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported pack manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }
        if !manifest.packs.contains_key(default_pack) {
            bail!("pack manifest has no entry for default pack `{default_pack}`");
        }

        Ok(Self {
            base,
            default_pack: default_pack.to_owned(),
            packs: manifest.packs,
        })
    }

    /// Resolves `key` in `pack`, falling back to the default pack.
    ///
    /// An asset missing from the default pack too is a configuration error.
    pub(crate) fn resolve(&self, pack: &str, key: &str) -> Result<PathBuf> {
        if let Some(relative) = self.packs.get(pack).and_then(|assets| assets.get(key)) {
            return Ok(self.base.join(relative));
        }

        debug!("asset `{key}` not in pack `{pack}`; using `{}`", self.default_pack);
        let Some(relative) = self
            .packs
            .get(&self.default_pack)
            .and_then(|assets| assets.get(key))
        else {
            bail!(
                "asset `{key}` is missing from pack `{pack}` and default pack `{}`",
                self.default_pack
            );
        };
        Ok(self.base.join(relative))
    }
}
