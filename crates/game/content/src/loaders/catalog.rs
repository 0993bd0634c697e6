//! Host catalog loader.

use std::path::Path;

use anyhow::Context as _;
use game_core::HostCatalog;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loads the host's reserved type names from TOML.
///
/// ```toml
/// objects = ["Rock", "Spear"]
/// creatures = ["Slugcat"]
/// unlocks = ["Slugcat", "Rock", "Spear"]
/// max_types = 4096
/// ```
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<HostCatalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .with_context(|| format!("Failed to load host catalog {}", path.display()))?;

        debug!(
            target: "game_content::loaders",
            path = %path.display(),
            objects = catalog.objects.len(),
            creatures = catalog.creatures.len(),
            unlocks = catalog.unlocks.len(),
            "host catalog loaded"
        );
        Ok(catalog)
    }

    pub fn parse(content: &str) -> LoadResult<HostCatalog> {
        let catalog: HostCatalog = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse host catalog TOML: {}", e))?;

        if let Some(max) = catalog.max_types {
            let largest = catalog
                .objects
                .len()
                .max(catalog.creatures.len())
                .max(catalog.unlocks.len());
            anyhow::ensure!(
                largest <= max as usize,
                "max_types ({max}) is smaller than the built-in range ({largest})"
            );
        }
        Ok(catalog)
    }
}
