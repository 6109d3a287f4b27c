use anyhow::{Context, Result};
use dtoshape_core::TypeCatalog;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use super::CONFIG_FILE;

/// Load descriptor fixtures from a file, or from every `.json`/`.toml` file
/// under a directory (sorted by path so the catalog order is stable).
/// A `dtoshape.toml` inside the directory is configuration and is skipped.
pub fn load_catalog(path: &Path) -> Result<TypeCatalog> {
    if !path.exists() {
        anyhow::bail!("Descriptor path not found: {}", path.display());
    }

    if path.is_file() {
        let catalog = TypeCatalog::from_file(path)
            .with_context(|| format!("Failed to load descriptors from {}", path.display()))?;
        debug!(file = ?path, types = catalog.len(), "Loaded descriptor fixture");
        return Ok(catalog);
    }

    let mut catalog = TypeCatalog::new();
    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() != CONFIG_FILE)
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "json" || ext == "toml")
                .unwrap_or(false)
        })
    {
        let part = TypeCatalog::from_file(entry.path())
            .with_context(|| format!("Failed to load descriptors from {}", entry.path().display()))?;
        debug!(file = ?entry.path(), types = part.len(), "Loaded descriptor fixture");
        catalog.extend(part);
    }

    if catalog.is_empty() {
        anyhow::bail!("No type descriptors found under {}", path.display());
    }
    Ok(catalog)
}
