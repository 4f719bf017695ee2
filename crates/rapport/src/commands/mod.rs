pub mod chat;
pub mod models;
pub mod report;
pub mod route;
pub mod version;

use rapport_route::{default_catalog, ResourceDescriptor, ResourceRegistry, Settings};
use rapport_telemetry::{atomic_write, Paths};
use std::path::Path;

pub(crate) fn load_settings(paths: &Paths) -> Settings {
    Settings::load(&paths.settings_file())
}

/// Explicit catalog file, else `catalog.json` under the rapport home, else built-in
pub(crate) fn load_catalog(
    explicit: Option<&str>,
    paths: &Paths,
) -> anyhow::Result<Vec<ResourceDescriptor>> {
    let path = match explicit {
        Some(p) => Path::new(p).to_path_buf(),
        None => {
            let default_path = paths.catalog_file();
            if !default_path.exists() {
                return Ok(default_catalog());
            }
            default_path
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("failed to read catalog {}: {}", path.display(), e))?;
    let catalog = ResourceRegistry::parse_catalog(&content)?;
    tracing::info!(path = %path.display(), resources = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Write a catalog as pretty JSON, replacing any previous file in one step
pub(crate) fn save_catalog(catalog: &[ResourceDescriptor], path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(catalog)?;
    atomic_write(path, json.as_bytes())
        .map_err(|e| anyhow::anyhow!("failed to write catalog {}: {}", path.display(), e))?;
    tracing::info!(path = %path.display(), resources = catalog.len(), "saved catalog");
    Ok(())
}
