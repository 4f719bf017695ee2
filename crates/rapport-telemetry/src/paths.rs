//! Path resolution for settings, catalog and usage log files

use std::path::{Path, PathBuf};

/// Environment variable that relocates the data directory
pub const HOME_ENV: &str = "RAPPORT_HOME";

/// Resolves standard paths under the rapport data directory
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// `$RAPPORT_HOME` if set, otherwise `~/.rapport`
    pub fn new() -> std::io::Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(root)));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        Ok(Self::at(home.join(".rapport")))
    }

    pub fn at(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Settings file (scoring weights, cache limits)
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("rapport.json")
    }

    /// Resource catalog override
    pub fn catalog_file(&self) -> PathBuf {
        self.root.join("catalog.json")
    }

    pub fn telemetry_dir(&self) -> PathBuf {
        self.root.join("telemetry")
    }

    /// Append-only routing decision log
    pub fn usage_log(&self) -> PathBuf {
        self.telemetry_dir().join("usage.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_at_root() {
        let paths = Paths::at("/tmp/rapport-test");
        assert_eq!(paths.settings_file(), PathBuf::from("/tmp/rapport-test/rapport.json"));
        assert_eq!(paths.catalog_file(), PathBuf::from("/tmp/rapport-test/catalog.json"));
        assert!(paths.usage_log().ends_with("telemetry/usage.jsonl"));
    }

    #[test]
    fn test_paths_new_resolves_somewhere() {
        let paths = Paths::new().unwrap();
        assert!(paths.usage_log().starts_with(&paths.root));
    }
}
