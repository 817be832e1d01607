use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the JSON API.
pub const DEFAULT_PORT: u16 = 4820;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Path to the compressed snapshot the store is materialized from.
    pub snapshot: Option<String>,
    /// Path to the materialized local store.
    pub store: Option<String>,
    /// Port for `vitrina serve`.
    pub port: Option<u16>,
}

impl EngineConfig {
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_snapshot_path)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_store_path_in(Path::new(".")))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("vitrina.toml")
}

pub fn default_snapshot_path() -> PathBuf {
    PathBuf::from("balance.db.zst")
}

pub fn default_store_path_in(base: &Path) -> PathBuf {
    base.join(".vitrina").join("runtime.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<EngineConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: EngineConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &EngineConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_store_dir(store_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = store_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_gitignore(project_root: &Path) -> anyhow::Result<()> {
    let gitignore_path = project_root.join(".gitignore");
    let entry = ".vitrina/";

    if gitignore_path.exists() {
        let existing = std::fs::read_to_string(&gitignore_path)?;
        if existing.lines().any(|line| line.trim() == entry) {
            return Ok(());
        }
    }

    let mut content = String::new();
    if gitignore_path.exists() {
        content.push_str(&std::fs::read_to_string(&gitignore_path)?);
        if !content.ends_with('\n') {
            content.push('\n');
        }
    }
    content.push_str(entry);
    content.push('\n');
    std::fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.snapshot_path(), PathBuf::from("balance.db.zst"));
        assert_eq!(config.store_path(), Path::new(".").join(".vitrina").join("runtime.db"));
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitrina.toml");

        let config = EngineConfig {
            snapshot: Some("balance.db.zst".into()),
            store: Some("runtime.db".into()),
            port: Some(9000),
        };
        write_config(&path, &config, false).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.store.as_deref(), Some("runtime.db"));
        assert_eq!(loaded.port(), 9000);

        // Second write without --force is rejected
        assert!(write_config(&path, &config, false).is_err());
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).unwrap().is_none());
    }
}
