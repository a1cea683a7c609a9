use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of successful searches.
///
/// Example TOML:
/// searches = ["Paris, FR", "London, GB"]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearches {
    #[serde(default)]
    searches: Vec<String>,
}

impl RecentSearches {
    /// Adds `entry` at the front unless it is already listed.
    pub fn record(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() || self.searches.iter().any(|s| s == entry) {
            return;
        }
        self.searches.insert(0, entry.to_string());
        self.searches.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn entries(&self) -> &[String] {
        &self.searches
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::file_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recent searches: {}", path.display()))?;

        let mut loaded: RecentSearches = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse recent searches: {}", path.display()))?;
        loaded.searches.truncate(MAX_RECENT_SEARCHES);

        Ok(loaded)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize recent searches")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write recent searches: {}", path.display()))?;

        Ok(())
    }

    pub fn file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyboard", "skyboard")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("recent.toml"))
    }
}
