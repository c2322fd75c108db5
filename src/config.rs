use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dict::DictionaryStore;

/// Driver configuration: the dictionaries to load before processing starts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dictionaries: Vec<DictionarySpec>,
}

/// One dictionary file to register in the store.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySpec {
    /// Path to the dictionary file, one phrase per line.
    pub path: PathBuf,
    /// Identifier; a sequential number is assigned when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// Lower-case each phrase while loading.
    #[serde(default)]
    pub lowercase: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load every configured dictionary into `store`; returns the ids in
    /// load order.
    pub fn load_dictionaries(&self, store: &mut DictionaryStore) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(self.dictionaries.len());
        for spec in &self.dictionaries {
            let id = spec.id.as_deref();
            let loaded = if spec.lowercase {
                store.load_path_with(&spec.path, id, |line| line.to_lowercase())
            } else {
                store.load_path(&spec.path, id)
            }
            .with_context(|| format!("Failed to load dictionary: {}", spec.path.display()))?;
            ids.push(loaded);
        }
        Ok(ids)
    }
}
