//! JSON file sink: one file per game, named by the record's composite key.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::record::GameRecord;

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write one record, returning the path it landed at.
    pub fn save(&self, record: &GameRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory {}", self.dir.display()))?;

        let path = self.dir.join(format!("{}.json", record.file_stem()));
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;

        Ok(path)
    }

    /// Read one record back from a path produced by `save`.
    pub fn load(&self, path: &Path) -> Result<GameRecord> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}
