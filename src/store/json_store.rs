use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::SignStatsData;

const SIGN_STATS_FILE: &str = "sign_stats.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanadrill")
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files load as the default value.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "could not parse stored data");
                T::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read stored data");
                T::default()
            }
        }
    }

    /// Write to a temp file, sync, then rename over the target.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Stale schema versions load as empty statistics.
    pub fn load_sign_stats(&self) -> SignStatsData {
        let data: SignStatsData = self.load(SIGN_STATS_FILE);
        if data.needs_reset() {
            tracing::warn!(
                found = data.schema_version,
                "statistics schema mismatch, starting from zero"
            );
            return SignStatsData::default();
        }
        data
    }

    pub fn save_sign_stats(&self, data: &SignStatsData) -> Result<()> {
        self.save(SIGN_STATS_FILE, data)
    }
}
