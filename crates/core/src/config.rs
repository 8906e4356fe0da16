use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

const DB_FILE: &str = "duet.sqlite3";
const DATA_DIR_ENV: &str = "DUET_DATA_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "duet-cli", "duet"));

/// Where duet keeps its state: a single data directory holding the SQLite
/// file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    db_path: PathBuf,
}

impl AppConfig {
    /// Resolve the data directory and make sure it exists.
    ///
    /// Resolution order: explicit override, `DUET_DATA_DIR`, a scratch
    /// directory inside the checkout for debug builds, then the platform
    /// data directory.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        let data_dir = match explicit {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Self::from_data_dir(data_dir)
    }

    /// Root the config at an already-chosen directory.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let db_path = data_dir.join(DB_FILE);
        Ok(Self { data_dir, db_path })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    // Debug builds stay inside the checkout instead of the real data dir.
    if cfg!(debug_assertions) {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        return Ok(manifest.join("..").join("tmp").join("dev-duet"));
    }

    if let Some(dirs) = &*PROJECT_DIRS {
        return Ok(dirs.data_dir().to_path_buf());
    }

    // Platform directories can be unavailable in stripped-down
    // environments; a dot directory still works there.
    let fallback = match BaseDirs::new() {
        Some(base) => base.home_dir().join(".duet"),
        None => env::current_dir()?.join(".duet"),
    };
    Ok(fallback)
}
