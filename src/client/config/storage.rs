use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{
    errors::ConfigError,
    paths::{default_storage_dir, is_nonempty},
};

/// Local artifact storage settings.
#[derive(Debug, Clone)]
pub struct StorageSection {
    /// Root under which each app gets its own directory.
    pub base_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            base_dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawStorageSection {
    pub base_dir: Option<PathBuf>,
}

pub fn parse_storage_section(
    raw: Option<RawStorageSection>,
    path: &Path,
) -> Result<StorageSection, ConfigError> {
    let Some(base_dir) = raw.unwrap_or_default().base_dir else {
        return Ok(StorageSection::default());
    };
    if !is_nonempty(&base_dir) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "storage.base_dir",
            message: "Use a non-empty directory path".into(),
        });
    }
    Ok(StorageSection { base_dir })
}
