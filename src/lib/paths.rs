//! Path helpers shared by configuration and the agent bridge.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Environment variable name for user home directory.
const HOME_ENV: &str = "HOME";
/// Directory under the home directory holding exported artifacts.
const STORAGE_DIR_NAME: &str = ".fisheye";

/// Returns true if the path has at least one component.
pub fn is_nonempty(path: &Path) -> bool {
    !path.as_os_str().is_empty()
}

/// Resolve the default artifact storage root.
///
/// Resolution order:
/// 1. `$HOME/.fisheye` when `HOME` is set and non-empty.
/// 2. `./.fisheye` otherwise.
pub fn default_storage_dir() -> PathBuf {
    default_storage_dir_from(env::var_os(HOME_ENV))
}

fn default_storage_dir_from(home: Option<OsString>) -> PathBuf {
    match home.filter(|value| !value.is_empty()) {
        Some(home) => PathBuf::from(home).join(STORAGE_DIR_NAME),
        None => PathBuf::from(".").join(STORAGE_DIR_NAME),
    }
}

/// Directory holding artifacts exported for `app`.
pub fn app_storage_dir(base_dir: &Path, app: &str) -> PathBuf {
    base_dir.join(app)
}
