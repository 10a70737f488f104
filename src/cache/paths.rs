// Durable path utilities.
// Locates the data and config directories used across restarts.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const APPLICATION: &str = "todolink";

/// File name of the persisted credential inside the data directory.
pub const CREDENTIAL_FILE: &str = "credential";

/// File name of the optional settings file inside the config directory.
pub const SETTINGS_FILE: &str = "todolink.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// Get the base data directory (~/.local/share/todolink on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the base config directory (~/.config/todolink on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the optional settings file.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Path to the credential file under a data directory.
pub fn credential_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CREDENTIAL_FILE)
}
