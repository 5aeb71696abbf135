//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Database file name under the root folder
pub const DATABASE_FILE: &str = "gyaan.db";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Ensure the root folder exists and return the database path inside it
pub fn prepare_root_folder(root: &PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join(DATABASE_FILE))
}

/// Get configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("gyaan").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/gyaan/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("gyaan"))
        .unwrap_or_else(|| PathBuf::from("./gyaan_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_argument_wins() {
        std::env::set_var("GYAAN_TEST_ROOT", "/tmp/from-env");
        let root = resolve_root_folder(Some("/tmp/from-cli"), "GYAAN_TEST_ROOT").unwrap();
        assert_eq!(root, PathBuf::from("/tmp/from-cli"));
        std::env::remove_var("GYAAN_TEST_ROOT");
    }

    #[test]
    #[serial]
    fn env_var_beats_default() {
        std::env::set_var("GYAAN_TEST_ROOT2", "/tmp/from-env");
        let root = resolve_root_folder(None, "GYAAN_TEST_ROOT2").unwrap();
        assert_eq!(root, PathBuf::from("/tmp/from-env"));
        std::env::remove_var("GYAAN_TEST_ROOT2");
    }
}
