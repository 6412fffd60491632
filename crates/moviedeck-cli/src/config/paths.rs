//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config directory name under the user config root.
const APP_DIR: &str = "moviedeck";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// - `dir` given: `{dir}/config.toml`.
/// - `XDG_CONFIG_HOME` set: `$XDG_CONFIG_HOME/moviedeck/config.toml`.
/// - Otherwise: `~/.config/moviedeck/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

/// Path resolution without environment access.
fn config_path_from(dir: Option<&Path>, xdg: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(x) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(x.join(APP_DIR).join(CONFIG_FILE));
    }
    let Some(h) = home else {
        bail!("neither XDG_CONFIG_HOME nor HOME environment variable is set");
    };
    Ok(h.join(".config").join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/myproject/config.toml"));
    }

    #[test]
    fn test_dir_wins_over_env() {
        // Arrange & Act
        let path = config_path_from(
            Some(Path::new("/srv/moviedeck")),
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/moviedeck/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path =
            config_path_from(None, Some(Path::new("/xdg")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/moviedeck/config.toml"));
    }

    #[test]
    fn test_empty_xdg_falls_back_to_home() {
        // Arrange & Act
        let path = config_path_from(None, Some(Path::new("")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/moviedeck/config.toml"));
    }

    #[test]
    fn test_no_home_is_error() {
        // Arrange & Act
        let result = config_path_from(None, None, None);

        // Assert
        assert!(result.unwrap_err().to_string().contains("HOME"));
    }
}
