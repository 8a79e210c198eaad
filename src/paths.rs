//! Config file location
//!
//! Resolution order: an explicit `--config` path, then `dxsex.yaml` in the
//! working directory, then `config.yaml` under the user config directory
//! (`~/.config/dxsex` on Linux). With none present, built-in defaults apply.

use std::path::{Path, PathBuf};

/// File name looked up in the working directory
const LOCAL_CONFIG: &str = "dxsex.yaml";
/// Directory name under the platform config dir
const APP_DIR: &str = "dxsex";

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; must exist
    Explicit(PathBuf),
    /// Found in the working directory or the user config directory
    Discovered(PathBuf),
    /// No file, built-in defaults
    Defaults,
}

impl ConfigSource {
    /// Resolve against the real working and user config directories
    pub fn detect(explicit: Option<&Path>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let user_dir = dirs::config_dir().map(|dir| dir.join(APP_DIR));
        Self::resolve(explicit, &cwd, user_dir.as_deref())
    }

    pub fn resolve(explicit: Option<&Path>, cwd: &Path, user_dir: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }

        let local = cwd.join(LOCAL_CONFIG);
        if local.is_file() {
            return ConfigSource::Discovered(local);
        }

        if let Some(dir) = user_dir {
            let user = dir.join("config.yaml");
            if user.is_file() {
                return ConfigSource::Discovered(user);
            }
        }

        ConfigSource::Defaults
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins_even_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("nope.yaml");
        std::fs::write(dir.path().join(LOCAL_CONFIG), "").unwrap();

        let source = ConfigSource::resolve(Some(explicit.as_path()), dir.path(), None);
        assert_eq!(source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn test_working_dir_before_user_dir() {
        let cwd = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        std::fs::write(cwd.path().join(LOCAL_CONFIG), "").unwrap();
        std::fs::write(user.path().join("config.yaml"), "").unwrap();

        let source = ConfigSource::resolve(None, cwd.path(), Some(user.path()));
        assert_eq!(source.path(), Some(cwd.path().join(LOCAL_CONFIG).as_path()));
    }

    #[test]
    fn test_user_dir_fallback() {
        let cwd = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        std::fs::write(user.path().join("config.yaml"), "").unwrap();

        let source = ConfigSource::resolve(None, cwd.path(), Some(user.path()));
        assert_eq!(source, ConfigSource::Discovered(user.path().join("config.yaml")));
    }

    #[test]
    fn test_nothing_found() {
        let cwd = tempfile::tempdir().unwrap();
        assert_eq!(ConfigSource::resolve(None, cwd.path(), None), ConfigSource::Defaults);
        assert_eq!(ConfigSource::Defaults.path(), None);
    }
}
