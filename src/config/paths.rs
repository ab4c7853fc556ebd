use std::fs;
use std::path::PathBuf;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::Result;

/// Manages paths for amoshelf configuration and data
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root configuration directory (~/.amoshelf)
    pub root: PathBuf,
    /// Configuration file path (~/.amoshelf/config.toml)
    pub config_file: PathBuf,
    /// Collection cache directory (~/.amoshelf/cache)
    pub cache_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance using the user's home directory
    ///
    /// `AMOSHELF_HOME` replaces `~/.amoshelf` when set.
    pub fn new() -> Result<Self> {
        let root = match std::env::var_os("AMOSHELF_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(std::env::var("HOME")?).join(".amoshelf"),
        };
        Ok(Self::with_root(root))
    }

    /// Lay out paths under an explicit root directory
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.toml"),
            cache_dir: root.join("cache"),
            root,
        }
    }

    /// Ensure the configuration directories exist with proper permissions
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(&self.cache_dir)?;

        // Set restrictive permissions on directories (700 = owner only)
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.root, perms)?;
        }

        Ok(())
    }

    /// Check if the config file exists
    pub fn config_exists(&self) -> bool {
        self.config_file.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_root_layout() {
        let paths = Paths::with_root(PathBuf::from("/tmp/shelf"));
        assert_eq!(paths.config_file, PathBuf::from("/tmp/shelf/config.toml"));
        assert_eq!(paths.cache_dir, PathBuf::from("/tmp/shelf/cache"));
    }

    #[test]
    fn test_ensure_dirs_creates_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("root"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.is_dir());
        assert!(paths.cache_dir.is_dir());
        assert!(!paths.config_exists());
    }
}
