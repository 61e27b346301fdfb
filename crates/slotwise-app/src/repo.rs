// Rust guideline compliant 2026-10-12

//! Repository discovery and path management utilities.

use crate::error::{AppError, Result};
use crate::scheduler::Scheduler;
use slotwise_core::{Config, FileRepository};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the data directory inside a Slotwise workspace.
pub const DATA_DIR: &str = ".slotwise";

/// Repository path metadata for a Slotwise workspace.
#[derive(Debug, Clone)]
pub struct RepoContext {
    root: PathBuf,
    slotwise_dir: PathBuf,
    config_path: PathBuf,
}

impl RepoContext {
    fn at(root: PathBuf) -> Self {
        let slotwise_dir = root.join(DATA_DIR);
        Self {
            config_path: slotwise_dir.join("config.toml"),
            slotwise_dir,
            root,
        }
    }

    /// Discovers a Slotwise repository starting from an optional root.
    ///
    /// # Arguments
    ///
    /// * `repo_root` - Optional repository root to pin discovery
    ///
    /// # Returns
    ///
    /// A `RepoContext` with resolved paths for the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository root cannot be resolved
    /// - The `.slotwise` directory is missing
    pub fn discover(repo_root: Option<&Path>) -> Result<Self> {
        let root = match repo_root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let context = Self::at(root);
        if !context.slotwise_dir.is_dir() {
            return Err(AppError::RepoNotInitialized {
                path: context.slotwise_dir,
            });
        }
        Ok(context)
    }

    /// Initializes a repository under `root`.
    ///
    /// Creates the `.slotwise` directory layout and writes a default
    /// configuration unless one already exists. Running it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if directories or the config file cannot be written.
    pub fn init(root: &Path) -> Result<Self> {
        let context = Self::at(root.to_path_buf());
        fs::create_dir_all(&context.slotwise_dir)?;
        if !context.config_path.exists() {
            Config::default().save(&context.slotwise_dir)?;
        }
        FileRepository::open(context.slotwise_dir.clone())?;
        tracing::info!(path = %context.slotwise_dir.display(), "repository initialized");
        Ok(context)
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns the `.slotwise` directory path.
    #[must_use]
    pub fn slotwise_dir(&self) -> &Path {
        self.slotwise_dir.as_path()
    }

    /// Returns the config TOML path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        self.config_path.as_path()
    }

    /// Opens the file-backed repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directories cannot be created.
    pub fn open_repository(&self) -> Result<FileRepository> {
        Ok(FileRepository::open(self.slotwise_dir.clone())?)
    }

    /// Loads repository configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.slotwise_dir())?)
    }

    /// Opens a scheduler over the file-backed repository with the loaded
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or configuration cannot be opened.
    pub fn open_scheduler(&self) -> Result<Scheduler<FileRepository>> {
        Ok(Scheduler::new(self.open_repository()?, self.load_config()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_requires_init() {
        let temp = TempDir::new().unwrap();
        let err = RepoContext::discover(Some(temp.path())).unwrap_err();
        assert!(matches!(err, AppError::RepoNotInitialized { .. }));
        assert!(err.to_string().contains("swt init"));
    }

    #[test]
    fn test_init_then_discover() {
        let temp = TempDir::new().unwrap();
        let created = RepoContext::init(temp.path()).unwrap();
        assert!(created.config_path().exists());
        assert!(created.slotwise_dir().join("locks").is_dir());

        let found = RepoContext::discover(Some(temp.path())).unwrap();
        assert_eq!(found.slotwise_dir(), created.slotwise_dir());
        assert_eq!(found.load_config().unwrap(), Config::default());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let temp = TempDir::new().unwrap();
        let context = RepoContext::init(temp.path()).unwrap();
        let config = Config {
            default_search_limit: 5,
            ..Config::default()
        };
        config.save(context.slotwise_dir()).unwrap();

        RepoContext::init(temp.path()).unwrap();
        assert_eq!(context.load_config().unwrap().default_search_limit, 5);
    }
}
