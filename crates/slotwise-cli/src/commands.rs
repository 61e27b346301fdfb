// Rust guideline compliant 2026-10-12

//! Command implementations for the Slotwise CLI.
//!
//! Every command returns its rendered output instead of printing it, so the
//! binary decides where it goes and tests can inspect it.

pub mod booking;
pub mod distance;
pub mod init;
pub mod provider;
pub mod search;
pub mod service;
pub mod slot;

use crate::output::OutputFormatter;
use slotwise_app::{AppError, RepoContext, Result, Scheduler};
use slotwise_core::{Actor, FileRepository};
use std::path::PathBuf;

/// Shared inputs of every command: where the repository is, who is acting
/// and how results are rendered.
pub struct CommandContext<'a> {
    /// Repository root; the current directory when unset.
    pub repo_root: Option<PathBuf>,
    /// Acting identity from `--as`.
    pub actor: Option<Actor>,
    /// Output formatter.
    pub formatter: &'a dyn OutputFormatter,
}

impl<'a> CommandContext<'a> {
    /// Opens the repository and returns a scheduler over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is not initialized or its
    /// configuration is invalid.
    pub fn scheduler(&self) -> Result<Scheduler<FileRepository>> {
        RepoContext::discover(self.repo_root.as_deref())?.open_scheduler()
    }

    /// Returns the acting identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `--as` was not given.
    pub fn actor(&self) -> Result<&Actor> {
        self.actor.as_ref().ok_or_else(|| {
            AppError::InvalidInput(
                "This command needs an acting identity: pass --as customer:<id> or --as provider:<id>"
                    .to_string(),
            )
        })
    }
}
