// Rust guideline compliant 2026-10-12

//! Implementation of the `swt init` command.
//!
//! Creates the `.slotwise` directory with its data folders and a default
//! `config.toml`.

use crate::CommandContext;
use slotwise_app::{RepoContext, Result};

/// Initializes a Slotwise repository in the repository root.
///
/// Existing data and configuration are left untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The current directory cannot be resolved
/// - The `.slotwise` directory or its config file cannot be written
pub fn execute(ctx: &CommandContext<'_>) -> Result<String> {
    let root = match &ctx.repo_root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let repo = RepoContext::init(&root)?;
    Ok(ctx.formatter.format_message(&format!(
        "Slotwise repository initialized at {}",
        repo.slotwise_dir().display()
    )))
}
