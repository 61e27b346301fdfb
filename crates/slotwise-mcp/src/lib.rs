// Rust guideline compliant 2026-10-12

//! Model Context Protocol server for Slotwise.
//!
//! Exposes slot management, availability search and the booking lifecycle
//! as MCP tools over stdio.

pub mod server;
pub mod types;

pub use server::{run, McpOptions, McpServerError, SlotwiseMcp};
