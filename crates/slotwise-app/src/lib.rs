// Rust guideline compliant 2026-10-12

//! Shared application services for Slotwise.
//!
//! This crate provides reusable, non-CLI-specific helpers for repository
//! discovery, input parsing, booking list filtering, actor-checked
//! scheduling operations, and standardized response envelopes.

pub mod error;
pub mod list;
pub mod parse;
pub mod repo;
pub mod response;
pub mod scheduler;
pub mod time;

pub use error::{AppError, ErrorCode, Result};
pub use list::{list_bookings, BookingListOptions};
pub use parse::{
    parse_actor, parse_date, parse_datetime, parse_location, parse_status, parse_time,
    parse_weekday, parse_weekdays,
};
pub use repo::RepoContext;
pub use response::{ErrorEnvelope, SuccessEnvelope};
pub use scheduler::{Scheduler, SlotQuery};
pub use time::now;
