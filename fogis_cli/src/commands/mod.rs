//! CLI subcommand implementations.

pub mod event_types;
pub mod match_details;
pub mod matches;
pub mod session;
