//! Weekly duty rostering.
//!
//! Availability (who may serve in each slot on each day) goes in; a
//! two-pass greedy allocator fills every slot up to its headcount without
//! letting anyone exceed the weekly or daily cap, then tries to seat anybody
//! still short of a shift. Whatever could not be satisfied ends up in the
//! warning log rather than failing the run.
//!
//! The [`talks`] module is a separate helper that pairs recruitment-talk
//! sessions with the assistants on duty in the matching slot.

pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod report;
pub mod schedule;
pub mod talks;
pub mod web;

pub use config::RosterConfig;
pub use error::{RosterError, RosterResult};
pub use report::{build_roster, RosterReport};
