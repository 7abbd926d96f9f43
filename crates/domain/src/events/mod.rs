//! Domain Events
//!
//! Return types from state-changing domain operations, communicating what
//! happened so callers can react appropriately.

pub mod combat_events;

pub use combat_events::*;
