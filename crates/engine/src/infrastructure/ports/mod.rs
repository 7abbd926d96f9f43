//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (SQLite or in-memory)
//! - Observer notifications (WebSocket fan-out)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{BattleRepo, BattleUnitOfWork, CharacterRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::NotificationPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockBattleRepo, MockBattleUnitOfWork, MockCharacterRepo};

#[cfg(test)]
pub use external::MockNotificationPort;

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{NotificationError, RepoError};
