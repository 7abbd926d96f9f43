//! Arena Engine library.
//!
//! Server-side battle engine: move validation, combat resolution, and the
//! orchestration that persists each move atomically.
//!
//! ## Structure
//!
//! - `use_cases/` - Battle and character operations
//! - `infrastructure/` - Ports and their adapters (SQLite, in-memory, clock)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
