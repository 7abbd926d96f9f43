//! Arena Shared - wire types for the battle engine's HTTP and WebSocket surfaces
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - only serde, serde_json, uuid and chrono
//! 2. **No business logic** - pure data types and serialization
//! 3. **No domain IDs** - raw `uuid::Uuid` in DTOs
//! 4. **camelCase JSON** - field names match what existing clients read

pub mod battle;
pub mod character;
pub mod messages;

pub use battle::{BattleData, BattleMoveData, BattleMoveResultData, StartBattleQuery, SubmitMoveQuery};
pub use character::{CharacterData, ItemData, SaveCharacterRequest};
pub use messages::ServerMessage;
