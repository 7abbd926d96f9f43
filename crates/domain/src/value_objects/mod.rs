//! Value objects - validated, immutable building blocks for entities.

mod names;
mod vitals;

pub use names::CharacterName;
pub use vitals::{Health, Level};
