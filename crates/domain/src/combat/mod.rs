//! Battle rules: which move may follow which, and what a move does.

mod resolution;
mod transitions;

pub use resolution::{
    resolve_move, roll_move_value, AttackRoll, CombatEffect, MoveResolution, RollBreakdown,
    DIE_SIDES,
};
pub use transitions::{is_legal, legal_successors, validate_move, MoveRejection};
