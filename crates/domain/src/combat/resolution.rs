//! Move resolution arithmetic.
//!
//! Resolution is pure: it reads the two combat snapshots, draws dice from the
//! supplied roller, and returns the effects the caller must persist. The
//! roller must yield values in `1..=DIE_SIDES`.

use crate::entities::{CombatSnapshot, ItemCategory, Move};
use crate::value_objects::Health;
use crate::CharacterId;

/// Faces on the combat die.
pub const DIE_SIDES: i32 = 6;

/// A state change produced by resolving a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEffect {
    /// Persist a new health value for a character
    SetHealth {
        character_id: CharacterId,
        health: Health,
    },
    /// Strip a character's inventory; the removed item ids are the plunder
    ClearInventory { character_id: CharacterId },
    /// Conclude the battle and release both participants
    EndBattle,
}

/// One side of an attack exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollBreakdown {
    /// Skill plus equipped item value
    pub base: i32,
    pub roll: i32,
}

impl RollBreakdown {
    pub fn total(&self) -> i32 {
        self.base.saturating_mul(self.roll)
    }
}

/// The dice behind an attack, kept for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub offense: RollBreakdown,
    pub defense: RollBreakdown,
}

/// Everything a move changes, before any of it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveResolution {
    /// Offense minus defense for an attack, zero otherwise. May be negative.
    pub damage: i32,
    pub effects: Vec<CombatEffect>,
    pub battle_over: bool,
    pub attack: Option<AttackRoll>,
}

impl MoveResolution {
    /// A move that only advances the log.
    pub fn no_op() -> Self {
        Self::default()
    }

    fn concluded(damage: i32, mut effects: Vec<CombatEffect>) -> Self {
        effects.push(CombatEffect::EndBattle);
        Self {
            damage,
            effects,
            battle_over: true,
            attack: None,
        }
    }
}

/// Roll for one side: `(skill + items) * d6`.
pub fn roll_move_value(
    character: &CombatSnapshot,
    category: ItemCategory,
    roll_die: &mut impl FnMut() -> i32,
) -> RollBreakdown {
    RollBreakdown {
        base: character.base_value(category),
        roll: roll_die(),
    }
}

/// Resolve `mv` submitted by `submitter` against `other`.
///
/// Call only after the move passed validation.
pub fn resolve_move(
    mv: Move,
    submitter: &CombatSnapshot,
    other: &CombatSnapshot,
    roll_die: &mut impl FnMut() -> i32,
) -> MoveResolution {
    match mv {
        Move::Attack => resolve_attack(submitter, other, roll_die),
        Move::Surrender => resolve_surrender(other),
        Move::Quit => MoveResolution::concluded(0, Vec::new()),
        Move::Initiate | Move::Accept | Move::Pursue | Move::Retreat => MoveResolution::no_op(),
    }
}

fn resolve_attack(
    attacker: &CombatSnapshot,
    defender: &CombatSnapshot,
    roll_die: &mut impl FnMut() -> i32,
) -> MoveResolution {
    let offense = roll_move_value(attacker, ItemCategory::Offense, roll_die);
    let defense = roll_move_value(defender, ItemCategory::Defense, roll_die);
    let damage = offense.total().saturating_sub(defense.total());
    let attack = Some(AttackRoll { offense, defense });

    let outcome = defender.health.take_damage(damage);
    let mut resolution = if outcome.is_defeat() {
        MoveResolution::concluded(
            damage,
            vec![
                CombatEffect::SetHealth {
                    character_id: defender.id,
                    health: Health::DEFEATED,
                },
                CombatEffect::ClearInventory {
                    character_id: defender.id,
                },
            ],
        )
    } else if damage > 0 {
        MoveResolution {
            damage,
            effects: vec![CombatEffect::SetHealth {
                character_id: defender.id,
                health: outcome.remaining(defender.health),
            }],
            battle_over: false,
            attack: None,
        }
    } else {
        MoveResolution {
            damage,
            ..MoveResolution::no_op()
        }
    };
    resolution.attack = attack;
    resolution
}

/// The yielding side is the participant who did *not* submit the move.
fn resolve_surrender(other: &CombatSnapshot) -> MoveResolution {
    MoveResolution::concluded(
        0,
        vec![
            CombatEffect::SetHealth {
                character_id: other.id,
                health: other.health.yielded(),
            },
            CombatEffect::ClearInventory {
                character_id: other.id,
            },
        ],
    )
}
