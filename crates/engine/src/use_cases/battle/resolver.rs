//! Combat resolver: the dice-rolling wrapper around move resolution.

use std::sync::Arc;

use arena_domain::combat::{resolve_move, MoveResolution, DIE_SIDES};
use arena_domain::{CombatSnapshot, Move};

use crate::infrastructure::ports::RandomPort;

/// Computes what a validated move does, drawing one die per side of an attack.
pub struct CombatResolver {
    random: Arc<dyn RandomPort>,
}

impl CombatResolver {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    pub fn resolve(
        &self,
        mv: Move,
        submitter: &CombatSnapshot,
        other: &CombatSnapshot,
    ) -> MoveResolution {
        let mut roll_die = || self.random.gen_range(1, DIE_SIDES);
        let resolution = resolve_move(mv, submitter, other, &mut roll_die);

        if let Some(attack) = &resolution.attack {
            tracing::debug!(
                attacker_id = %submitter.id,
                defender_id = %other.id,
                offense_base = attack.offense.base,
                offense_roll = attack.offense.roll,
                defense_base = attack.defense.base,
                defense_roll = attack.defense.roll,
                damage = resolution.damage,
                "Resolved attack"
            );
        }
        resolution
    }
}
