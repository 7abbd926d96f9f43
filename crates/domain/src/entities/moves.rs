//! The closed set of battle moves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single action a combatant can record in a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Initiate,
    Accept,
    Attack,
    Pursue,
    Retreat,
    Surrender,
    Quit,
}

impl Move {
    /// Every move, in declaration order.
    pub const ALL: [Move; 7] = [
        Move::Initiate,
        Move::Accept,
        Move::Attack,
        Move::Pursue,
        Move::Retreat,
        Move::Surrender,
        Move::Quit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiate => "Initiate",
            Self::Accept => "Accept",
            Self::Attack => "Attack",
            Self::Pursue => "Pursue",
            Self::Retreat => "Retreat",
            Self::Surrender => "Surrender",
            Self::Quit => "Quit",
        }
    }

    /// Names of all moves, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Move::as_str).collect()
    }

    /// Whether recording this move ends the battle on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Surrender | Self::Quit)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move name that matches none of the seven moves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Move - {name} Valid Moves: {}", Move::names().join(","))]
pub struct UnknownMove {
    pub name: String,
}

impl FromStr for Move {
    type Err = UnknownMove;

    /// Parses a move name, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|mv| mv.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMove {
                name: s.to_string(),
            })
    }
}
