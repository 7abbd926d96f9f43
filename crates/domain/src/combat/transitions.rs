//! Legal move sequencing.
//!
//! The legality graph is plain data: each move maps to the moves that may
//! follow it. A battle with no recorded move accepts nothing, and the two
//! terminal moves accept nothing after them.

use crate::entities::Move;
use crate::CharacterId;

/// Successors of every move, keyed by the last recorded move.
const TRANSITIONS: [(Move, &[Move]); 7] = [
    (Move::Initiate, &[Move::Accept, Move::Retreat]),
    (Move::Accept, &[Move::Attack, Move::Surrender]),
    (Move::Attack, &[Move::Attack, Move::Retreat, Move::Surrender]),
    (Move::Pursue, &[Move::Attack, Move::Retreat, Move::Surrender]),
    (Move::Retreat, &[Move::Pursue, Move::Quit]),
    (Move::Surrender, &[]),
    (Move::Quit, &[]),
];

/// Why a submitted move was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("It's not your turn")]
    NotYourTurn,

    #[error("Invalid Move - No Move Specified")]
    NoMoveRecorded,

    #[error("Invalid Move - The battle already ended with {last}")]
    BattleConcluded { last: Move },

    #[error("Invalid Move - You can only {}", or_list(allowed))]
    NotAllowed {
        last: Move,
        attempted: Move,
        allowed: &'static [Move],
    },
}

/// Moves that may legally follow `last_move`.
pub fn legal_successors(last_move: Option<Move>) -> &'static [Move] {
    let Some(last_move) = last_move else {
        return &[];
    };
    TRANSITIONS
        .iter()
        .find(|(from, _)| *from == last_move)
        .map(|(_, next)| *next)
        .unwrap_or(&[])
}

pub fn is_legal(last_move: Option<Move>, next: Move) -> bool {
    legal_successors(last_move).contains(&next)
}

/// Decide whether `submitter_id` may record `submitted` next.
///
/// Turn ownership is checked before legality: whoever recorded the last move
/// cannot move again, whatever the move.
pub fn validate_move(
    last_move: Option<Move>,
    submitted: Move,
    submitter_id: CharacterId,
    last_submitter_id: Option<CharacterId>,
) -> Result<(), MoveRejection> {
    if last_submitter_id == Some(submitter_id) {
        return Err(MoveRejection::NotYourTurn);
    }

    let Some(last) = last_move else {
        return Err(MoveRejection::NoMoveRecorded);
    };

    let allowed = legal_successors(Some(last));
    if allowed.is_empty() {
        return Err(MoveRejection::BattleConcluded { last });
    }
    if !allowed.contains(&submitted) {
        return Err(MoveRejection::NotAllowed {
            last,
            attempted: submitted,
            allowed,
        });
    }
    Ok(())
}

/// "A", "A or B", "A, B or C".
fn or_list(moves: &[Move]) -> String {
    match moves.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => {
            let head: Vec<&str> = rest.iter().map(Move::as_str).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}
