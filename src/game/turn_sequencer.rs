//! Night turn order.
//!
//! Cupid only acts on the first night. Every later night runs guard, seer, werewolf, witch.

use crate::game::error::GameError;
use crate::game::types::NightTurn;

const FIRST_NIGHT: [NightTurn; 5] = [
    NightTurn::Cupid,
    NightTurn::Guard,
    NightTurn::Seer,
    NightTurn::Werewolf,
    NightTurn::Witch,
];

const LATER_NIGHTS: [NightTurn; 4] = [
    NightTurn::Guard,
    NightTurn::Seer,
    NightTurn::Werewolf,
    NightTurn::Witch,
];

/// The ordered acting roles for the night of `day`.
pub fn night_order(day: u32) -> &'static [NightTurn] {
    if day <= 1 { &FIRST_NIGHT } else { &LATER_NIGHTS }
}

/// Next turn after `current`, or `None` once the last role has acted (night is over).
pub fn advance(current: Option<NightTurn>, day: u32) -> Result<Option<NightTurn>, GameError> {
    let order = night_order(day);
    let Some(current) = current else {
        return Ok(order.first().copied());
    };
    let index = order
        .iter()
        .position(|turn| *turn == current)
        .ok_or(GameError::InvalidTurn { turn: current, day })?;
    Ok(order.get(index + 1).copied())
}
