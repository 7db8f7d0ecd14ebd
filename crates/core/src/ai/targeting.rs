//! Threat scoring and target selection.
//! Threat is proximity only; ties go to the earlier roster entry.

use crate::character::{Character, Roster};
use crate::pathfinding::manhattan_distance;
use crate::types::CharacterId;

const THREAT_CEILING: i64 = 1000;

pub fn threat_score(actor: &Character, candidate: &Character) -> i64 {
    THREAT_CEILING - i64::from(manhattan_distance(actor.pos, candidate.pos))
}

/// Highest-threat living opponent of `actor`.
pub fn select_target(roster: &Roster, actor: &Character) -> Option<CharacterId> {
    let mut best: Option<(i64, CharacterId)> = None;
    for candidate in roster.values() {
        if !candidate.is_alive() || !candidate.team.is_opposed_to(actor.team) {
            continue;
        }
        let score = threat_score(actor, candidate);
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate.id));
        }
    }
    best.map(|(_, id)| id)
}
