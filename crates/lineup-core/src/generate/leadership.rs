// Captain and vice-captain assignment.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::player::Player;

/// Chosen captain and vice-captain ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leadership {
    pub captain_id: String,
    pub vice_captain_id: String,
}

/// Pick a captain and a distinct vice-captain from an assembled lineup.
///
/// Captain: uniform over lineup members in `captain_ids`, else the first
/// member. Vice-captain: uniform over members in `vice_ids` other than the
/// captain, else the first member that is not the captain.
///
/// Returns `None` only for lineups with fewer than two players, which the
/// generation loop never produces.
pub fn assign_leadership<R: Rng + ?Sized>(
    lineup: &[&Player],
    captain_ids: &BTreeSet<String>,
    vice_ids: &BTreeSet<String>,
    rng: &mut R,
) -> Option<Leadership> {
    if lineup.len() < 2 {
        return None;
    }

    let captain_pool: Vec<&Player> = lineup
        .iter()
        .copied()
        .filter(|p| captain_ids.contains(&p.id))
        .collect();
    let captain = match captain_pool.choose(rng) {
        Some(p) => *p,
        None => lineup[0],
    };

    let vice_pool: Vec<&Player> = lineup
        .iter()
        .copied()
        .filter(|p| p.id != captain.id && vice_ids.contains(&p.id))
        .collect();
    let vice = match vice_pool.choose(rng) {
        Some(p) => *p,
        None => lineup.iter().copied().find(|p| p.id != captain.id)?,
    };

    Some(Leadership {
        captain_id: captain.id.clone(),
        vice_captain_id: vice.id.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
