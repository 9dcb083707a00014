// Partition validation: the origin-team split of the 11 must satisfy the
// configured strategy.

use super::AttemptError;
use crate::model::player::Player;
use crate::model::team::SideSplit;
use crate::spec::{MatchSides, PartitionStrategy};

/// Minimum count for the favoured side under FavorSide*/MaximizeOneSide.
pub const FAVORED_MIN: usize = 7;

/// Count players per side. Anyone not from side A counts toward side B.
pub fn side_split(players: &[&Player], sides: &MatchSides) -> SideSplit {
    let side_a = players
        .iter()
        .filter(|p| p.origin_team == sides.side_a)
        .count();
    SideSplit {
        side_a,
        side_b: players.len() - side_a,
    }
}

/// Whether a split satisfies the strategy.
pub fn satisfies(split: SideSplit, strategy: PartitionStrategy) -> bool {
    let (a, b) = (split.side_a, split.side_b);
    match strategy {
        PartitionStrategy::Balanced => a.abs_diff(b) <= 1,
        PartitionStrategy::FavorSideA => a >= FAVORED_MIN,
        PartitionStrategy::FavorSideB => b >= FAVORED_MIN,
        PartitionStrategy::MinimizeOneSide => (a == 1) != (b == 1),
        PartitionStrategy::MaximizeOneSide => a >= FAVORED_MIN || b >= FAVORED_MIN,
    }
}

/// Compute the split and check it against the strategy.
pub fn check_partition(
    players: &[&Player],
    sides: &MatchSides,
    strategy: PartitionStrategy,
) -> Result<SideSplit, AttemptError> {
    let split = side_split(players, sides);
    if satisfies(split, strategy) {
        Ok(split)
    } else {
        Err(AttemptError::PartitionViolated {
            strategy,
            side_a: split.side_a,
            side_b: split.side_b,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
