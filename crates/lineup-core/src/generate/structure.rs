// Role structure sampling: turn role targets into a concrete 11-player
// role-count structure for one attempt.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::player::{Role, TEAM_SIZE};
use crate::spec::{RoleCounts, RoleRanges, RoleTargets};

/// Order in which roles absorb a deficit or surplus. Batter first; the rest
/// only take what Batter's range cannot.
const ADJUST_ORDER: [Role; 4] = [
    Role::Batter,
    Role::Bowler,
    Role::AllRounder,
    Role::WicketKeeper,
];

/// Produce the role structure for one attempt.
///
/// Targets and ranges are expected to have passed `ConstraintSpec::validate`.
pub fn sample_structure<R: Rng + ?Sized>(
    targets: &RoleTargets,
    ranges: &RoleRanges,
    rng: &mut R,
) -> RoleCounts {
    match targets {
        RoleTargets::Fixed(counts) => *counts,
        RoleTargets::OneOf(choices) => match choices.choose(rng) {
            Some(counts) => *counts,
            None => sample_within(ranges, rng),
        },
        RoleTargets::Sampled => sample_within(ranges, rng),
    }
}

/// Draw each role uniformly from its range (upper bound capped at 11), then
/// normalize the total to 11.
pub fn sample_within<R: Rng + ?Sized>(ranges: &RoleRanges, rng: &mut R) -> RoleCounts {
    let mut counts = RoleCounts::default();
    for role in Role::ALL {
        let range = ranges.get(role);
        let upper = range.max.min(TEAM_SIZE).max(range.min);
        *counts.get_mut(role) = rng.gen_range(range.min..=upper);
    }
    normalize(&mut counts, ranges);
    counts
}

/// Bring the total to 11 by moving Batter first, then Bowler, AllRounder and
/// WicketKeeper, never leaving a role's range.
pub fn normalize(counts: &mut RoleCounts, ranges: &RoleRanges) {
    let total = counts.total();

    if total < TEAM_SIZE {
        let mut deficit = TEAM_SIZE - total;
        for role in ADJUST_ORDER {
            let max = ranges.get(role).max;
            let slot = counts.get_mut(role);
            let add = max.saturating_sub(*slot).min(deficit);
            *slot += add;
            deficit -= add;
            if deficit == 0 {
                break;
            }
        }
    } else if total > TEAM_SIZE {
        let mut surplus = total - TEAM_SIZE;
        for role in ADJUST_ORDER {
            let min = ranges.get(role).min;
            let slot = counts.get_mut(role);
            let remove = slot.saturating_sub(min).min(surplus);
            *slot -= remove;
            surplus -= remove;
            if surplus == 0 {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
