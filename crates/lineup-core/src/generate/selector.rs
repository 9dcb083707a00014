// Per-role selection: all fixed players of the role, then a random fill from
// the remaining free players.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::AttemptError;
use crate::model::player::{Player, Role};

/// Select `required` players of `role` from `candidates`.
///
/// Fixed players are always included (in pool order); the remainder is
/// sampled without replacement from the free players.
///
/// Fails with `RoleOverconstrained` if more fixed players of this role exist
/// than `required`, and with `InsufficientPool` if the free players cannot
/// cover the remainder. Both are attempt-local.
pub fn select_role<'a, R: Rng + ?Sized>(
    role: Role,
    required: usize,
    candidates: &[&'a Player],
    fixed_ids: &BTreeSet<String>,
    rng: &mut R,
) -> Result<Vec<&'a Player>, AttemptError> {
    let (fixed, free): (Vec<&Player>, Vec<&Player>) = candidates
        .iter()
        .copied()
        .partition(|p| fixed_ids.contains(&p.id));

    if fixed.len() > required {
        return Err(AttemptError::RoleOverconstrained {
            role,
            fixed: fixed.len(),
            required,
        });
    }

    let needed = required - fixed.len();
    if free.len() < needed {
        return Err(AttemptError::InsufficientPool {
            role,
            available: free.len(),
            needed,
        });
    }

    let mut selected = fixed;
    selected.extend(free.choose_multiple(rng, needed).copied());
    Ok(selected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn bowlers(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player {
                id: format!("bow{i}"),
                name: format!("Bowler {i}"),
                role: Role::Bowler,
                origin_team: if i % 2 == 0 { "A".into() } else { "B".into() },
                credits: 8.0,
                selection_percentage: 20.0,
            })
            .collect()
    }

    fn fixed(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fixed_players_come_first() {
        let pool = bowlers(6);
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = SmallRng::seed_from_u64(11);

        let picked = select_role(Role::Bowler, 4, &refs, &fixed(&["bow3", "bow5"]), &mut rng)
            .expect("selection should succeed");

        assert_eq!(picked.len(), 4);
        assert_eq!(picked[0].id, "bow3");
        assert_eq!(picked[1].id, "bow5");
        let mut ids: Vec<&str> = picked.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4, "selection must be distinct");
    }

    #[test]
    fn exact_fill_takes_everyone() {
        let pool = bowlers(3);
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = SmallRng::seed_from_u64(5);

        let picked = select_role(Role::Bowler, 3, &refs, &BTreeSet::new(), &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn too_many_fixed_is_overconstrained() {
        let pool = bowlers(5);
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = SmallRng::seed_from_u64(5);

        let err = select_role(
            Role::Bowler,
            1,
            &refs,
            &fixed(&["bow0", "bow1"]),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttemptError::RoleOverconstrained {
                role: Role::Bowler,
                fixed: 2,
                required: 1
            }
        );
    }

    #[test]
    fn short_free_pool_is_insufficient() {
        let pool = bowlers(4);
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = SmallRng::seed_from_u64(5);

        let err = select_role(Role::Bowler, 5, &refs, &fixed(&["bow0"]), &mut rng).unwrap_err();
        assert_eq!(
            err,
            AttemptError::InsufficientPool {
                role: Role::Bowler,
                available: 3,
                needed: 4
            }
        );
    }

    #[test]
    fn zero_required_selects_nothing() {
        let pool = bowlers(2);
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = SmallRng::seed_from_u64(5);

        let picked = select_role(Role::Bowler, 0, &refs, &BTreeSet::new(), &mut rng).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn same_seed_same_selection() {
        let pool = bowlers(10);
        let refs: Vec<&Player> = pool.iter().collect();

        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);
        let a = select_role(Role::Bowler, 4, &refs, &BTreeSet::new(), &mut rng_a).unwrap();
        let b = select_role(Role::Bowler, 4, &refs, &BTreeSet::new(), &mut rng_b).unwrap();
        assert_eq!(a, b);
    }
}
