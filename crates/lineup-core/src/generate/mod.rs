// Lineup generation: a bounded rejection-sampling loop over
// structure sampling, per-role selection, validation, and leadership.
//
// Each attempt:
// 1. Sample a role structure
// 2. Select players role by role (fixed first, then random fill)
// 3. Check lineup size, credits, and side partition
// 4. Optionally reject duplicates of accepted lineups
// 5. Assign captain and vice-captain
//
// Any failure discards the attempt; nothing carries over between attempts.

pub mod credit;
pub mod leadership;
pub mod partition;
pub mod runner;
pub mod selector;
pub mod structure;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::model::player::{Player, PlayerPool, Role, TEAM_SIZE};
use crate::model::team::{GeneratedTeam, GenerationResult, RejectionStats};
use crate::spec::{ConstraintSpec, MatchSides, PartitionStrategy, SpecError};

use credit::check_credits;
use leadership::assign_leadership;
use partition::check_partition;
use selector::select_role;
use structure::sample_structure;

// ---------------------------------------------------------------------------
// Attempt-local errors
// ---------------------------------------------------------------------------

/// Why a single attempt was discarded. Never surfaced to callers; the loop
/// tallies these and retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptError {
    #[error("{fixed} fixed {role} players exceed the {required} required")]
    RoleOverconstrained {
        role: Role,
        fixed: usize,
        required: usize,
    },

    #[error("only {available} free {role} players for {needed} open slots")]
    InsufficientPool {
        role: Role,
        available: usize,
        needed: usize,
    },

    #[error("lineup has {size} players, expected {expected}")]
    IncompleteLineup { size: usize, expected: usize },

    #[error("total credits {total} outside window [{min}, {max}]")]
    CreditsOutOfWindow { total: f64, min: f64, max: f64 },

    #[error("side split {side_a}:{side_b} violates {strategy:?}")]
    PartitionViolated {
        strategy: PartitionStrategy,
        side_a: usize,
        side_b: usize,
    },

    #[error("lineup duplicates an accepted team")]
    DuplicateLineup,
}

impl RejectionStats {
    fn record(&mut self, err: &AttemptError) {
        match err {
            AttemptError::RoleOverconstrained { .. } => self.role_overconstrained += 1,
            AttemptError::InsufficientPool { .. } => self.insufficient_pool += 1,
            AttemptError::IncompleteLineup { .. } => self.incomplete_lineup += 1,
            AttemptError::CreditsOutOfWindow { .. } => self.credits_out_of_window += 1,
            AttemptError::PartitionViolated { .. } => self.partition_violated += 1,
            AttemptError::DuplicateLineup => self.duplicate_lineup += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Loop state machine
// ---------------------------------------------------------------------------

/// Where the generation loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// More attempts may run.
    Running,
    /// The requested team count was reached.
    Satisfied,
    /// The attempt budget ran out or the run was cancelled first.
    PartiallySatisfied,
}

impl LoopStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, LoopStatus::Running)
    }
}

/// A resumable generation run. Owns its accumulator, attempt counter, and
/// random source; borrows the pool and spec read-only.
pub struct GenerationLoop<'a, R: Rng> {
    spec: &'a ConstraintSpec,
    sides: MatchSides,
    /// Pool players grouped by role, indexed by `Role::index()`.
    by_role: [Vec<&'a Player>; 4],
    rng: R,
    teams: Vec<GeneratedTeam>,
    attempts_used: usize,
    rejections: RejectionStats,
    status: LoopStatus,
}

impl<'a, R: Rng> GenerationLoop<'a, R> {
    /// Validate the spec against the pool and prepare a run.
    pub fn new(pool: &'a PlayerPool, spec: &'a ConstraintSpec, rng: R) -> Result<Self, SpecError> {
        let sides = spec.validate(pool)?;

        info!(
            pool_size = pool.len(),
            requested = spec.requested_team_count,
            max_attempts = spec.max_attempts,
            partition = ?spec.partition,
            "Starting lineup generation"
        );

        Ok(GenerationLoop {
            spec,
            sides,
            by_role: Role::ALL.map(|role| pool.by_role(role)),
            rng,
            teams: Vec::new(),
            attempts_used: 0,
            rejections: RejectionStats::default(),
            status: LoopStatus::Running,
        })
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn attempts_used(&self) -> usize {
        self.attempts_used
    }

    pub fn teams(&self) -> &[GeneratedTeam] {
        &self.teams
    }

    /// Run a single attempt (or detect that the budget is spent).
    pub fn step(&mut self) -> LoopStatus {
        if self.status.is_done() {
            return self.status;
        }
        if self.attempts_used >= self.spec.max_attempts {
            self.finish(LoopStatus::PartiallySatisfied);
            return self.status;
        }

        self.attempts_used += 1;
        match self.attempt() {
            Ok(team) => {
                debug!(
                    attempt = self.attempts_used,
                    total_credits = team.total_credits,
                    captain = %team.captain_id,
                    "Attempt accepted"
                );
                self.teams.push(team);
                if self.teams.len() >= self.spec.requested_team_count {
                    self.finish(LoopStatus::Satisfied);
                    return self.status;
                }
            }
            Err(e) => {
                trace!(attempt = self.attempts_used, error = %e, "Attempt rejected");
                self.rejections.record(&e);
            }
        }

        if self.attempts_used >= self.spec.max_attempts {
            self.finish(LoopStatus::PartiallySatisfied);
        }
        self.status
    }

    /// Run up to `max_steps` attempts, stopping early when done.
    pub fn run_batch(&mut self, max_steps: usize) -> LoopStatus {
        for _ in 0..max_steps {
            if self.step().is_done() {
                break;
            }
        }
        self.status
    }

    /// Run until satisfied or the budget is spent.
    pub fn run(&mut self) -> LoopStatus {
        while !self.step().is_done() {}
        self.status
    }

    /// Stop the run early, keeping whatever was accepted.
    pub fn cancel(&mut self) {
        if !self.status.is_done() {
            info!(attempts = self.attempts_used, "Lineup generation cancelled");
            self.finish(LoopStatus::PartiallySatisfied);
        }
    }

    pub fn into_result(self) -> GenerationResult {
        GenerationResult {
            satisfied: self.status == LoopStatus::Satisfied,
            requested: self.spec.requested_team_count,
            attempts_used: self.attempts_used,
            rejections: self.rejections,
            teams: self.teams,
        }
    }

    fn finish(&mut self, status: LoopStatus) {
        self.status = status;
        match status {
            LoopStatus::Satisfied => info!(
                teams = self.teams.len(),
                attempts = self.attempts_used,
                "Lineup generation satisfied"
            ),
            LoopStatus::PartiallySatisfied => warn!(
                teams = self.teams.len(),
                requested = self.spec.requested_team_count,
                attempts = self.attempts_used,
                rejected = self.rejections.total(),
                "Lineup generation stopped short of requested count"
            ),
            LoopStatus::Running => {}
        }
    }

    fn attempt(&mut self) -> Result<GeneratedTeam, AttemptError> {
        let spec = self.spec;
        let counts = sample_structure(&spec.role_targets, &spec.role_ranges, &mut self.rng);

        let mut lineup: Vec<&'a Player> = Vec::with_capacity(TEAM_SIZE);
        for role in Role::ALL {
            let picked = select_role(
                role,
                counts.get(role),
                &self.by_role[role.index()],
                &spec.fixed_player_ids,
                &mut self.rng,
            )?;
            lineup.extend(picked);
        }

        if lineup.len() != TEAM_SIZE {
            return Err(AttemptError::IncompleteLineup {
                size: lineup.len(),
                expected: TEAM_SIZE,
            });
        }

        let total_credits = check_credits(&lineup, &spec.credit_window)?;
        let side_split = check_partition(&lineup, &self.sides, spec.partition)?;

        let players: Vec<Player> = lineup.iter().map(|p| (*p).clone()).collect();

        if spec.distinct_lineups {
            let mut ids: Vec<&str> = players.iter().map(|p| p.id.as_str()).collect();
            ids.sort_unstable();
            let duplicate = self.teams.iter().any(|t| {
                let mut other = t.player_ids();
                other.sort_unstable();
                other == ids
            });
            if duplicate {
                return Err(AttemptError::DuplicateLineup);
            }
        }

        let leadership = assign_leadership(
            &lineup,
            &spec.captain_candidate_ids,
            &spec.vice_captain_candidate_ids,
            &mut self.rng,
        )
        .ok_or(AttemptError::IncompleteLineup {
            size: lineup.len(),
            expected: TEAM_SIZE,
        })?;

        Ok(GeneratedTeam {
            players,
            captain_id: leadership.captain_id,
            vice_captain_id: leadership.vice_captain_id,
            total_credits,
            role_counts: counts,
            side_split,
        })
    }
}

/// Generate lineups for `pool` under `spec`, drawing randomness from `rng`.
///
/// Spec errors are returned before any attempt. Search failures never are:
/// they show up as `satisfied == false` with whatever teams were accepted.
pub fn generate_teams<R: Rng + ?Sized>(
    pool: &PlayerPool,
    spec: &ConstraintSpec,
    rng: &mut R,
) -> Result<GenerationResult, SpecError> {
    let mut run = GenerationLoop::new(pool, spec, rng)?;
    run.run();
    Ok(run.into_result())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CreditWindow, RoleCounts, RoleTargets};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    /// 2 keepers, 3 batters, 2 all-rounders, 4 bowlers per side, 8.0 credits each.
    fn pool() -> PlayerPool {
        let layout = [
            (Role::WicketKeeper, 2),
            (Role::Batter, 3),
            (Role::AllRounder, 2),
            (Role::Bowler, 4),
        ];
        let mut players = Vec::new();
        for side in ["A", "B"] {
            for (role, n) in layout {
                for i in 0..n {
                    players.push(Player {
                        id: format!("{side}-{}-{i}", role.code()),
                        name: format!("{side} {} {i}", role.code()),
                        role,
                        origin_team: side.into(),
                        credits: 8.0,
                        selection_percentage: 30.0,
                    });
                }
            }
        }
        PlayerPool::new(players)
    }

    fn spec() -> ConstraintSpec {
        ConstraintSpec {
            role_targets: RoleTargets::Fixed(RoleCounts::new(1, 4, 2, 4)),
            credit_window: CreditWindow::new(80.0, 100.0),
            partition: PartitionStrategy::MaximizeOneSide,
            max_attempts: 500,
            ..ConstraintSpec::default()
        }
    }

    #[test]
    fn step_counts_attempts() {
        let pool = pool();
        let spec = ConstraintSpec {
            requested_team_count: 1_000,
            ..spec()
        };
        let mut run = GenerationLoop::new(&pool, &spec, SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(run.attempts_used(), 0);
        run.run_batch(10);
        assert_eq!(run.attempts_used(), 10);
        assert_eq!(run.status(), LoopStatus::Running);
    }

    #[test]
    fn zero_budget_finishes_without_attempts() {
        let pool = pool();
        let spec = ConstraintSpec {
            max_attempts: 0,
            ..spec()
        };
        let mut run = GenerationLoop::new(&pool, &spec, SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(run.step(), LoopStatus::PartiallySatisfied);
        let result = run.into_result();
        assert_eq!(result.attempts_used, 0);
        assert!(result.teams.is_empty());
        assert!(!result.satisfied);
    }

    #[test]
    fn budget_exhaustion_is_partial_not_error() {
        let pool = pool();
        let spec = ConstraintSpec {
            credit_window: CreditWindow::new(0.0, 10.0),
            max_attempts: 25,
            ..spec()
        };
        let result = generate_teams(&pool, &spec, &mut SmallRng::seed_from_u64(2)).unwrap();
        assert!(!result.satisfied);
        assert_eq!(result.attempts_used, 25);
        assert_eq!(result.rejections.credits_out_of_window, 25);
    }

    #[test]
    fn huge_requested_count_returns_partial_result() {
        let pool = pool();
        let spec = ConstraintSpec {
            requested_team_count: usize::MAX / 4,
            max_attempts: 10,
            ..spec()
        };
        let result = generate_teams(&pool, &spec, &mut SmallRng::seed_from_u64(12)).unwrap();
        assert!(!result.satisfied);
        assert_eq!(result.attempts_used, 10);
        assert!(result.teams.len() <= 10);
        assert_eq!(result.requested, usize::MAX / 4);
    }

    #[test]
    fn cancel_keeps_accepted_teams() {
        let pool = pool();
        let spec = ConstraintSpec {
            requested_team_count: 50,
            ..spec()
        };
        let mut run = GenerationLoop::new(&pool, &spec, SmallRng::seed_from_u64(3)).unwrap();
        run.run_batch(40);
        let accepted = run.teams().len();
        run.cancel();
        assert_eq!(run.status(), LoopStatus::PartiallySatisfied);
        // Further steps are no-ops once done.
        assert_eq!(run.step(), LoopStatus::PartiallySatisfied);
        let result = run.into_result();
        assert_eq!(result.teams.len(), accepted);
        assert_eq!(result.attempts_used, 40);
        assert!(!result.satisfied);
    }

    #[test]
    fn insufficient_role_pool_is_retried_until_budget() {
        let pool = pool();
        // Only 4 keepers exist in the pool.
        let mut ranges = crate::spec::RoleRanges::default();
        ranges.wk = crate::spec::RoleRange::new(5, 5);
        ranges.bat = crate::spec::RoleRange::new(2, 3);
        ranges.all = crate::spec::RoleRange::new(1, 1);
        ranges.bow = crate::spec::RoleRange::new(2, 3);
        let spec = ConstraintSpec {
            role_targets: RoleTargets::Sampled,
            role_ranges: ranges,
            max_attempts: 30,
            ..spec()
        };
        let result = generate_teams(&pool, &spec, &mut SmallRng::seed_from_u64(4)).unwrap();
        assert!(result.teams.is_empty());
        assert_eq!(result.rejections.insufficient_pool, 30);
    }

    #[test]
    fn distinct_lineups_rejects_repeats() {
        // Exactly 11 players: every successful attempt is the same lineup.
        let players: Vec<Player> = pool()
            .players()
            .iter()
            .filter(|p| p.origin_team == "A")
            .cloned()
            .collect();
        let pool = PlayerPool::new(players);
        let spec = ConstraintSpec {
            role_targets: RoleTargets::Fixed(RoleCounts::new(2, 3, 2, 4)),
            credit_window: CreditWindow::new(0.0, 100.0),
            partition: PartitionStrategy::FavorSideA,
            requested_team_count: 3,
            max_attempts: 20,
            distinct_lineups: true,
            ..ConstraintSpec::default()
        };
        let result = generate_teams(&pool, &spec, &mut SmallRng::seed_from_u64(5)).unwrap();
        assert_eq!(result.teams.len(), 1);
        assert_eq!(result.rejections.duplicate_lineup, 19);
        assert!(!result.satisfied);
    }

    #[test]
    fn spec_errors_surface_before_attempts() {
        let pool = pool();
        let spec = ConstraintSpec {
            fixed_player_ids: BTreeSet::from(["ghost".to_string()]),
            ..spec()
        };
        let err = generate_teams(&pool, &spec, &mut SmallRng::seed_from_u64(6)).unwrap_err();
        assert!(matches!(err, SpecError::UnknownPlayer { .. }));
    }

    #[test]
    fn attempt_error_messages() {
        let err = AttemptError::RoleOverconstrained {
            role: Role::WicketKeeper,
            fixed: 3,
            required: 1,
        };
        assert_eq!(err.to_string(), "3 fixed WK players exceed the 1 required");
        let err = AttemptError::PartitionViolated {
            strategy: PartitionStrategy::Balanced,
            side_a: 8,
            side_b: 3,
        };
        assert_eq!(err.to_string(), "side split 8:3 violates Balanced");
    }
}
