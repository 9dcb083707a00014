// Constraint specification: role quotas, credit window, partition strategy,
// fixed and leadership candidates, and up-front validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::model::player::{PlayerPool, Role, TEAM_SIZE};

/// Tolerance for decimal credit comparisons (credits like 8.5 or 7.3).
pub const CREDIT_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The constraint spec is self-contradictory. Raised once, before any attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("invalid credit window [{min}, {max}]: bounds must be finite and min <= max")]
    InvalidCreditWindow { min: f64, max: f64 },

    #[error("role counts must sum to {expected}, got {total}")]
    RoleCountsSum { total: usize, expected: usize },

    #[error("{role} count {count} is outside its valid range {min}-{max}")]
    RoleCountOutOfRange {
        role: Role,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("{role} range {min}-{max} is empty")]
    InvalidRoleRange { role: Role, min: usize, max: usize },

    #[error("role ranges cannot produce an {expected}-player lineup (totals span {min_total}-{max_total})")]
    InfeasibleRoleRanges {
        min_total: usize,
        max_total: usize,
        expected: usize,
    },

    #[error("structure choice list is empty")]
    EmptyStructureChoice,

    #[error("requested team count must be at least 1")]
    NoTeamsRequested,

    #[error("{count} fixed players requested; at most {max} fit in a lineup")]
    TooManyFixedPlayers { count: usize, max: usize },

    #[error("unknown player id `{id}` in {field}")]
    UnknownPlayer { field: &'static str, id: String },

    #[error("player id `{id}` appears more than once in the pool")]
    DuplicatePlayer { id: String },

    #[error("pool has {} origin teams ({}); a match has at most two sides", .sides.len(), .sides.join(", "))]
    TooManySides { sides: Vec<String> },

    #[error("side `{side}` does not appear in the pool")]
    UnknownSide { side: String },
}

// ---------------------------------------------------------------------------
// Role structures
// ---------------------------------------------------------------------------

/// Count of players per role for one lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoleCounts {
    pub wk: usize,
    pub bat: usize,
    pub all: usize,
    pub bow: usize,
}

impl RoleCounts {
    pub const fn new(wk: usize, bat: usize, all: usize, bow: usize) -> Self {
        RoleCounts { wk, bat, all, bow }
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::WicketKeeper => self.wk,
            Role::Batter => self.bat,
            Role::AllRounder => self.all,
            Role::Bowler => self.bow,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut usize {
        match role {
            Role::WicketKeeper => &mut self.wk,
            Role::Batter => &mut self.bat,
            Role::AllRounder => &mut self.all,
            Role::Bowler => &mut self.bow,
        }
    }

    /// Sum of all role counts, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        Role::ALL
            .iter()
            .fold(0usize, |acc, role| acc.saturating_add(self.get(*role)))
    }

    /// Check that the structure sums to 11 and every role is within range.
    pub fn validate(&self, ranges: &RoleRanges) -> Result<(), SpecError> {
        if self.total() != TEAM_SIZE {
            return Err(SpecError::RoleCountsSum {
                total: self.total(),
                expected: TEAM_SIZE,
            });
        }
        for role in Role::ALL {
            let range = ranges.get(role);
            let count = self.get(role);
            if !range.contains(count) {
                return Err(SpecError::RoleCountOutOfRange {
                    role,
                    count,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

/// Catalogued role combinations offered by the combination picker, by id 1-10.
pub const PRESET_STRUCTURES: [RoleCounts; 10] = [
    RoleCounts::new(1, 3, 2, 5),
    RoleCounts::new(1, 3, 3, 4),
    RoleCounts::new(1, 4, 3, 3),
    RoleCounts::new(1, 4, 2, 4),
    RoleCounts::new(1, 5, 2, 3),
    RoleCounts::new(1, 3, 4, 3),
    RoleCounts::new(2, 3, 3, 3),
    RoleCounts::new(2, 3, 2, 4),
    RoleCounts::new(2, 4, 2, 3),
    RoleCounts::new(3, 3, 2, 3),
];

/// Look up a preset combination by its 1-based id.
pub fn preset(id: usize) -> Option<RoleCounts> {
    id.checked_sub(1)
        .and_then(|i| PRESET_STRUCTURES.get(i))
        .copied()
}

/// Inclusive count range for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRange {
    pub min: usize,
    pub max: usize,
}

impl RoleRange {
    pub const fn new(min: usize, max: usize) -> Self {
        RoleRange { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Valid count range per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRanges {
    pub wk: RoleRange,
    pub bat: RoleRange,
    pub all: RoleRange,
    pub bow: RoleRange,
}

impl Default for RoleRanges {
    /// WK 1-2, BAT 3-5, ALL 1-3, BOW 3-5.
    fn default() -> Self {
        RoleRanges {
            wk: RoleRange::new(1, 2),
            bat: RoleRange::new(3, 5),
            all: RoleRange::new(1, 3),
            bow: RoleRange::new(3, 5),
        }
    }
}

impl RoleRanges {
    pub fn get(&self, role: Role) -> RoleRange {
        match role {
            Role::WicketKeeper => self.wk,
            Role::Batter => self.bat,
            Role::AllRounder => self.all,
            Role::Bowler => self.bow,
        }
    }

    /// Check every range is non-empty and that 11 lies between the summed
    /// minima and maxima.
    pub fn validate(&self) -> Result<(), SpecError> {
        for role in Role::ALL {
            let range = self.get(role);
            if range.min > range.max {
                return Err(SpecError::InvalidRoleRange {
                    role,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        let min_total = Role::ALL
            .iter()
            .fold(0usize, |acc, r| acc.saturating_add(self.get(*r).min));
        let max_total = Role::ALL
            .iter()
            .fold(0usize, |acc, r| acc.saturating_add(self.get(*r).max));
        if min_total > TEAM_SIZE || max_total < TEAM_SIZE {
            return Err(SpecError::InfeasibleRoleRanges {
                min_total,
                max_total,
                expected: TEAM_SIZE,
            });
        }
        Ok(())
    }
}

/// How the per-attempt role structure is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoleTargets {
    /// One explicit structure used for every attempt.
    Fixed(RoleCounts),
    /// Sample a structure per attempt within `ConstraintSpec::role_ranges`.
    Sampled,
    /// Draw one of several chosen structures per attempt.
    OneOf(Vec<RoleCounts>),
}

// ---------------------------------------------------------------------------
// Credit window
// ---------------------------------------------------------------------------

/// Inclusive window for the lineup's total credits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditWindow {
    pub min: f64,
    pub max: f64,
}

impl CreditWindow {
    pub const fn new(min: f64, max: f64) -> Self {
        CreditWindow { min, max }
    }

    pub fn contains(&self, total: f64) -> bool {
        total >= self.min - CREDIT_EPSILON && total <= self.max + CREDIT_EPSILON
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min <= self.max;
        if !ok {
            return Err(SpecError::InvalidCreditWindow {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Suggest a window centred on an average-priced lineup:
    /// `avg_credits * 11 +/- padding`, rounded to one decimal.
    ///
    /// Returns `None` for an empty pool.
    pub fn suggested(pool: &PlayerPool, padding: f64) -> Option<Self> {
        let base = pool.average_credits()? * TEAM_SIZE as f64;
        let round1 = |x: f64| (x * 10.0).round() / 10.0;
        Some(CreditWindow {
            min: round1((base - padding).max(0.0)),
            max: round1(base + padding),
        })
    }
}

// ---------------------------------------------------------------------------
// Partition strategy
// ---------------------------------------------------------------------------

/// Rule constraining how many of the 11 come from each match side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionStrategy {
    /// 6:5 or 5:6.
    Balanced,
    /// Side A supplies at least 7.
    FavorSideA,
    /// Side B supplies at least 7.
    FavorSideB,
    /// One side supplies exactly 1 (10:1 or 1:10).
    MinimizeOneSide,
    /// Either side supplies at least 7.
    MaximizeOneSide,
}

/// The two match sides as resolved from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSides {
    pub side_a: String,
    /// `None` when every pool player comes from side A.
    pub side_b: Option<String>,
}

// ---------------------------------------------------------------------------
// ConstraintSpec
// ---------------------------------------------------------------------------

/// The declarative generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub role_targets: RoleTargets,
    #[serde(default)]
    pub role_ranges: RoleRanges,
    pub credit_window: CreditWindow,
    pub partition: PartitionStrategy,
    /// Origin team treated as side A. Defaults to the first pool player's team.
    #[serde(default)]
    pub side_a: Option<String>,
    #[serde(default)]
    pub fixed_player_ids: BTreeSet<String>,
    #[serde(default)]
    pub captain_candidate_ids: BTreeSet<String>,
    #[serde(default)]
    pub vice_captain_candidate_ids: BTreeSet<String>,
    pub requested_team_count: usize,
    pub max_attempts: usize,
    /// Reject attempts that reproduce an already accepted lineup.
    #[serde(default)]
    pub distinct_lineups: bool,
}

impl Default for ConstraintSpec {
    fn default() -> Self {
        ConstraintSpec {
            role_targets: RoleTargets::Sampled,
            role_ranges: RoleRanges::default(),
            credit_window: CreditWindow::new(0.0, 100.0),
            partition: PartitionStrategy::Balanced,
            side_a: None,
            fixed_player_ids: BTreeSet::new(),
            captain_candidate_ids: BTreeSet::new(),
            vice_captain_candidate_ids: BTreeSet::new(),
            requested_team_count: 1,
            max_attempts: 10_000,
            distinct_lineups: false,
        }
    }
}

impl ConstraintSpec {
    /// Build a spec skeleton from loaded generator defaults. Callers fill in
    /// role targets, credit window, partition, and player id sets.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        ConstraintSpec {
            role_ranges: config.role_ranges,
            requested_team_count: config.generation.requested_team_count,
            max_attempts: config.generation.max_attempts,
            distinct_lineups: config.generation.distinct_lineups,
            ..ConstraintSpec::default()
        }
    }

    /// Validate the spec against the pool before any attempt is made.
    ///
    /// Returns the resolved match sides used by partition checks.
    pub fn validate(&self, pool: &PlayerPool) -> Result<MatchSides, SpecError> {
        self.credit_window.validate()?;
        self.role_ranges.validate()?;

        match &self.role_targets {
            RoleTargets::Fixed(counts) => counts.validate(&self.role_ranges)?,
            RoleTargets::Sampled => {}
            RoleTargets::OneOf(choices) => {
                if choices.is_empty() {
                    return Err(SpecError::EmptyStructureChoice);
                }
                for counts in choices {
                    counts.validate(&self.role_ranges)?;
                }
            }
        }

        if self.requested_team_count < 1 {
            return Err(SpecError::NoTeamsRequested);
        }

        if self.fixed_player_ids.len() > TEAM_SIZE {
            return Err(SpecError::TooManyFixedPlayers {
                count: self.fixed_player_ids.len(),
                max: TEAM_SIZE,
            });
        }

        if let Some(id) = pool.duplicate_id() {
            return Err(SpecError::DuplicatePlayer { id: id.to_string() });
        }

        let id_sets: [(&'static str, &BTreeSet<String>); 3] = [
            ("fixed_player_ids", &self.fixed_player_ids),
            ("captain_candidate_ids", &self.captain_candidate_ids),
            ("vice_captain_candidate_ids", &self.vice_captain_candidate_ids),
        ];
        for (field, ids) in id_sets {
            if let Some(id) = ids.iter().find(|id| !pool.contains(id)) {
                return Err(SpecError::UnknownPlayer {
                    field,
                    id: id.clone(),
                });
            }
        }

        self.resolve_sides(pool)
    }

    fn resolve_sides(&self, pool: &PlayerPool) -> Result<MatchSides, SpecError> {
        let sides = pool.sides();
        if sides.len() > 2 {
            return Err(SpecError::TooManySides {
                sides: sides.iter().map(|s| s.to_string()).collect(),
            });
        }

        match &self.side_a {
            Some(side_a) => {
                if !sides.contains(&side_a.as_str()) {
                    return Err(SpecError::UnknownSide {
                        side: side_a.clone(),
                    });
                }
                let side_b = sides
                    .iter()
                    .find(|s| **s != side_a.as_str())
                    .map(|s| s.to_string());
                Ok(MatchSides {
                    side_a: side_a.clone(),
                    side_b,
                })
            }
            None => Ok(MatchSides {
                side_a: sides.first().map(|s| s.to_string()).unwrap_or_default(),
                side_b: sides.get(1).map(|s| s.to_string()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
