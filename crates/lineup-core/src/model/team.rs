// Generated lineups and the result of a generation run.

use serde::{Deserialize, Serialize};

use crate::model::player::Player;
use crate::spec::RoleCounts;

/// How many of the 11 come from each match side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideSplit {
    pub side_a: usize,
    pub side_b: usize,
}

/// A lineup that satisfied every constraint of its attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTeam {
    /// The 11 players in assembly order (roles in WK, BAT, ALL, BOW order,
    /// fixed players first within each role).
    pub players: Vec<Player>,
    pub captain_id: String,
    pub vice_captain_id: String,
    /// Sum of member credits.
    pub total_credits: f64,
    /// Role structure drawn for the attempt that produced this team.
    pub role_counts: RoleCounts,
    pub side_split: SideSplit,
}

impl GeneratedTeam {
    pub fn player_ids(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.id == self.captain_id)
    }

    pub fn vice_captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.id == self.vice_captain_id)
    }

    /// Whether both teams field exactly the same 11 ids.
    pub fn same_lineup(&self, other: &GeneratedTeam) -> bool {
        let mut a = self.player_ids();
        let mut b = other.player_ids();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

/// Tally of rejected attempts by cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RejectionStats {
    pub role_overconstrained: usize,
    pub insufficient_pool: usize,
    pub incomplete_lineup: usize,
    pub credits_out_of_window: usize,
    pub partition_violated: usize,
    pub duplicate_lineup: usize,
}

impl RejectionStats {
    pub fn total(&self) -> usize {
        self.role_overconstrained
            + self.insufficient_pool
            + self.incomplete_lineup
            + self.credits_out_of_window
            + self.partition_violated
            + self.duplicate_lineup
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Accepted teams in acceptance order.
    pub teams: Vec<GeneratedTeam>,
    pub attempts_used: usize,
    /// True iff `requested` teams were produced before the budget ran out.
    pub satisfied: bool,
    pub requested: usize,
    pub rejections: RejectionStats,
}

impl GenerationResult {
    /// Message for the host when fewer teams than requested were produced.
    pub fn shortfall_message(&self) -> Option<String> {
        if self.satisfied {
            return None;
        }
        Some(format!(
            "only {} of {} requested teams could be generated under these constraints",
            self.teams.len(),
            self.requested
        ))
    }

    /// Pretty JSON export of the result.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
