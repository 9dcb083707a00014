// Player roles, candidate players, and the per-match player pool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of players in every generated lineup.
pub const TEAM_SIZE: usize = 11;

/// Cricket roles used for lineup quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    WicketKeeper,
    Batter,
    AllRounder,
    Bowler,
}

impl Role {
    /// All roles in assembly order.
    pub const ALL: [Role; 4] = [
        Role::WicketKeeper,
        Role::Batter,
        Role::AllRounder,
        Role::Bowler,
    ];

    /// Parse a platform role code into a Role.
    ///
    /// Accepts the short codes used by roster exports:
    /// - "WK" -> WicketKeeper
    /// - "BAT" -> Batter
    /// - "AL" / "ALL" / "AR" -> AllRounder
    /// - "BOWL" / "BOW" -> Bowler
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WK" => Some(Role::WicketKeeper),
            "BAT" => Some(Role::Batter),
            "AL" | "ALL" | "AR" => Some(Role::AllRounder),
            "BOWL" | "BOW" => Some(Role::Bowler),
            _ => None,
        }
    }

    /// Return the short display code for this role.
    pub fn code(&self) -> &'static str {
        match self {
            Role::WicketKeeper => "WK",
            Role::Batter => "BAT",
            Role::AllRounder => "ALL",
            Role::Bowler => "BOW",
        }
    }

    /// Index of this role in `Role::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Role::WicketKeeper => 0,
            Role::Batter => 1,
            Role::AllRounder => 2,
            Role::Bowler => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A candidate player supplied by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier.
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Which of the two match sides the player belongs to.
    pub origin_team: String,
    /// Credit cost of picking this player.
    pub credits: f64,
    /// Popularity metric (0-100). Informational only.
    #[serde(default)]
    pub selection_percentage: f64,
}

/// The immutable list of candidate players for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerPool {
    players: Vec<Player>,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Self {
        PlayerPool { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player by id.
    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Players of the given role, in pool order.
    pub fn by_role(&self, role: Role) -> Vec<&Player> {
        self.players.iter().filter(|p| p.role == role).collect()
    }

    /// Distinct origin teams in order of first appearance.
    pub fn sides(&self) -> Vec<&str> {
        let mut sides: Vec<&str> = Vec::new();
        for p in &self.players {
            if !sides.contains(&p.origin_team.as_str()) {
                sides.push(p.origin_team.as_str());
            }
        }
        sides
    }

    /// The first id that appears more than once, if any.
    pub fn duplicate_id(&self) -> Option<&str> {
        self.players
            .iter()
            .enumerate()
            .find(|(i, p)| self.players[..*i].iter().any(|q| q.id == p.id))
            .map(|(_, p)| p.id.as_str())
    }

    /// Mean credit cost across the pool, or `None` for an empty pool.
    pub fn average_credits(&self) -> Option<f64> {
        if self.players.is_empty() {
            return None;
        }
        let total: f64 = self.players.iter().map(|p| p.credits).sum();
        Some(total / self.players.len() as f64)
    }
}

impl From<Vec<Player>> for PlayerPool {
    fn from(players: Vec<Player>) -> Self {
        PlayerPool::new(players)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, role: Role, team: &str, credits: f64) -> Player {
        Player {
            id: id.into(),
            name: format!("Player {id}"),
            role,
            origin_team: team.into(),
            credits,
            selection_percentage: 50.0,
        }
    }

    #[test]
    fn role_codes_parse() {
        assert_eq!(Role::from_code("WK"), Some(Role::WicketKeeper));
        assert_eq!(Role::from_code("bat"), Some(Role::Batter));
        assert_eq!(Role::from_code("AL"), Some(Role::AllRounder));
        assert_eq!(Role::from_code("AR"), Some(Role::AllRounder));
        assert_eq!(Role::from_code("BOWL"), Some(Role::Bowler));
        assert_eq!(Role::from_code(" bow "), Some(Role::Bowler));
        assert_eq!(Role::from_code("SP"), None);
    }

    #[test]
    fn role_index_matches_assembly_order() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
        assert_eq!(Role::AllRounder.to_string(), "ALL");
    }

    #[test]
    fn sides_in_first_appearance_order() {
        let pool = PlayerPool::new(vec![
            player("1", Role::Batter, "SA-W", 9.0),
            player("2", Role::Bowler, "PK-W", 8.0),
            player("3", Role::Bowler, "SA-W", 8.0),
        ]);
        assert_eq!(pool.sides(), vec!["SA-W", "PK-W"]);
    }

    #[test]
    fn by_role_keeps_pool_order() {
        let pool = PlayerPool::new(vec![
            player("1", Role::Bowler, "A", 8.0),
            player("2", Role::Batter, "A", 8.0),
            player("3", Role::Bowler, "B", 8.0),
        ]);
        let ids: Vec<&str> = pool.by_role(Role::Bowler).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn duplicate_id_detected() {
        let pool = PlayerPool::new(vec![
            player("1", Role::Bowler, "A", 8.0),
            player("2", Role::Batter, "A", 8.0),
            player("1", Role::Batter, "B", 8.0),
        ]);
        assert_eq!(pool.duplicate_id(), Some("1"));
        assert_eq!(PlayerPool::default().duplicate_id(), None);
    }

    #[test]
    fn average_credits() {
        let pool = PlayerPool::new(vec![
            player("1", Role::Bowler, "A", 8.0),
            player("2", Role::Batter, "A", 10.0),
        ]);
        assert!((pool.average_credits().unwrap() - 9.0).abs() < 1e-9);
        assert!(PlayerPool::default().average_credits().is_none());
    }

    #[test]
    fn pool_deserializes_from_json_array() {
        let json = r#"[
            {"id": "1", "name": "M Ali", "role": "WicketKeeper", "origin_team": "PK-W",
             "credits": 8.5, "selection_percentage": 88.9},
            {"id": "2", "name": "S Jafta", "role": "WicketKeeper", "origin_team": "SA-W",
             "credits": 6.5}
        ]"#;
        let pool: PlayerPool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("2").unwrap().selection_percentage, 0.0);
    }
}
