// Library root: re-exports all modules so integration tests and host
// applications can access the crate's public API.

pub mod config;
pub mod generate;
pub mod model;
pub mod spec;

pub use generate::{generate_teams, GenerationLoop};
pub use model::player::{Player, PlayerPool, Role};
pub use model::team::{GeneratedTeam, GenerationResult, RejectionStats};
pub use spec::{ConstraintSpec, CreditWindow, PartitionStrategy, RoleCounts, RoleTargets, SpecError};
