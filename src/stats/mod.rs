pub mod handlers;
pub mod killscore;
pub mod repository;
pub mod service;

mod errors;
pub mod models;

pub use errors::StatsError;
pub use handlers::routes;
pub use killscore::{compute_killscore, normalize_cause};
pub use models::*;
pub use repository::{InMemoryStatsRepository, PostgresStatsRepository, StatsRepository};
pub use service::{KillscoreRecompute, PlayerStatsService};
