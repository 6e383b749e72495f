pub mod clock;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::{EncodingError, LeaderboardError, Result};
pub use models::{Player, PlayerName};
pub use repository::{InMemoryRankStore, RankStore, RedisRankStore, ScoredMember};
pub use services::leaderboard::{LeaderboardService, ServiceOptions};
