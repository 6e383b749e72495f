use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Player;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    /// Amount added to the player's accumulated score, may be negative
    #[validate(range(min = -999_999, max = 999_999))]
    pub delta: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetScoreRequest {
    /// New absolute score. A Redis-backed board only stores up to 900_718;
    /// higher values are answered with 422.
    #[validate(range(min = 0, max = 999_999))]
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankResponse {
    pub name: String,
    /// 1-based position, highest score first
    pub rank: i64,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NeighborhoodQuery {
    /// Players shown on each side of the requested one
    #[validate(range(max = 100))]
    pub window: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopPlayersQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopPlayersResponse {
    pub total: u64,
    pub players: Vec<Player>,
}
