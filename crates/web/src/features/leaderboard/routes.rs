use axum::{
    Router,
    routing::{get, post},
};
use leaderboard::LeaderboardService;

use super::handlers::{
    get_neighborhood, get_player, get_rank, get_top_players, set_score, submit_score,
};

pub fn routes() -> Router<LeaderboardService> {
    Router::new()
        .route("/leaderboard", get(get_top_players))
        .route("/players/:name", get(get_player))
        .route("/players/:name/score", post(submit_score).put(set_score))
        .route("/players/:name/rank", get(get_rank))
        .route("/players/:name/neighborhood", get(get_neighborhood))
}
