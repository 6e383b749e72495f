use leaderboard::{
    LeaderboardService, Player, Result,
    dto::leaderboard::{NeighborhoodQuery, TopPlayersResponse},
};

/// Players around `name`, falling back to the configured window size
pub async fn get_neighborhood(
    service: &LeaderboardService,
    name: &str,
    query: &NeighborhoodQuery,
) -> Result<Vec<Player>> {
    let window = query.window.unwrap_or(service.options().default_window);
    service.get_user_rank_and_top_players(name, window).await
}

/// Top of the board together with the total number of ranked players
pub async fn get_top_players(service: &LeaderboardService, limit: u32) -> Result<TopPlayersResponse> {
    let players = service.top_players(limit).await?;
    let total = service.size().await?;

    Ok(TopPlayersResponse { total, players })
}
