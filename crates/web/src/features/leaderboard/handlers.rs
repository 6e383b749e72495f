use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use leaderboard::{
    LeaderboardService,
    dto::leaderboard::{
        NeighborhoodQuery, RankResponse, ScoreResponse, SetScoreRequest, SubmitScoreRequest,
        TopPlayersQuery, TopPlayersResponse,
    },
    models::Player,
};
use validator::Validate;

use crate::error::ApiResult;

use super::services;

#[utoipa::path(
    post,
    path = "/api/players/{name}/score",
    params(
        ("name" = String, Path, description = "Player name")
    ),
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score accumulated", body = ScoreResponse),
        (status = 400, description = "Invalid name or delta"),
        (status = 409, description = "Too many concurrent updates to this player"),
        (status = 422, description = "Resulting score does not fit the leaderboard key")
    ),
    tag = "players"
)]
pub async fn submit_score(
    State(service): State<LeaderboardService>,
    Path(name): Path<String>,
    Json(payload): Json<SubmitScoreRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let score = service.update_score(payload.delta, &name).await?;

    Ok(Json(ScoreResponse { name, score }).into_response())
}

#[utoipa::path(
    put,
    path = "/api/players/{name}/score",
    params(
        ("name" = String, Path, description = "Player name")
    ),
    request_body = SetScoreRequest,
    responses(
        (status = 200, description = "Score replaced", body = ScoreResponse),
        (status = 400, description = "Invalid name or score")
    ),
    tag = "players"
)]
pub async fn set_score(
    State(service): State<LeaderboardService>,
    Path(name): Path<String>,
    Json(payload): Json<SetScoreRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    service.set_score(&name, payload.score).await?;

    Ok(Json(ScoreResponse {
        name,
        score: payload.score,
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{name}",
    params(
        ("name" = String, Path, description = "Player name")
    ),
    responses(
        (status = 200, description = "Player found", body = Player),
        (status = 404, description = "Player has no score yet")
    ),
    tag = "players"
)]
pub async fn get_player(
    State(service): State<LeaderboardService>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let player = service.get_player(&name).await?;

    Ok(Json(player).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{name}/rank",
    params(
        ("name" = String, Path, description = "Player name")
    ),
    responses(
        (status = 200, description = "Rank retrieved", body = RankResponse),
        (status = 404, description = "Player has no score yet")
    ),
    tag = "players"
)]
pub async fn get_rank(
    State(service): State<LeaderboardService>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let rank = service.get_user_rank(&name).await?;

    Ok(Json(RankResponse { name, rank }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{name}/neighborhood",
    params(
        ("name" = String, Path, description = "Player name"),
        NeighborhoodQuery
    ),
    responses(
        (status = 200, description = "Players ranked around the requested one", body = Vec<Player>),
        (status = 400, description = "Invalid window"),
        (status = 404, description = "Player has no score yet")
    ),
    tag = "players"
)]
pub async fn get_neighborhood(
    State(service): State<LeaderboardService>,
    Path(name): Path<String>,
    Query(query): Query<NeighborhoodQuery>,
) -> ApiResult<Response> {
    query.validate()?;

    let players = services::get_neighborhood(&service, &name, &query).await?;

    Ok(Json(players).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(TopPlayersQuery),
    responses(
        (status = 200, description = "Top of the leaderboard", body = TopPlayersResponse),
        (status = 400, description = "Invalid limit")
    ),
    tag = "leaderboard"
)]
pub async fn get_top_players(
    State(service): State<LeaderboardService>,
    Query(query): Query<TopPlayersQuery>,
) -> ApiResult<Response> {
    query.validate()?;

    let response = services::get_top_players(&service, query.limit).await?;

    Ok(Json(response).into_response())
}
