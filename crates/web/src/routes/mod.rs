use axum::Router;
use leaderboard::LeaderboardService;

use crate::features;

pub fn router(service: LeaderboardService) -> Router {
    Router::new()
        .nest("/api", features::leaderboard::routes::routes())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use async_trait::async_trait;
    use leaderboard::{InMemoryRankStore, LeaderboardError, RankStore, ScoredMember, ServiceOptions};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let store = Arc::new(InMemoryRankStore::new());
        router(LeaderboardService::new(store, ServiceOptions::default()))
    }

    struct UnreachableStore;

    fn refused<T>(operation: &'static str) -> leaderboard::Result<T> {
        Err(LeaderboardError::store(
            operation,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        ))
    }

    #[async_trait]
    impl RankStore for UnreachableStore {
        async fn get_score(&self, _member: &str) -> leaderboard::Result<Option<i64>> {
            refused("ZSCORE")
        }

        async fn upsert(&self, _member: &str, _key: i64) -> leaderboard::Result<()> {
            refused("ZADD")
        }

        async fn compare_and_upsert(
            &self,
            _member: &str,
            _expected: Option<i64>,
            _key: i64,
        ) -> leaderboard::Result<bool> {
            refused("EVALSHA compare_and_upsert")
        }

        async fn reverse_rank(&self, _member: &str) -> leaderboard::Result<Option<u64>> {
            refused("ZREVRANK")
        }

        async fn reverse_range_with_scores(
            &self,
            _start: u64,
            _stop: u64,
        ) -> leaderboard::Result<Vec<ScoredMember>> {
            refused("ZREVRANGE")
        }

        async fn len(&self) -> leaderboard::Result<u64> {
            refused("ZCARD")
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn test_submit_then_rank() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/players/alice/score", Some(json!({ "delta": 10 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 10);

        let (_, body) = send(&app, "POST", "/api/players/alice/score", Some(json!({ "delta": 5 }))).await;
        assert_eq!(body["score"], 15);

        let (status, body) = send(&app, "GET", "/api/players/alice/rank", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "alice", "rank": 1 }));
    }

    #[tokio::test]
    async fn test_unknown_player_is_404() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/players/ghost/rank", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, "GET", "/api/players/ghost/neighborhood", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_overflowing_score_is_422() {
        let app = app();

        send(&app, "PUT", "/api/players/max/score", Some(json!({ "score": 999_999 }))).await;
        let (status, _) = send(&app, "POST", "/api/players/max/score", Some(json!({ "delta": 1 }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_out_of_range_delta_fails_validation() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/players/alice/score",
            Some(json!({ "delta": 5_000_000 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
    }

    #[tokio::test]
    async fn test_neighborhood_and_top_players() {
        let app = app();

        for (name, delta) in [("a", 300), ("b", 200), ("c", 100)] {
            send(&app, "POST", &format!("/api/players/{}/score", name), Some(json!({ "delta": delta }))).await;
        }

        let (status, body) = send(&app, "GET", "/api/players/c/neighborhood?window=1", None).await;
        assert_eq!(status, StatusCode::OK);
        let players = body.as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["name"], "b");
        assert_eq!(players[0]["rank"], 2);
        assert_eq!(players[1]["score"], 100);

        let (status, body) = send(&app, "GET", "/api/leaderboard?limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["players"][0]["name"], "a");
        assert_eq!(body["players"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_503() {
        let app = router(LeaderboardService::new(
            Arc::new(UnreachableStore),
            ServiceOptions::default(),
        ));
        let unavailable = json!({ "error": "The leaderboard store is unavailable" });

        let (status, body) = send(&app, "POST", "/api/players/alice/score", Some(json!({ "delta": 1 }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, unavailable);

        let (status, body) = send(&app, "GET", "/api/players/alice/rank", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, unavailable);

        let (status, body) = send(&app, "GET", "/api/players/alice/neighborhood", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, unavailable);
    }
}
