//! Account routes: fund, take and balance.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};
use tracing::info;

use backer_shared::{PlayerId, Points};

use crate::AppState;
use crate::extractors::{player_id, rejection, single_parsed};
use crate::response::ApiError;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fund", get(fund).post(fund))
        .route("/take", get(take).post(take))
        .route("/balance", get(balance).post(balance))
}

/// Query parameters for fund and take.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsQuery {
    /// Player id; must appear once.
    #[serde(default)]
    pub player_id: Vec<String>,
    /// Points; must appear once.
    #[serde(default)]
    pub points: Vec<String>,
}

/// Query parameters for balance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    /// Player id; must appear once.
    #[serde(default)]
    pub player_id: Vec<String>,
}

/// Balance response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceResponse {
    /// Player id.
    pub player_id: PlayerId,
    /// Current points.
    pub balance: Points,
}

async fn fund(
    State(state): State<AppState>,
    query: Result<Query<PointsQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query.map_err(|e| rejection(&e))?;
    let player = player_id(&query.player_id, "playerId")?;
    let points = single_parsed(&query.points, "points")?;

    state.engine.fund(&player, points).await?;
    info!(player_id = %player, points, "Funded");
    Ok(StatusCode::OK)
}

async fn take(
    State(state): State<AppState>,
    query: Result<Query<PointsQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query.map_err(|e| rejection(&e))?;
    let player = player_id(&query.player_id, "playerId")?;
    let points = single_parsed(&query.points, "points")?;

    state.engine.take(&player, points).await?;
    info!(player_id = %player, points, "Took");
    Ok(StatusCode::OK)
}

async fn balance(
    State(state): State<AppState>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let Query(query) = query.map_err(|e| rejection(&e))?;
    let player = player_id(&query.player_id, "playerId")?;

    let balance = state.engine.balance(&player).await?;
    Ok(Json(BalanceResponse {
        player_id: player,
        balance,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use crate::test_support::{app, body_json, call, call_with, send};

    #[tokio::test]
    async fn test_fund_then_balance() {
        let app = app();
        assert_eq!(call(&app, "/fund?playerId=Joe&points=100").await.0, StatusCode::OK);
        assert_eq!(
            call_with(&app, "POST", "/fund?playerId=Joe&points=400").await.0,
            StatusCode::OK
        );

        let (status, body) = call(&app, "/balance?playerId=Joe").await;
        assert_eq!(status, StatusCode::OK);
        let json = body_json(&body);
        assert_eq!(json, serde_json::json!({ "PlayerId": "Joe", "Balance": 500 }));
    }

    #[tokio::test]
    async fn test_take_all_points_fails() {
        let app = app();
        call(&app, "/fund?playerId=P1&points=500").await;

        let (status, body) = call(&app, "/take?playerId=P1&points=500").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "INSUFFICIENT_FUNDS");

        assert_eq!(call(&app, "/take?playerId=P1&points=300").await.0, StatusCode::OK);
        let (_, body) = call(&app, "/balance?playerId=P1").await;
        assert_eq!(body_json(&body)["Balance"], 200);
    }

    #[tokio::test]
    async fn test_balance_unknown_player() {
        let (status, body) = send("/balance?playerId=ghost").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "PLAYER_NOT_FOUND");
    }

    #[rstest]
    #[case("/fund?points=10")]
    #[case("/fund?playerId=P1")]
    #[case("/fund?playerId=P1&points=ten")]
    #[case("/fund?playerId=P1&points=10&points=20")]
    #[case("/fund?playerId=P1&playerId=P2&points=10")]
    #[case("/take?playerId=&points=10")]
    #[case("/balance")]
    #[case("/balance?playerId=P1&playerId=P1")]
    #[tokio::test]
    async fn test_invalid_parameters_are_rejected(#[case] uri: &str) {
        let app = app();
        let (status, body) = call(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&body)["error"], "VALIDATION_ERROR");

        // Nothing reached the engine
        let (status, _) = call(&app, "/balance?playerId=P1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_non_positive_fund_is_an_engine_error() {
        let (status, body) = send("/fund?playerId=P1&points=0").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "INVALID_AMOUNT");
    }
}
