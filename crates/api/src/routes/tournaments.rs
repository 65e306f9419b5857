//! Tournament routes: announce, join and result.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};

use backer_core::ledger::Winner;
use backer_shared::{PlayerId, Points, TournamentId};

use crate::AppState;
use crate::extractors::{player_id, player_ids, rejection, single_parsed};
use crate::response::ApiError;

/// Creates the tournament routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/announceTournament", get(announce).post(announce))
        .route("/joinTournament", get(join).post(join))
        .route("/resultTournament", get(result).post(result))
}

/// Query parameters for announceTournament.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceQuery {
    /// Tournament id; must appear once.
    #[serde(default)]
    pub tournament_id: Vec<String>,
    /// Entry deposit; must appear once.
    #[serde(default)]
    pub deposit: Vec<String>,
}

/// Query parameters for joinTournament.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinQuery {
    /// Tournament id; must appear once.
    #[serde(default)]
    pub tournament_id: Vec<String>,
    /// Joining player; must appear once.
    #[serde(default)]
    pub player_id: Vec<String>,
    /// Backers, repeated once per backer.
    #[serde(default)]
    pub backer_id: Vec<String>,
}

/// One entry of the result array; empty array when nothing was settled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WinnerResponse {
    /// The winning player.
    pub player_id: PlayerId,
    /// Total pot.
    pub prize: Points,
}

impl From<Winner> for WinnerResponse {
    fn from(winner: Winner) -> Self {
        Self {
            player_id: winner.player_id,
            prize: winner.prize,
        }
    }
}

async fn announce(
    State(state): State<AppState>,
    query: Result<Query<AnnounceQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query.map_err(|e| rejection(&e))?;
    let tour_id: TournamentId = single_parsed(&query.tournament_id, "tournamentId")?;
    let deposit = single_parsed(&query.deposit, "deposit")?;

    state.engine.announce_tournament(tour_id, deposit).await?;
    Ok(StatusCode::OK)
}

async fn join(
    State(state): State<AppState>,
    query: Result<Query<JoinQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query.map_err(|e| rejection(&e))?;
    let tour_id: TournamentId = single_parsed(&query.tournament_id, "tournamentId")?;
    let player = player_id(&query.player_id, "playerId")?;
    let backers = player_ids(&query.backer_id, "backerId")?;

    state
        .engine
        .join_tournament(tour_id, &player, &backers)
        .await?;
    Ok(StatusCode::OK)
}

async fn result(State(state): State<AppState>) -> Result<Json<Vec<WinnerResponse>>, ApiError> {
    let winners = state.engine.result_tournament().await?;
    Ok(Json(winners.into_iter().map(WinnerResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{app, body_json, call, call_with};

    async fn balance(app: &axum::Router, player: &str) -> serde_json::Value {
        let (_, body) = call(app, &format!("/balance?playerId={player}")).await;
        body_json(&body)["Balance"].clone()
    }

    #[tokio::test]
    async fn test_backed_tournament_flow() {
        let app = app();
        for (player, points) in [("P1", 300), ("P2", 300), ("P3", 300), ("P4", 500), ("P5", 1000)] {
            let uri = format!("/fund?playerId={player}&points={points}");
            assert_eq!(call(&app, &uri).await.0, StatusCode::OK);
        }

        assert_eq!(
            call(&app, "/announceTournament?tournamentId=1&deposit=1000").await.0,
            StatusCode::OK
        );
        assert_eq!(
            call(&app, "/joinTournament?tournamentId=1&playerId=P5").await.0,
            StatusCode::OK
        );
        assert_eq!(
            call_with(
                &app,
                "POST",
                "/joinTournament?tournamentId=1&playerId=P1&backerId=P2&backerId=P3&backerId=P4"
            )
            .await
            .0,
            StatusCode::OK
        );

        assert_eq!(balance(&app, "P1").await, 50);
        assert_eq!(balance(&app, "P4").await, 250);
        assert_eq!(balance(&app, "P5").await, 0);

        let (status, body) = call(&app, "/resultTournament").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(&body),
            json!([{ "PlayerId": "P1", "Prize": 2000 }])
        );
        assert_eq!(balance(&app, "P1").await, 550);
        assert_eq!(balance(&app, "P4").await, 750);
    }

    #[tokio::test]
    async fn test_result_without_tournament_is_empty() {
        let (status, body) = call(&app(), "/resultTournament").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(&body), json!([]));
    }

    #[tokio::test]
    async fn test_announce_twice() {
        let app = app();
        call(&app, "/announceTournament?tournamentId=42&deposit=1000").await;

        let (status, body) = call(&app, "/announceTournament?tournamentId=42&deposit=1000").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "TOURNAMENT_ALREADY_ANNOUNCED");
    }

    #[tokio::test]
    async fn test_join_with_unknown_backer() {
        let app = app();
        call(&app, "/fund?playerId=P1&points=300").await;
        call(&app, "/announceTournament?tournamentId=1&deposit=1000").await;

        let (status, body) =
            call(&app, "/joinTournament?tournamentId=1&playerId=P1&backerId=ghost").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "INVALID_QUERY_RESULT");
    }

    #[tokio::test]
    async fn test_join_parameter_validation() {
        let app = app();
        for uri in [
            "/joinTournament?playerId=P1",
            "/joinTournament?tournamentId=x&playerId=P1",
            "/joinTournament?tournamentId=1&tournamentId=2&playerId=P1",
            "/joinTournament?tournamentId=1&playerId=P1&backerId=",
            "/announceTournament?tournamentId=1",
            "/announceTournament?tournamentId=1&deposit=1e3",
        ] {
            let (status, body) = call(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body_json(&body)["error"], "VALIDATION_ERROR");
        }
    }
}
