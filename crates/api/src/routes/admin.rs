//! Administrative routes.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::warn;

use crate::AppState;
use crate::response::ApiError;

/// Creates the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reset", get(reset).post(reset))
}

/// Wipes every account and tournament.
async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.engine.reset().await?;
    warn!("Ledger wiped by reset request");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{app, body_json, call};

    #[tokio::test]
    async fn test_reset_wipes_accounts_and_tournament() {
        let app = app();
        call(&app, "/fund?playerId=P1&points=100").await;
        call(&app, "/announceTournament?tournamentId=1&deposit=10").await;

        assert_eq!(call(&app, "/reset").await.0, StatusCode::OK);

        let (status, body) = call(&app, "/balance?playerId=P1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&body)["error"], "PLAYER_NOT_FOUND");
        assert_eq!(
            call(&app, "/announceTournament?tournamentId=1&deposit=10").await.0,
            StatusCode::OK
        );
    }
}
