use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{auth::jwt::AuthUser, error::AppError, favorites::services, state::AppState};

#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
}

/// Numeric `:match_id` path segment. Anything else is a 400 with the usual
/// JSON body rather than axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct MatchId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for MatchId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "bad match id");
                AppError::Validation("Invalid match id".into())
            })?;
        Ok(MatchId(id))
    }
}

pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/:match_id",
            post(add_favorite).delete(remove_favorite),
        )
}

#[instrument(skip(state))]
pub async fn list_favorites(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<i32>>, AppError> {
    services::list(&state, user_id).await.map(Json)
}

#[instrument(skip(state))]
pub async fn add_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    MatchId(match_id): MatchId,
) -> Result<Json<Ack>, AppError> {
    services::add(&state, user_id, match_id).await?;
    Ok(Json(Ack {
        message: "Added to favorites",
    }))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    MatchId(match_id): MatchId,
) -> Result<Json<Ack>, AppError> {
    services::remove(&state, user_id, match_id).await?;
    Ok(Json(Ack {
        message: "Removed from favorites",
    }))
}
