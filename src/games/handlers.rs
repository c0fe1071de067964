use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    games::catalog::{self, GameFilter, Match},
    state::AppState,
};

pub fn games_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/matches", get(list_matches))
}

#[instrument(skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    Query(filter): Query<GameFilter>,
) -> Result<Json<Vec<Match>>, AppError> {
    catalog::list(state.catalog.as_ref(), &filter).await.map(Json)
}

/// Unfiltered listing kept for older clients.
#[instrument(skip(state))]
pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, AppError> {
    catalog::list(state.catalog.as_ref(), &GameFilter::default())
        .await
        .map(Json)
}
