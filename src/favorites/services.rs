use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// The token can outlive the user row it names; treat that as a data anomaly.
async fn ensure_user(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    if state.users.exists(user_id).await? {
        Ok(())
    } else {
        warn!(%user_id, "token refers to a missing user");
        Err(AppError::NotFound)
    }
}

pub async fn list(state: &AppState, user_id: Uuid) -> Result<Vec<i32>, AppError> {
    ensure_user(state, user_id).await?;
    let ids = state.favorites.list(user_id).await?;
    debug!(%user_id, count = ids.len(), "favorites listed");
    Ok(ids)
}

pub async fn add(state: &AppState, user_id: Uuid, match_id: i32) -> Result<(), AppError> {
    ensure_user(state, user_id).await?;
    state.favorites.add(user_id, match_id).await?;
    debug!(%user_id, match_id, "favorite added");
    Ok(())
}

pub async fn remove(state: &AppState, user_id: Uuid, match_id: i32) -> Result<(), AppError> {
    ensure_user(state, user_id).await?;
    state.favorites.remove(user_id, match_id).await?;
    debug!(%user_id, match_id, "favorite removed");
    Ok(())
}
