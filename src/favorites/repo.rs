use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::RepoError;

/// Persistent (user, match) favorites. Both writes are idempotent.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn list(&self, user_id: Uuid) -> Result<Vec<i32>, RepoError>;
    async fn add(&self, user_id: Uuid, match_id: i32) -> Result<(), RepoError>;
    async fn remove(&self, user_id: Uuid, match_id: i32) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgFavoriteStore {
    db: PgPool,
}

impl PgFavoriteStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<i32>, RepoError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT match_id
              FROM favorites
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn add(&self, user_id: Uuid, match_id: i32) -> Result<(), RepoError> {
        // Concurrent duplicates are absorbed by UNIQUE (user_id, match_id).
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, match_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, match_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(match_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, match_id: i32) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM favorites WHERE user_id = $1 AND match_id = $2"#)
            .bind(user_id)
            .bind(match_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
