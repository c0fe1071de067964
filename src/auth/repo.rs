use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::repo_types::User, db::RepoError};

/// Persistent user identity records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;
    /// Insert a user. A taken email surfaces as `RepoError::Duplicate`.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User, RepoError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let found: Option<(Uuid,)> = sqlx::query_as(r#"SELECT id FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::{collections::HashMap, sync::Mutex};

    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    pub struct MemoryCredentialStore {
        users: Mutex<HashMap<Uuid, User>>,
    }

    impl MemoryCredentialStore {
        pub fn delete(&self, id: Uuid) {
            self.users.lock().unwrap().remove(&id);
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
            Ok(self.users.lock().unwrap().contains_key(&id))
        }

        async fn create(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
        ) -> Result<User, RepoError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == email) {
                return Err(RepoError::Duplicate);
            }
            let user = User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }
    }
}
