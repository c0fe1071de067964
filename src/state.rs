use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::auth::password::Passwords;
use crate::auth::repo::{CredentialStore, PgCredentialStore};
use crate::config::AppConfig;
use crate::favorites::repo::{FavoriteStore, PgFavoriteStore};
use crate::games::catalog::{JsonFileCatalog, MatchSource};

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub passwords: Arc<Passwords>,
    pub users: Arc<dyn CredentialStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub catalog: Arc<dyn MatchSource>,
}

impl AppState {
    /// Wire the production stores around an already connected pool.
    pub fn new(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let keys = JwtKeys::from(&config.jwt);
        let passwords = Arc::new(Passwords::new(&config.password)?);
        let catalog = Arc::new(JsonFileCatalog::new(&config.catalog_path)) as Arc<dyn MatchSource>;

        Ok(Self {
            keys,
            passwords,
            users: Arc::new(PgCredentialStore::new(db.clone())) as Arc<dyn CredentialStore>,
            favorites: Arc::new(PgFavoriteStore::new(db)) as Arc<dyn FavoriteStore>,
            catalog,
        })
    }

    /// In-memory state for tests: no database, cheap hashing, a fixed catalog.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::repo::memory::MemoryCredentialStore;
        use crate::config::JwtConfig;
        use crate::favorites::repo::memory::MemoryFavoriteStore;
        use crate::games::catalog::fixture::StaticCatalog;

        let jwt = JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60 * 24,
        };

        Self {
            keys: JwtKeys::from(&jwt),
            passwords: Arc::new(crate::auth::password::cheap()),
            users: Arc::new(MemoryCredentialStore::default()),
            favorites: Arc::new(MemoryFavoriteStore::default()),
            catalog: Arc::new(StaticCatalog::sample()),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
