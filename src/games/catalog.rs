use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;

/// Selector value that disables a filter.
pub const ALL: &str = "All";

/// A fixture from the externally supplied catalog. Only the fields used for
/// filtering are required; everything else is passed through as supplied,
/// including keys this service does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i32,
    pub sport: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GameFilter {
    pub sport: Option<String>,
    pub provider: Option<String>,
}

fn selects(filter: Option<&str>, value: &str) -> bool {
    match filter {
        None | Some(ALL) => true,
        Some(wanted) => wanted == value,
    }
}

impl GameFilter {
    pub fn matches(&self, game: &Match) -> bool {
        selects(self.sport.as_deref(), &game.sport)
            && selects(self.provider.as_deref(), &game.provider)
    }

    pub fn apply(&self, games: Vec<Match>) -> Vec<Match> {
        games.into_iter().filter(|g| self.matches(g)).collect()
    }
}

/// Read-only source of the full catalog.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<Match>>;
}

/// Catalog backed by a JSON array on disk. The file is read on every call so
/// edits show up without a restart.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MatchSource for JsonFileCatalog {
    async fn load(&self) -> anyhow::Result<Vec<Match>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("read catalog {}", self.path.display()))?;
        let games: Vec<Match> = serde_json::from_slice(&raw)
            .with_context(|| format!("parse catalog {}", self.path.display()))?;
        debug!(count = games.len(), "catalog loaded");
        Ok(games)
    }
}

pub async fn list(source: &dyn MatchSource, filter: &GameFilter) -> Result<Vec<Match>, AppError> {
    let games = source.load().await.map_err(AppError::CatalogUnavailable)?;
    Ok(filter.apply(games))
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;

    pub fn game(id: i32, sport: &str, provider: &str) -> Match {
        Match {
            id,
            sport: sport.into(),
            provider: provider.into(),
            league: Some(format!("{sport} League")),
            team_a: Some(format!("Home {id}")),
            team_b: Some(format!("Away {id}")),
            start_time: Some("2025-11-08T17:30:00Z".into()),
            image: Some(format!("https://img.example.com/{id}.jpg")),
            extra: Map::new(),
        }
    }

    pub struct StaticCatalog(pub Vec<Match>);

    impl StaticCatalog {
        pub fn sample() -> Self {
            Self(vec![
                game(1, "Football", "SkySports"),
                game(2, "Basketball", "ESPN"),
                game(3, "Football", "ESPN"),
                game(4, "Tennis", "SkySports"),
            ])
        }
    }

    #[async_trait]
    impl MatchSource for StaticCatalog {
        async fn load(&self) -> anyhow::Result<Vec<Match>> {
            Ok(self.0.clone())
        }
    }
}
