pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod favorites;
pub mod games;
pub mod state;
pub mod view;

pub use app::{build_app, serve};
pub use state::AppState;
