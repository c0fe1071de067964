use matchday::{build_app, config::AppConfig, db, serve, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "matchday=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect_with_retry(&config.database).await?;
    db::migrate(&pool).await?;

    let app = build_app(AppState::new(&config, pool.clone())?);
    serve(app, &config.host, config.port).await?;

    pool.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
