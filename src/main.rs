use anyhow::Context;
use dotenvy::dotenv;
use taskboard::logging::init_tracing;
use taskboard::metrics::{init_metrics, metrics_app};
use taskboard::router::init_router;
use taskboard::state::init_app_state;
use taskboard_config::ServerConfig;
use taskboard_core::errors::init_error_details;
use taskboard_db::run_migrations;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config)?;
    init_error_details(server_config.is_development());

    let metrics_handle = init_metrics(server_config.metrics_enabled)?;

    let state = init_app_state(server_config.clone()).await?;

    if server_config.run_migrations {
        run_migrations(&state.db)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
    }

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(
        address = %address,
        environment = %server_config.environment,
        "Server running, docs at /swagger-ui and /scalar"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
