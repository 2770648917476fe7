use sqlx::PgPool;
use taskboard_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
use taskboard_db::init_db_pool;

/// Everything a handler needs. Built once at startup and cloned per request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
            server_config,
        }
    }
}

pub async fn init_app_state(server_config: ServerConfig) -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = init_db_pool(&database_config).await?;

    Ok(AppState::new(
        db,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        server_config,
    ))
}
