use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use taskboard_auth::create_access_token;
use taskboard_config::JwtConfig;
use taskboard_core::{AppError, hash_password, verify_password};
use taskboard_models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use taskboard_models::users::{User, normalize_email};

use crate::metrics::{track_login, track_user_registered};
use crate::modules::users::service::{USER_COLUMNS, UserService, map_email_conflict};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn register_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&dto.email);
        let role = dto.role.unwrap_or_default();

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&email)
                .fetch_one(db)
                .await?;

        if exists {
            return Err(AppError::bad_request(anyhow!(
                "User already exists with this email"
            )));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&email)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        let token = create_access_token(user.id.into_inner(), &user.email, user.role, jwt_config)?;

        track_user_registered(user.role);
        info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(AuthResponse::new(token, user))
    }

    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let Some(credentials) = UserService::find_credentials_by_email(db, &dto.email).await?
        else {
            track_login(false);
            warn!("Login attempt for unknown email");
            return Err(invalid());
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_login(false);
            warn!(user_id = %credentials.user.id, "Login attempt with wrong password");
            return Err(invalid());
        }

        let user = credentials.user;
        let token = create_access_token(user.id.into_inner(), &user.email, user.role, jwt_config)?;

        track_login(true);
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse::new(token, user))
    }
}

