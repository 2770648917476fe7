//! Creating admin accounts outside the HTTP API.

use anyhow::{Context, anyhow};
use sqlx::PgPool;
use taskboard_core::hash_password;
use taskboard_models::UserId;
use taskboard_models::auth::RegisterRequest;
use taskboard_models::users::{UserRole, normalize_email};
use validator::Validate;

/// Inserts an admin user after applying the same rules as registration.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<UserId> {
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: normalize_email(email),
        password: password.to_string(),
        role: Some(UserRole::Admin),
    };

    if let Err(errors) = request.validate() {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid admin details".to_string());
        return Err(anyhow!(message));
    }

    let hashed_password = hash_password(&request.password).map_err(|e| e.error)?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(&hashed_password)
    .bind(UserRole::Admin)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin user")?;

    user_id.context("User already exists with this email")
}
