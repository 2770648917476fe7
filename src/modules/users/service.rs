use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use taskboard_core::{AppError, Paginated, hash_password};
use taskboard_models::users::{
    UpdateUserDto, User, UserCredentials, UserFilterParams, normalize_email,
};

pub(crate) const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

pub(crate) fn user_not_found() -> AppError {
    AppError::not_found(anyhow!("User not found"))
}

pub(crate) fn map_email_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow!("User already exists with this email"));
    }
    AppError::from(err)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &UserFilterParams) {
    builder.push(" WHERE 1 = 1");
    if let Some(role) = filters.role {
        builder.push(" AND role = ").push_bind(role);
    }
}

pub struct UserService;

impl UserService {
    #[instrument]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Self::find_by_id(db, id).await?.ok_or_else(user_not_found)
    }

    #[instrument]
    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await?;

        Ok(credentials)
    }

    #[instrument]
    pub async fn list_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<Paginated<User>, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = data_query.build_query_as::<User>().fetch_all(db).await?;

        Ok(Paginated::new(users, total, &filters.pagination))
    }

    /// Applies the present fields. Callers decide who may change what.
    #[instrument(skip(dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        if dto.is_empty() {
            return Self::get_user(db, id).await;
        }

        let password_hash = match dto.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");
        if let Some(name) = dto.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(email) = dto.email {
            builder.push(", email = ").push_bind(normalize_email(&email));
        }
        if let Some(hash) = password_hash {
            builder.push(", password = ").push_bind(hash);
        }
        if let Some(role) = dto.role {
            builder.push(", role = ").push_bind(role);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        let user = builder
            .build_query_as::<User>()
            .fetch_optional(db)
            .await
            .map_err(map_email_conflict)?
            .ok_or_else(user_not_found)?;

        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    #[instrument]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(user_not_found)?;

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }
}
