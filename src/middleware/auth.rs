use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use taskboard_auth::{Claims, verify_token};
use taskboard_core::AppError;
use taskboard_models::users::UserRole;
use uuid::Uuid;

use crate::state::AppState;

/// The verified identity behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id()
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("No token provided, authorization denied"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that authenticates the caller and then requires one
/// of the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl $name {
            pub const ALLOWED: &'static [taskboard_models::users::UserRole] = &[$($role),+];
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = taskboard_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                $crate::middleware::role::check_any_role(auth_user.role(), Self::ALLOWED)?;

                Ok($name(auth_user))
            }
        }
    };
}

// Assignment writes and grading
require_roles!(RequireStaff, [UserRole::Teacher, UserRole::Admin]);

// Submitting work
require_roles!(RequireStudent, [UserRole::Student]);

// User deletion
require_roles!(RequireAdmin, [UserRole::Admin]);

// Submission deletion
require_roles!(
    RequireSubmissionRemover,
    [UserRole::Teacher, UserRole::Admin, UserRole::Student]
);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_auth_user_accessors() {
        let auth_user = AuthUser(claims(UserRole::Admin));
        assert!(auth_user.is_admin());
        assert_eq!(auth_user.role(), UserRole::Admin);
        assert_eq!(auth_user.email(), "test@example.com");
        assert!(auth_user.user_id().is_ok());
    }

    #[test]
    fn test_non_admin() {
        assert!(!AuthUser(claims(UserRole::Teacher)).is_admin());
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = parts_with_header(None);
        let err = bearer_token(&parts).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts).unwrap_err().status.as_u16(), 401);

        let parts = parts_with_header(Some("Bearer "));
        assert_eq!(bearer_token(&parts).unwrap_err().status.as_u16(), 401);
    }

    #[test]
    fn test_declared_role_sets() {
        assert_eq!(RequireStaff::ALLOWED, &[UserRole::Teacher, UserRole::Admin]);
        assert_eq!(RequireStudent::ALLOWED, &[UserRole::Student]);
        assert_eq!(RequireAdmin::ALLOWED, &[UserRole::Admin]);
        assert_eq!(RequireSubmissionRemover::ALLOWED.len(), 3);
    }
}
