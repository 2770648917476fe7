//! Registration and login DTOs.

use serde::{Deserialize, Serialize};
use taskboard_core::serde::deserialize_trimmed;
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{User, UserRole};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    #[schema(example = "Grace Hopper")]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "grace@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "password123")]
    pub password: String,
    /// Defaults to `student`
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

impl AuthResponse {
    pub fn new(token: String, user: User) -> Self {
        Self {
            success: true,
            token,
            user,
        }
    }
}
