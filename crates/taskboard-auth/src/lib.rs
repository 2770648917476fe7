//! # Taskboard Auth
//!
//! Access token claims and JWT utilities.
//!
//! Tokens are HS256-signed with `JWT_SECRET` and carry the user's id, email
//! and role. The role in a token is trusted until the token expires.
//!
//! ```ignore
//! use taskboard_auth::{create_access_token, verify_token};
//! use taskboard_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "t@example.com", UserRole::Teacher, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
