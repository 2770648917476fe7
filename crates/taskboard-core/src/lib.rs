//! # Taskboard Core
//!
//! Foundational types shared by every Taskboard crate:
//!
//! - [`errors`]: the [`AppError`] type and its JSON rendering
//! - [`pagination`]: page/limit query parameters and the list envelope
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: deserialization helpers for ids and dates

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{Paginated, PaginationParams};
pub use password::{hash_password, verify_password};
