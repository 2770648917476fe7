//! # Taskboard Models
//!
//! Domain models and DTOs shared by the API server and the CLI.
//!
//! - [`ids`]: typed UUID wrappers
//! - [`users`]: users, roles and profile updates
//! - [`auth`]: register/login payloads
//! - [`assignments`]: assignments, their status machine and list sorting
//! - [`submissions`]: submissions and grading
//! - [`responses`]: `{ success, data }` envelopes

pub mod assignments;
pub mod auth;
pub mod ids;
pub mod responses;
pub mod submissions;
pub mod users;

pub use ids::{AssignmentId, SubmissionId, UserId};
