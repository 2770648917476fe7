//! Authentication and authorization extractors.
//!
//! - [`auth`]: [`AuthUser`](auth::AuthUser) verifies the bearer token, and the
//!   role extractors generated by `require_roles!` gate a handler to a fixed
//!   set of roles
//! - [`role`]: the role policy those extractors apply
//!
//! Extractors run in argument order, so a handler declared as
//!
//! ```ignore
//! async fn create(
//!     State(state): State<AppState>,
//!     RequireStaff(auth_user): RequireStaff,
//!     ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
//! )
//! ```
//!
//! answers 401 for a bad token, then 403 for a wrong role, and only then 400
//! for a bad body.

pub mod auth;
pub mod role;
