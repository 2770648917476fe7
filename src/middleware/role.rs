//! Role policy.
//!
//! A route declares the roles allowed to call it; a caller whose token role
//! is outside that set gets 403, which is distinct from the 401 returned for
//! a missing or bad token.

use taskboard_core::AppError;
use taskboard_models::users::UserRole;
use tracing::warn;

use crate::metrics::track_authorization_check;

pub fn has_any_role(role: UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(&role)
}

pub fn check_any_role(role: UserRole, allowed: &[UserRole]) -> Result<(), AppError> {
    let permitted = has_any_role(role, allowed);
    track_authorization_check(permitted, role);

    if permitted {
        return Ok(());
    }

    let required = allowed
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    warn!(role = %role, required = %required, "Role not permitted");

    Err(AppError::forbidden(format!(
        "User role {role} is not authorized to access this route"
    )))
}
