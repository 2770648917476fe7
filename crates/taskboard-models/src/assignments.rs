//! Assignment domain models, the status state machine and list sorting.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::PaginationParams;
use taskboard_core::serde::{
    deserialize_flexible_datetime, deserialize_optional_flexible_datetime,
    deserialize_optional_trimmed, deserialize_optional_uuid, deserialize_trimmed,
};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{AssignmentId, UserId};
use crate::users::{UserRole, UserSummary};

/// Lifecycle of an assignment: `pending → submitted → graded`.
///
/// Stored as the Postgres enum `assignment_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assignment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Submitted,
    Graded,
}

impl AssignmentStatus {
    fn rank(self) -> u8 {
        match self {
            AssignmentStatus::Pending => 0,
            AssignmentStatus::Submitted => 1,
            AssignmentStatus::Graded => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Submitted => "submitted",
            AssignmentStatus::Graded => "graded",
        }
    }

    /// Staying put or moving exactly one step forward.
    pub fn can_transition_to(self, next: AssignmentStatus) -> bool {
        next == self || next.rank() == self.rank() + 1
    }

    /// The later of the two states. Used by side effects that must never
    /// move an assignment backwards.
    pub fn advanced_to(self, target: AssignmentStatus) -> AssignmentStatus {
        if target.rank() > self.rank() {
            target
        } else {
            self
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub assigned_to: UserId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An assignment with both referenced users resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetails {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub assigned_to: UserSummary,
    pub created_by: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the assignment/users join.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRow {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub assigned_to: UserId,
    pub assigned_to_name: String,
    pub assigned_to_email: String,
    pub assigned_to_role: UserRole,
    pub created_by: UserId,
    pub created_by_name: String,
    pub created_by_email: String,
    pub created_by_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssignmentRow> for AssignmentDetails {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            status: row.status,
            assigned_to: UserSummary {
                id: row.assigned_to,
                name: row.assigned_to_name,
                email: row.assigned_to_email,
                role: row.assigned_to_role,
            },
            created_by: UserSummary {
                id: row.created_by,
                name: row.created_by_name,
                email: row.created_by_email,
                role: row.created_by_role,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    #[schema(example = "Linked lists")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 10, message = "Description must be at least 10 characters long"))]
    pub description: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[schema(value_type = String, example = "2030-06-01")]
    pub due_date: DateTime<Utc>,
    pub assigned_to: UserId,
    pub created_by: UserId,
}

/// Partial update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 10, message = "Description must be at least 10 characters long"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_flexible_datetime")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
    pub assigned_to: Option<UserId>,
}

impl UpdateAssignmentDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignmentFilterParams {
    pub status: Option<AssignmentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub assigned_to: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub created_by: Option<Uuid>,
    /// `createdAt`, `updatedAt`, `dueDate`, `title` or `status`, `-` prefix for descending
    pub sort_by: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSortField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    Status,
}

impl AssignmentSortField {
    fn column(self) -> &'static str {
        match self {
            AssignmentSortField::CreatedAt => "a.created_at",
            AssignmentSortField::UpdatedAt => "a.updated_at",
            AssignmentSortField::DueDate => "a.due_date",
            AssignmentSortField::Title => "a.title",
            AssignmentSortField::Status => "a.status",
        }
    }
}

/// A whitelisted `ORDER BY` for assignment lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentSort {
    pub field: AssignmentSortField,
    pub descending: bool,
}

impl Default for AssignmentSort {
    fn default() -> Self {
        Self {
            field: AssignmentSortField::CreatedAt,
            descending: true,
        }
    }
}

impl AssignmentSort {
    /// Parses `createdAt`, `-dueDate` and friends. `None` or an empty string
    /// yields the default `-createdAt`.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(raw) => raw,
        };

        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let field = match name {
            "createdAt" => AssignmentSortField::CreatedAt,
            "updatedAt" => AssignmentSortField::UpdatedAt,
            "dueDate" => AssignmentSortField::DueDate,
            "title" => AssignmentSortField::Title,
            "status" => AssignmentSortField::Status,
            _ => {
                return Err(format!(
                    "sortBy must be one of createdAt, updatedAt, dueDate, title, status (got `{raw}`)"
                ));
            }
        };

        Ok(Self { field, descending })
    }

    /// `ORDER BY` body. The id tiebreaker keeps pages stable.
    pub fn to_sql(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {}, a.id {}", self.field.column(), direction, direction)
    }
}
