//! Submission domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::PaginationParams;
use taskboard_core::serde::{deserialize_optional_uuid, deserialize_trimmed};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::assignments::AssignmentStatus;
use crate::ids::{AssignmentId, SubmissionId, UserId};
use crate::users::{UserRole, UserSummary};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

pub fn is_valid_grade(grade: f64) -> bool {
    grade.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&grade)
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub content: String,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub is_late: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: AssignmentId,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
}

/// A submission with its assignment and student resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetails {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub assignment: AssignmentSummary,
    pub student: UserSummary,
    pub content: String,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub is_late: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the submission/assignment/student join.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub assignment_title: String,
    pub assignment_due_date: DateTime<Utc>,
    pub assignment_status: AssignmentStatus,
    pub student_id: UserId,
    pub student_name: String,
    pub student_email: String,
    pub student_role: UserRole,
    pub content: String,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub is_late: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubmissionRow> for SubmissionDetails {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            assignment_id: row.assignment_id,
            student_id: row.student_id,
            assignment: AssignmentSummary {
                id: row.assignment_id,
                title: row.assignment_title,
                due_date: row.assignment_due_date,
                status: row.assignment_status,
            },
            student: UserSummary {
                id: row.student_id,
                name: row.student_name,
                email: row.student_email,
                role: row.student_role,
            },
            content: row.content,
            submission_date: row.submission_date,
            grade: row.grade,
            feedback: row.feedback,
            is_late: row.is_late,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionDto {
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 10, message = "Content must be at least 10 characters long"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    #[validate(range(min = 0.0, max = 100.0, message = "Grade must be between 0 and 100"))]
    #[schema(example = 95)]
    pub grade: f64,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 5, message = "Feedback must be at least 5 characters long"))]
    #[schema(example = "Great work")]
    pub feedback: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubmissionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
