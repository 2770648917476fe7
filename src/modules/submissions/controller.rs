use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use taskboard_core::{AppError, Paginated, PaginationParams};
use taskboard_models::responses::{ApiResponse, MessageResponse};
use taskboard_models::submissions::{
    CreateSubmissionDto, GradeSubmissionDto, Submission, SubmissionDetails,
    SubmissionFilterParams,
};
use taskboard_models::users::UserRole;

use crate::middleware::auth::{AuthUser, RequireStaff, RequireStudent, RequireSubmissionRemover};
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission recorded and assignment marked submitted", body = ApiResponse<SubmissionDetails>),
        (status = 400, description = "Invalid input or duplicate submission"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Student role required"),
        (status = 404, description = "Assignment or student not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student))]
pub async fn create_submission(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionDetails>>), AppError> {
    tracing::debug!(submitted_by = %student.email(), "Creating submission");
    let submission = SubmissionService::create_submission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(submission))))
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    params(SubmissionFilterParams),
    responses(
        (status = 200, description = "Paginated submissions, newest first", body = Paginated<SubmissionDetails>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_submissions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(filters): ValidatedQuery<SubmissionFilterParams>,
) -> Result<Json<Paginated<SubmissionDetails>>, AppError> {
    let submissions = SubmissionService::list_submissions(&state.db, filters).await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/assignment/{assignment_id}",
    params(
        ("assignment_id" = Uuid, Path, description = "Assignment ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Paginated submissions for the assignment", body = Paginated<SubmissionDetails>),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_submissions_by_assignment(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(assignment_id): ValidatedPath<Uuid>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationParams>,
) -> Result<Json<Paginated<SubmissionDetails>>, AppError> {
    let submissions =
        SubmissionService::list_by_assignment(&state.db, assignment_id, pagination).await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission details", body = ApiResponse<SubmissionDetails>),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_submission(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<SubmissionDetails>>, AppError> {
    let submission = SubmissionService::get_submission(&state.db, id).await?;
    Ok(Json(ApiResponse::new(submission)))
}

#[utoipa::path(
    put,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded and assignment marked graded", body = MessageResponse<SubmissionDetails>),
        (status = 400, description = "Grade out of range or invalid feedback"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Teacher or admin role required"),
        (status = 404, description = "Submission not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, grader))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireStaff(grader): RequireStaff,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<MessageResponse<SubmissionDetails>>, AppError> {
    tracing::debug!(graded_by = %grader.email(), "Grading submission");
    let submission = SubmissionService::grade_submission(&state.db, id, dto).await?;
    Ok(Json(MessageResponse::new(
        "Submission graded successfully",
        submission,
    )))
}

/// Teachers and admins may delete any submission. Students may only delete
/// their own.
#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission deleted", body = MessageResponse<Submission>),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to delete this submission"),
        (status = 404, description = "Submission not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, remover))]
pub async fn delete_submission(
    State(state): State<AppState>,
    RequireSubmissionRemover(remover): RequireSubmissionRemover,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse<Submission>>, AppError> {
    if remover.role() == UserRole::Student {
        let existing = SubmissionService::find_submission(&state.db, id).await?;
        if existing.student_id.into_inner() != remover.user_id()? {
            return Err(AppError::forbidden(
                "You can only delete your own submissions",
            ));
        }
    }

    let submission = SubmissionService::delete_submission(&state.db, id).await?;
    Ok(Json(MessageResponse::new(
        "Submission deleted successfully",
        submission,
    )))
}
