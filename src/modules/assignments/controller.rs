use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use taskboard_core::{AppError, Paginated};
use taskboard_models::assignments::{
    Assignment, AssignmentDetails, AssignmentFilterParams, CreateAssignmentDto,
    UpdateAssignmentDto,
};
use taskboard_models::responses::{ApiResponse, MessageResponse};

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created with status pending", body = ApiResponse<AssignmentDetails>),
        (status = 400, description = "Invalid input, or assignee is not a student"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Teacher or admin role required"),
        (status = 404, description = "Referenced user not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentDetails>>), AppError> {
    tracing::debug!(requested_by = %staff.email(), "Creating assignment");
    let assignment = AssignmentService::create_assignment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(assignment))))
}

#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentFilterParams),
    responses(
        (status = 200, description = "Paginated assignments", body = Paginated<AssignmentDetails>),
        (status = 400, description = "Invalid filter or sort"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_assignments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(filters): ValidatedQuery<AssignmentFilterParams>,
) -> Result<Json<Paginated<AssignmentDetails>>, AppError> {
    let assignments = AssignmentService::list_assignments(&state.db, filters).await?;
    Ok(Json(assignments))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = ApiResponse<AssignmentDetails>),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_assignment(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<AssignmentDetails>>, AppError> {
    let assignment = AssignmentService::get_assignment(&state.db, id).await?;
    Ok(Json(ApiResponse::new(assignment)))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = ApiResponse<AssignmentDetails>),
        (status = 400, description = "Invalid input or status transition"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Teacher or admin role required"),
        (status = 404, description = "Assignment or referenced user not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _staff))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<ApiResponse<AssignmentDetails>>, AppError> {
    let assignment = AssignmentService::update_assignment(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::new(assignment)))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = MessageResponse<Assignment>),
        (status = 400, description = "Invalid ID format"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Teacher or admin role required"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _staff))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse<Assignment>>, AppError> {
    let assignment = AssignmentService::delete_assignment(&state.db, id).await?;
    Ok(Json(MessageResponse::new(
        "Assignment deleted successfully",
        assignment,
    )))
}
