use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use taskboard_core::PaginationParams;
use taskboard_models::assignments::{
    Assignment, AssignmentDetails, AssignmentFilterParams, AssignmentStatus, CreateAssignmentDto,
    UpdateAssignmentDto,
};
use taskboard_models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use taskboard_models::submissions::{
    AssignmentSummary, CreateSubmissionDto, GradeSubmissionDto, Submission, SubmissionDetails,
    SubmissionFilterParams,
};
use taskboard_models::users::{UpdateUserDto, User, UserFilterParams, UserRole, UserSummary};

use crate::modules::health::controller::{
    EndpointMap, HealthResponse, RouteNotFound, WelcomeResponse,
};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Assignment not found")]
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::welcome,
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::get_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::submissions::controller::create_submission,
        crate::modules::submissions::controller::get_submissions,
        crate::modules::submissions::controller::get_submissions_by_assignment,
        crate::modules::submissions::controller::get_submission,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::submissions::controller::delete_submission,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserSummary,
            UpdateUserDto,
            UserFilterParams,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            Assignment,
            AssignmentStatus,
            AssignmentDetails,
            AssignmentSummary,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            AssignmentFilterParams,
            Submission,
            SubmissionDetails,
            CreateSubmissionDto,
            GradeSubmissionDto,
            SubmissionFilterParams,
            PaginationParams,
            ErrorResponse,
            WelcomeResponse,
            EndpointMap,
            HealthResponse,
            RouteNotFound,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service banner and liveness"),
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "User management endpoints"),
        (name = "Assignments", description = "Assignment lifecycle endpoints"),
        (name = "Submissions", description = "Submission and grading endpoints")
    ),
    info(
        title = "Taskboard API",
        version = "0.1.0",
        description = "Role-based assignment and grading backend built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
