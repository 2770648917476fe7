use axum::{
    Json,
    http::{Method, StatusCode, Uri},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointMap {
    pub auth: &'static str,
    pub users: &'static str,
    pub assignments: &'static str,
    pub submissions: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub documentation: EndpointMap,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteNotFound {
    pub message: &'static str,
    pub path: String,
    pub method: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner and endpoint map", body = WelcomeResponse)),
    tag = "Health"
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Taskboard API",
        version: env!("CARGO_PKG_VERSION"),
        status: "Server is running",
        documentation: EndpointMap {
            auth: "/api/auth",
            users: "/api/users",
            assignments: "/api/assignments",
            submissions: "/api/submissions",
        },
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Server is healthy",
        timestamp: Utc::now(),
    })
}

pub async fn route_not_found(method: Method, uri: Uri) -> (StatusCode, Json<RouteNotFound>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            message: "Route not found",
            path: uri.path().to_string(),
            method: method.to_string(),
        }),
    )
}
