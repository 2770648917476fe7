use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_submission, delete_submission, get_submission, get_submissions,
    get_submissions_by_assignment, grade_submission,
};

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_submission).get(get_submissions))
        .route(
            "/assignment/{assignment_id}",
            get(get_submissions_by_assignment),
        )
        .route(
            "/{id}",
            get(get_submission)
                .put(grade_submission)
                .delete(delete_submission),
        )
}
