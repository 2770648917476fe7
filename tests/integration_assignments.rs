mod common;

use axum::http::StatusCode;
use common::{
    assignment_status, create_test_assignment, create_test_user, days_from_now, send,
    setup_test_app,
};
use serde_json::{Value, json};
use sqlx::PgPool;
use taskboard_models::users::UserRole;
use uuid::Uuid;

fn assignment_payload(assigned_to: Uuid, created_by: Uuid) -> Value {
    json!({
        "title": "Binary trees",
        "description": "Implement insert and delete for a BST",
        "dueDate": "2030-06-01",
        "assignedTo": assigned_to,
        "createdBy": created_by
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assignment(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&teacher.token),
        Some(assignment_payload(student.id, teacher.id)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["title"], "Binary trees");
    assert_eq!(body["data"]["dueDate"], "2030-06-01T00:00:00Z");
    assert_eq!(body["data"]["assignedTo"]["id"], student.id.to_string());
    assert_eq!(body["data"]["assignedTo"]["role"], "student");
    assert_eq!(body["data"]["createdBy"]["id"], teacher.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assignment_as_student_forbidden(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&student.token),
        Some(assignment_payload(student.id, teacher.id)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "User role student is not authorized to access this route"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assignment_rejects_bad_references(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let other_teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&teacher.token),
        Some(assignment_payload(other_teacher.id, teacher.id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assignments can only be assigned to students");

    let (status, body) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&teacher.token),
        Some(assignment_payload(Uuid::new_v4(), teacher.id)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Referenced user not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&teacher.token),
        Some(assignment_payload(student.id, student.id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assignment_validation(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool);

    let mut payload = assignment_payload(student.id, teacher.id);
    payload["title"] = json!("ab");
    let (status, body) = send(&app, "POST", "/api/assignments", Some(&teacher.token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title must be at least 3 characters long");

    let mut payload = assignment_payload(student.id, teacher.id);
    payload["title"] = json!("   ab   ");
    let (status, body) = send(&app, "POST", "/api/assignments", Some(&teacher.token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title must be at least 3 characters long");

    let mut payload = assignment_payload(student.id, teacher.id);
    payload["title"] = json!("  Heaps  ");
    let (status, body) = send(&app, "POST", "/api/assignments", Some(&teacher.token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Heaps");

    let mut payload = assignment_payload(student.id, teacher.id);
    payload["dueDate"] = json!("next tuesday");
    let (status, _) = send(&app, "POST", "/api/assignments", Some(&teacher.token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_assignments_with_filters(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let alice = create_test_user(&pool, UserRole::Student).await;
    let bob = create_test_user(&pool, UserRole::Student).await;
    for _ in 0..3 {
        create_test_assignment(&pool, teacher.id, alice.id, days_from_now(7)).await;
    }
    let graded = create_test_assignment(&pool, teacher.id, bob.id, days_from_now(7)).await;
    sqlx::query("UPDATE assignments SET status = 'graded' WHERE id = $1")
        .bind(graded)
        .execute(&pool)
        .await
        .unwrap();
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/assignments?assignedTo={}&limit=2", alice.id),
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["count"], 2);
    assert_eq!(body["pages"], 2);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/assignments?assignedTo={}&limit=2&page=5", alice.id),
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["count"], 0);
    assert_eq!(body["page"], 5);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        "GET",
        "/api/assignments?status=graded",
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], graded.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_assignments_sorting(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let later = create_test_assignment(&pool, teacher.id, student.id, days_from_now(20)).await;
    let sooner = create_test_assignment(&pool, teacher.id, student.id, days_from_now(2)).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        "/api/assignments?sortBy=dueDate",
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], sooner.to_string());
    assert_eq!(body["data"][1]["id"], later.to_string());

    let (status, body) = send(
        &app,
        "GET",
        "/api/assignments?sortBy=-dueDate",
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], later.to_string());

    let (status, _) = send(
        &app,
        "GET",
        "/api/assignments?sortBy=password",
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_assignment(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let id = create_test_assignment(&pool, teacher.id, student.id, days_from_now(7)).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/assignments/{id}"),
        Some(&student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["createdBy"]["email"], teacher.email);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/assignments/{}", Uuid::new_v4()),
        Some(&student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Assignment not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_assignment_fields(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let id = create_test_assignment(&pool, teacher.id, student.id, days_from_now(7)).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/assignments/{id}"),
        Some(&teacher.token),
        Some(json!({ "title": "Graph traversal", "dueDate": "2031-01-15T09:30:00Z" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Graph traversal");
    assert_eq!(body["data"]["dueDate"], "2031-01-15T09:30:00Z");
    assert_eq!(body["data"]["description"], "Explain borrowing in your own words");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_assignment_status_transitions(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let id = create_test_assignment(&pool, teacher.id, student.id, days_from_now(7)).await;
    let app = setup_test_app(pool.clone());
    let uri = format!("/api/assignments/{id}");

    let (status, body) = send(&app, "PUT", &uri, Some(&teacher.token), Some(json!({ "status": "graded" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status transition from pending to graded");
    assert_eq!(assignment_status(&pool, id).await, "pending");

    let (status, body) = send(&app, "PUT", &uri, Some(&teacher.token), Some(json!({ "status": "submitted" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "submitted");

    let (status, _) = send(&app, "PUT", &uri, Some(&teacher.token), Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assignment_status(&pool, id).await, "submitted");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_assignment(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let id = create_test_assignment(&pool, teacher.id, student.id, days_from_now(7)).await;
    let app = setup_test_app(pool);
    let uri = format!("/api/assignments/{id}");

    let (status, _) = send(&app, "DELETE", &uri, Some(&student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &uri, Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assignment deleted successfully");

    let (status, _) = send(&app, "GET", &uri, Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
