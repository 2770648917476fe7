use anyhow::anyhow;
use chrono::Utc;
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use taskboard_core::{AppError, Paginated, PaginationParams};
use taskboard_models::assignments::{Assignment, AssignmentStatus};
use taskboard_models::submissions::{
    CreateSubmissionDto, GradeSubmissionDto, Submission, SubmissionDetails,
    SubmissionFilterParams, SubmissionRow, is_valid_grade,
};

use crate::metrics::{track_assignment_status, track_submission_created, track_submission_graded};
use crate::modules::assignments::service::{ASSIGNMENT_COLUMNS, assignment_not_found};

const SUBMISSION_COLUMNS: &str = "id, assignment_id, student_id, content, submission_date, grade, feedback, is_late, created_at, updated_at";

const DETAILS_SELECT: &str = r#"SELECT
        s.id,
        s.assignment_id,
        a.title AS assignment_title,
        a.due_date AS assignment_due_date,
        a.status AS assignment_status,
        s.student_id,
        u.name AS student_name,
        u.email AS student_email,
        u.role AS student_role,
        s.content,
        s.submission_date,
        s.grade,
        s.feedback,
        s.is_late,
        s.created_at,
        s.updated_at
       FROM submissions s
       JOIN assignments a ON a.id = s.assignment_id
       JOIN users u ON u.id = s.student_id"#;

fn submission_not_found() -> AppError {
    AppError::not_found(anyhow!("Submission not found"))
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow!(
                "Submission already exists for this assignment"
            ));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(anyhow!("Referenced user not found"));
        }
    }
    AppError::from(err)
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    assignment_id: Option<Uuid>,
    student_id: Option<Uuid>,
) {
    builder.push(" WHERE 1 = 1");
    if let Some(assignment_id) = assignment_id {
        builder.push(" AND s.assignment_id = ").push_bind(assignment_id);
    }
    if let Some(student_id) = student_id {
        builder.push(" AND s.student_id = ").push_bind(student_id);
    }
}

/// Moves the locked assignment forward to `target`, never backwards.
async fn advance_assignment(
    conn: &mut PgConnection,
    assignment_id: Uuid,
    target: AssignmentStatus,
) -> Result<AssignmentStatus, AppError> {
    let current = sqlx::query_scalar::<_, AssignmentStatus>(
        "SELECT status FROM assignments WHERE id = $1 FOR UPDATE",
    )
    .bind(assignment_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(assignment_not_found)?;

    let next = current.advanced_to(target);
    if next != current {
        sqlx::query("UPDATE assignments SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(assignment_id)
            .bind(next)
            .execute(&mut *conn)
            .await?;

        track_assignment_status(next);
        info!(assignment_id = %assignment_id, from = %current, to = %next, "Assignment status advanced");
    }

    Ok(next)
}

pub struct SubmissionService;

impl SubmissionService {
    async fn fetch_details<'e, E>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<SubmissionDetails>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let row =
            sqlx::query_as::<_, SubmissionRow>(&format!("{DETAILS_SELECT} WHERE s.id = $1"))
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(row.map(SubmissionDetails::from))
    }

    async fn fetch_page(
        db: &PgPool,
        assignment_id: Option<Uuid>,
        student_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> Result<Paginated<SubmissionDetails>, AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM submissions s");
        push_filters(&mut count_query, assignment_id, student_id);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        push_filters(&mut data_query, assignment_id, student_id);
        data_query
            .push(" ORDER BY s.submission_date DESC, s.id DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let submissions = data_query
            .build_query_as::<SubmissionRow>()
            .fetch_all(db)
            .await?
            .into_iter()
            .map(SubmissionDetails::from)
            .collect();

        Ok(Paginated::new(submissions, total, pagination))
    }

    /// Records the submission and advances its assignment to `submitted` in
    /// one transaction.
    #[instrument]
    pub async fn create_submission(
        db: &PgPool,
        dto: CreateSubmissionDto,
    ) -> Result<SubmissionDetails, AppError> {
        let mut tx = db.begin().await?;

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1 FOR UPDATE"
        ))
        .bind(dto.assignment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(assignment_not_found)?;

        let now = Utc::now();
        let is_late = now > assignment.due_date;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO submissions (assignment_id, student_id, content, submission_date, is_late)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(dto.assignment_id)
        .bind(dto.student_id)
        .bind(&dto.content)
        .bind(now)
        .bind(is_late)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        advance_assignment(&mut *tx, assignment.id.into_inner(), AssignmentStatus::Submitted).await?;

        let details = Self::fetch_details(&mut *tx, id)
            .await?
            .ok_or_else(submission_not_found)?;

        tx.commit().await?;

        track_submission_created(is_late);
        info!(submission_id = %id, assignment_id = %dto.assignment_id, is_late, "Submission created");

        Ok(details)
    }

    #[instrument]
    pub async fn list_submissions(
        db: &PgPool,
        filters: SubmissionFilterParams,
    ) -> Result<Paginated<SubmissionDetails>, AppError> {
        Self::fetch_page(db, None, filters.student_id, &filters.pagination).await
    }

    #[instrument]
    pub async fn list_by_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        pagination: PaginationParams,
    ) -> Result<Paginated<SubmissionDetails>, AppError> {
        Self::fetch_page(db, Some(assignment_id), None, &pagination).await
    }

    #[instrument]
    pub async fn get_submission(db: &PgPool, id: Uuid) -> Result<SubmissionDetails, AppError> {
        Self::fetch_details(db, id)
            .await?
            .ok_or_else(submission_not_found)
    }

    /// Stores grade and feedback and advances the assignment to `graded` in
    /// one transaction. The grade range is checked before any query runs.
    #[instrument]
    pub async fn grade_submission(
        db: &PgPool,
        id: Uuid,
        dto: GradeSubmissionDto,
    ) -> Result<SubmissionDetails, AppError> {
        if !is_valid_grade(dto.grade) {
            return Err(AppError::bad_request(anyhow!(
                "Grade must be between 0 and 100"
            )));
        }

        let mut tx = db.begin().await?;

        let assignment_id = sqlx::query_scalar::<_, Uuid>(
            r#"UPDATE submissions
               SET grade = $2, feedback = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING assignment_id"#,
        )
        .bind(id)
        .bind(dto.grade)
        .bind(&dto.feedback)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(submission_not_found)?;

        advance_assignment(&mut *tx, assignment_id, AssignmentStatus::Graded).await?;

        let details = Self::fetch_details(&mut *tx, id)
            .await?
            .ok_or_else(submission_not_found)?;

        tx.commit().await?;

        track_submission_graded(dto.grade);
        info!(submission_id = %id, grade = dto.grade, "Submission graded");

        Ok(details)
    }

    #[instrument]
    pub async fn find_submission(db: &PgPool, id: Uuid) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(submission_not_found)
    }

    #[instrument]
    pub async fn delete_submission(db: &PgPool, id: Uuid) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "DELETE FROM submissions WHERE id = $1 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(submission_not_found)?;

        info!(submission_id = %id, "Submission deleted");
        Ok(submission)
    }
}
