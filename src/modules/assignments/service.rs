use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use taskboard_core::{AppError, Paginated};
use taskboard_models::assignments::{
    Assignment, AssignmentDetails, AssignmentFilterParams, AssignmentRow, AssignmentSort,
    AssignmentStatus, CreateAssignmentDto, UpdateAssignmentDto,
};
use taskboard_models::users::UserRole;

use crate::metrics::track_assignment_status;

pub(crate) const ASSIGNMENT_COLUMNS: &str =
    "id, title, description, due_date, status, assigned_to, created_by, created_at, updated_at";

const DETAILS_SELECT: &str = r#"SELECT
        a.id,
        a.title,
        a.description,
        a.due_date,
        a.status,
        a.assigned_to,
        assignee.name AS assigned_to_name,
        assignee.email AS assigned_to_email,
        assignee.role AS assigned_to_role,
        a.created_by,
        creator.name AS created_by_name,
        creator.email AS created_by_email,
        creator.role AS created_by_role,
        a.created_at,
        a.updated_at
       FROM assignments a
       JOIN users assignee ON assignee.id = a.assigned_to
       JOIN users creator ON creator.id = a.created_by"#;

pub(crate) fn assignment_not_found() -> AppError {
    AppError::not_found(anyhow!("Assignment not found"))
}

fn referenced_user_not_found() -> AppError {
    AppError::not_found(anyhow!("Referenced user not found"))
}

fn map_reference_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return referenced_user_not_found();
    }
    AppError::from(err)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &AssignmentFilterParams) {
    builder.push(" WHERE 1 = 1");
    if let Some(status) = filters.status {
        builder.push(" AND a.status = ").push_bind(status);
    }
    if let Some(assigned_to) = filters.assigned_to {
        builder.push(" AND a.assigned_to = ").push_bind(assigned_to);
    }
    if let Some(created_by) = filters.created_by {
        builder.push(" AND a.created_by = ").push_bind(created_by);
    }
}

async fn user_role<'e, E>(executor: E, id: Uuid) -> Result<Option<UserRole>, AppError>
where
    E: PgExecutor<'e>,
{
    let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(role)
}

async fn ensure_assignee<'e, E>(executor: E, id: Uuid) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    match user_role(executor, id).await? {
        None => Err(referenced_user_not_found()),
        Some(UserRole::Student) => Ok(()),
        Some(_) => Err(AppError::bad_request(anyhow!(
            "Assignments can only be assigned to students"
        ))),
    }
}

async fn ensure_creator<'e, E>(executor: E, id: Uuid) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    match user_role(executor, id).await? {
        None => Err(referenced_user_not_found()),
        Some(UserRole::Teacher | UserRole::Admin) => Ok(()),
        Some(UserRole::Student) => Err(AppError::bad_request(anyhow!(
            "Assignments can only be created by teachers or admins"
        ))),
    }
}

pub struct AssignmentService;

impl AssignmentService {
    pub(crate) async fn fetch_details<'e, E>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<AssignmentDetails>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!("{DETAILS_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.map(AssignmentDetails::from))
    }

    #[instrument]
    pub async fn create_assignment(
        db: &PgPool,
        dto: CreateAssignmentDto,
    ) -> Result<AssignmentDetails, AppError> {
        ensure_assignee(db, dto.assigned_to.into_inner()).await?;
        ensure_creator(db, dto.created_by.into_inner()).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO assignments (title, description, due_date, status, assigned_to, created_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.due_date)
        .bind(AssignmentStatus::Pending)
        .bind(dto.assigned_to)
        .bind(dto.created_by)
        .fetch_one(db)
        .await
        .map_err(map_reference_error)?;

        track_assignment_status(AssignmentStatus::Pending);
        info!(assignment_id = %id, assigned_to = %dto.assigned_to, "Assignment created");

        Self::get_assignment(db, id).await
    }

    #[instrument]
    pub async fn list_assignments(
        db: &PgPool,
        filters: AssignmentFilterParams,
    ) -> Result<Paginated<AssignmentDetails>, AppError> {
        let sort = AssignmentSort::parse(filters.sort_by.as_deref())
            .map_err(|msg| AppError::bad_request(anyhow!(msg)))?;
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM assignments a");
        push_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY ")
            .push(sort.to_sql())
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let assignments = data_query
            .build_query_as::<AssignmentRow>()
            .fetch_all(db)
            .await?
            .into_iter()
            .map(AssignmentDetails::from)
            .collect();

        Ok(Paginated::new(assignments, total, &filters.pagination))
    }

    #[instrument]
    pub async fn get_assignment(db: &PgPool, id: Uuid) -> Result<AssignmentDetails, AppError> {
        Self::fetch_details(db, id)
            .await?
            .ok_or_else(assignment_not_found)
    }

    /// Applies the present fields. A status change must stay in place or
    /// advance exactly one step.
    #[instrument]
    pub async fn update_assignment(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAssignmentDto,
    ) -> Result<AssignmentDetails, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(assignment_not_found)?;

        if let Some(next) = dto.status
            && !current.status.can_transition_to(next)
        {
            return Err(AppError::bad_request(anyhow!(
                "Invalid status transition from {} to {}",
                current.status,
                next
            )));
        }

        if let Some(assigned_to) = dto.assigned_to {
            ensure_assignee(&mut *tx, assigned_to.into_inner()).await?;
        }

        if !dto.is_empty() {
            let mut builder =
                QueryBuilder::<Postgres>::new("UPDATE assignments SET updated_at = NOW()");
            if let Some(title) = &dto.title {
                builder.push(", title = ").push_bind(title.clone());
            }
            if let Some(description) = &dto.description {
                builder
                    .push(", description = ")
                    .push_bind(description.clone());
            }
            if let Some(due_date) = dto.due_date {
                builder.push(", due_date = ").push_bind(due_date);
            }
            if let Some(status) = dto.status {
                builder.push(", status = ").push_bind(status);
            }
            if let Some(assigned_to) = dto.assigned_to {
                builder.push(", assigned_to = ").push_bind(assigned_to);
            }
            builder.push(" WHERE id = ").push_bind(id);

            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_reference_error)?;
        }

        let details = Self::fetch_details(&mut *tx, id)
            .await?
            .ok_or_else(assignment_not_found)?;

        tx.commit().await?;

        if let Some(next) = dto.status
            && next != current.status
        {
            track_assignment_status(next);
            info!(assignment_id = %id, from = %current.status, to = %next, "Assignment status changed");
        }

        Ok(details)
    }

    #[instrument]
    pub async fn delete_assignment(db: &PgPool, id: Uuid) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "DELETE FROM assignments WHERE id = $1 RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(assignment_not_found)?;

        info!(assignment_id = %id, "Assignment deleted");
        Ok(assignment)
    }
}
