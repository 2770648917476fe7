//! Fake assignments spread across the seeded students.

use std::time::Instant;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use taskboard_models::UserId;
use taskboard_models::assignments::AssignmentStatus;

use super::models::AssignmentSeed;

// 6 binds per row
const BATCH_SIZE: usize = 1000;

/// Each student gets `per_student` assignments, created by teachers in
/// round-robin order.
pub fn generate_assignments(
    teachers: &[UserId],
    students: &[UserId],
    per_student: usize,
) -> Vec<AssignmentSeed> {
    if teachers.is_empty() {
        return Vec::new();
    }

    students
        .par_iter()
        .enumerate()
        .flat_map_iter(|(student_idx, &student_id)| {
            (0..per_student).map(move |n| {
                let teacher = teachers[(student_idx * per_student + n) % teachers.len()];
                let days: i64 = (1i64..30).fake();
                let title: String = Sentence(3..7).fake();
                let description: String = Paragraph(2..4).fake();

                AssignmentSeed {
                    title: title.trim_end_matches('.').to_string(),
                    description,
                    due_date: Utc::now() + Duration::days(days),
                    assigned_to: student_id,
                    created_by: teacher,
                }
            })
        })
        .collect()
}

pub async fn seed_assignments(
    db: &PgPool,
    teachers: &[UserId],
    students: &[UserId],
    per_student: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!(
        "📝 Seeding {} assignments ({per_student} per student)...",
        students.len() * per_student
    );

    let assignments = generate_assignments(teachers, students, per_student);
    let mut tx = db.begin().await?;

    for chunk in assignments.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO assignments (title, description, due_date, status, assigned_to, created_by) ",
        );
        builder.push_values(chunk, |mut row, assignment| {
            row.push_bind(&assignment.title)
                .push_bind(&assignment.description)
                .push_bind(assignment.due_date)
                .push_bind(AssignmentStatus::Pending)
                .push_bind(assignment.assigned_to)
                .push_bind(assignment.created_by);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} assignments in {:?}",
        assignments.len(),
        start_time.elapsed()
    );

    Ok(assignments.len())
}
