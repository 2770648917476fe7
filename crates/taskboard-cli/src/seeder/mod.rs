//! Database seeding for local development.
//!
//! Seeded accounts live under [`SEED_EMAIL_DOMAIN`] and share
//! [`SEED_PASSWORD`]. Clearing them cascades to their assignments and
//! submissions.

mod assignments;
mod models;
mod users;

use std::time::Instant;

use anyhow::Context;
use sqlx::PgPool;
use taskboard_core::hash_password;
use taskboard_models::users::UserRole;

pub use assignments::{generate_assignments, seed_assignments};
pub use models::{AssignmentSeed, SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig, UserSeed};
pub use users::{clear_users, generate_users, insert_users_batch, seed_users};

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    // bcrypt is slow; hash once and share it across every seeded account.
    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| e.error)
        .context("Failed to hash seed password")?;

    let teachers = seed_users(db, UserRole::Teacher, config.teachers, &password_hash).await?;
    let students = seed_users(db, UserRole::Student, config.students, &password_hash).await?;
    seed_assignments(db, &teachers, &students, config.assignments_per_student).await?;

    println!(
        "\n✅ Seeding complete in {:?}. Seeded accounts use password `{SEED_PASSWORD}`.",
        start_time.elapsed()
    );

    Ok(())
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let deleted = clear_users(db).await?;
    println!("✅ Cleared {deleted} seeded users and their assignments");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_seed_and_clear(pool: PgPool) {
        let config = SeedConfig {
            teachers: 2,
            students: 4,
            assignments_per_student: 2,
        };
        seed_all(&pool, config).await.unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        let assignments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 6);
        assert_eq!(assignments, 8);

        clear_all(&pool).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
