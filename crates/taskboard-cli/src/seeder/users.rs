//! Fake teacher and student accounts.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use taskboard_models::UserId;
use taskboard_models::users::UserRole;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

// 4 binds per row
const BATCH_SIZE: usize = 1000;

pub fn generate_users(role: UserRole, count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(role, idx, password_hash))
        .collect()
}

fn generate_user(role: UserRole, idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let local_part: String = format!("{first_name}.{last_name}")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();

    UserSeed {
        name: format!("{first_name} {last_name}"),
        email: format!("{local_part}+{role}{idx}@{SEED_EMAIL_DOMAIN}"),
        password_hash: password_hash.to_string(),
        role,
    }
}

pub async fn seed_users(
    db: &PgPool,
    role: UserRole,
    count: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!("👥 Seeding {count} {role} users...");

    let users = generate_users(role, count, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} {role} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<Vec<UserId>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO users (name, email, password, role) ");
        builder.push_values(chunk, |mut row, user| {
            row.push_bind(&user.name)
                .push_bind(&user.email)
                .push_bind(&user.password_hash)
                .push_bind(user.role);
        });
        builder.push(" RETURNING id");

        let chunk_ids: Vec<UserId> = builder.build_query_scalar().fetch_all(&mut *tx).await?;
        ids.extend(chunk_ids);
    }

    tx.commit().await?;
    Ok(ids)
}

pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {deleted} users in {:?}", start_time.elapsed());

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users() {
        let users = generate_users(UserRole::Student, 25, "hash");
        assert_eq!(users.len(), 25);
        assert!(users.iter().all(|u| u.role == UserRole::Student));
        assert!(users.iter().all(|u| u.email.ends_with("@seed.taskboard.dev")));
        assert!(users.iter().all(|u| u.password_hash == "hash"));
    }

    #[test]
    fn test_generated_emails_are_unique() {
        let users = generate_users(UserRole::Teacher, 50, "hash");
        let mut emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 50);
    }
}
