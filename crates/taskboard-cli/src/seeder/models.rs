//! Seed records and seeding configuration.

use chrono::{DateTime, Utc};
use taskboard_models::UserId;
use taskboard_models::users::UserRole;

/// Every seeded account uses this domain so it can be cleared later.
pub const SEED_EMAIL_DOMAIN: &str = "seed.taskboard.dev";

/// Password shared by all seeded accounts.
pub const SEED_PASSWORD: &str = "password123";

pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

pub struct AssignmentSeed {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub assigned_to: UserId,
    pub created_by: UserId,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub assignments_per_student: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 3,
            students: 20,
            assignments_per_student: 2,
        }
    }
}
