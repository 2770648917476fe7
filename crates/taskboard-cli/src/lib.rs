//! # Taskboard CLI
//!
//! Administrative tools and database seeding for Taskboard development.
//!
//! ```ignore
//! use taskboard_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
