use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use taskboard_cli::admin::create_admin;
use taskboard_cli::seeder::{self, SeedConfig};
use taskboard_config::DatabaseConfig;
use taskboard_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "taskboard-cli")]
#[command(about = "Taskboard CLI - Administrative tools for Taskboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new admin account
    CreateAdmin {
        /// Full name of the admin
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with fake teachers, students, and assignments
    Seed {
        /// Number of teachers to create
        #[arg(long, default_value = "3")]
        teachers: usize,

        /// Number of students to create
        #[arg(long, default_value = "20")]
        students: usize,

        /// Number of assignments per student
        #[arg(long, default_value = "2")]
        assignments: usize,
    },
    /// Clear all seeded data (keeps accounts created by hand)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let database_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::Seed {
            teachers,
            students,
            assignments,
        } => {
            let config = SeedConfig {
                teachers,
                students,
                assignments_per_student: assignments,
            };
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Full name")
            .interact_text()
            .context("Failed to read name")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let user_id = create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {user_id}");
    println!("   Email: {}", email.trim().to_lowercase());
    println!("   Name: {}", name.trim());

    Ok(())
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool)
        .await
        .context("Failed to run migrations")?;
    println!("✅ Migrations applied");
    Ok(())
}
