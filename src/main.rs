use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use r4gmi_users::infrastructure::config::{run_migrations, AppConfig};
use r4gmi_users::infrastructure::driving::cli::{run_user_action, Cli, Command};
use r4gmi_users::infrastructure::telemetry::setup_tracing;
use r4gmi_users::{RepositoryError, SqlRepository, Table, User, UserService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    setup_tracing(&config.log.filter)?;

    // Set up database connection pool
    let pool = match config.database.connect().await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Migrate => run_migrations(&pool).await?,
        Command::Users { action } => {
            let pool = Arc::new(pool);
            let user_service =
                UserService::from_factory(|| SqlRepository::<User>::new(pool.clone(), Table::new("users")));

            let mut stdout = std::io::stdout().lock();
            if let Err(e) = run_user_action(&user_service, action, &mut stdout).await {
                if let Some(RepositoryError::NotFound(id)) = e.downcast_ref::<RepositoryError>() {
                    eprintln!("user {} not found", id);
                    std::process::exit(2);
                }
                return Err(e);
            }
        }
    }

    Ok(())
}
