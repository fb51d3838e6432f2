use anyhow::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<()> {
    info!("Running database migrations...");

    // Create users table if it doesn't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS users_created_at_idx ON users (created_at DESC)")
        .execute(pool)
        .await?;

    info!("Database migrations completed successfully");

    Ok(())
}
