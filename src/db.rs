use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::AppError;

pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Idempotent schema setup; safe to run on every startup.
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employers (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            hh_id VARCHAR(50) UNIQUE NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vacancies (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            employer_id INTEGER REFERENCES employers(id),
            salary JSONB,
            url TEXT,
            requirement TEXT,
            responsibility TEXT
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
