use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Get-or-create schema: every table the service owns, applied idempotently
/// at startup. Tenant-owned tables all carry `owner_id` and an index on it.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resume_chunks (
            id UUID PRIMARY KEY,
            resume_id UUID NOT NULL,
            owner_id TEXT NOT NULL,
            filename TEXT NOT NULL,
            chunk_index INT NOT NULL,
            content TEXT NOT NULL,
            embedding REAL[] NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS resume_chunks_owner_idx ON resume_chunks (owner_id, resume_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id UUID PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            employment_type TEXT NOT NULL DEFAULT 'FULL_TIME',
            job_category TEXT NOT NULL DEFAULT 'IT',
            job_level TEXT NOT NULL DEFAULT 'MID',
            skills_required TEXT[] NOT NULL DEFAULT '{}',
            salary_min DOUBLE PRECISION,
            salary_max DOUBLE PRECISION,
            application_url TEXT,
            embedding REAL[] NOT NULL,
            posted_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS jobs_owner_idx ON jobs (owner_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity_log (
            id UUID PRIMARY KEY,
            owner_id TEXT NOT NULL,
            activity_type TEXT NOT NULL,
            filename TEXT NOT NULL,
            score INT NOT NULL,
            decision TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS activity_log_owner_idx ON activity_log (owner_id, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_credentials (
            owner_id TEXT NOT NULL,
            setting_key TEXT NOT NULL,
            setting_value TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (owner_id, setting_key)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ensured");
    Ok(())
}
