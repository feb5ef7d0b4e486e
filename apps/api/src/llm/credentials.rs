//! Per-tenant stored credentials (`user_credentials` table).
//!
//! Tier 2 of the factory's resolution order: a tenant can store their own
//! gateway key and preferred model instead of sending them per request.

use anyhow::Result;
use sqlx::{PgPool, Row};

const KEY_API_KEY: &str = "openrouter_api_key";
const KEY_MODEL: &str = "llm_model";

/// A tenant's stored gateway credential.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub api_key: String,
    pub model: Option<String>,
}

/// Fetches the stored credential for a tenant, if any.
pub async fn stored_credential(pool: &PgPool, owner_id: &str) -> Result<Option<StoredCredential>> {
    let rows = sqlx::query(
        "SELECT setting_key, setting_value FROM user_credentials WHERE owner_id = $1",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let mut api_key = None;
    let mut model = None;
    for row in rows {
        let key: String = row.try_get("setting_key")?;
        let value: String = row.try_get("setting_value")?;
        match key.as_str() {
            KEY_API_KEY => api_key = Some(value),
            KEY_MODEL => model = Some(value),
            _ => {}
        }
    }

    Ok(api_key.map(|api_key| StoredCredential { api_key, model }))
}

/// Upserts one setting; an empty value deletes it instead.
pub async fn upsert_setting(pool: &PgPool, owner_id: &str, key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        sqlx::query("DELETE FROM user_credentials WHERE owner_id = $1 AND setting_key = $2")
            .bind(owner_id)
            .bind(key)
            .execute(pool)
            .await?;
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO user_credentials (owner_id, setting_key, setting_value, updated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (owner_id, setting_key)
        DO UPDATE SET setting_value = EXCLUDED.setting_value, updated_at = now()
        "#,
    )
    .bind(owner_id)
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Stores or clears the tenant's API key.
pub async fn set_api_key(pool: &PgPool, owner_id: &str, api_key: &str) -> Result<()> {
    upsert_setting(pool, owner_id, KEY_API_KEY, api_key).await
}

/// Stores or clears the tenant's preferred model.
pub async fn set_model(pool: &PgPool, owner_id: &str, model: &str) -> Result<()> {
    upsert_setting(pool, owner_id, KEY_MODEL, model).await
}

/// Deletes every stored setting for a tenant.
pub async fn delete_all(pool: &PgPool, owner_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM user_credentials WHERE owner_id = $1")
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Masks a stored key for display: first 6 characters plus ellipsis.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    format!("{visible}…")
}
