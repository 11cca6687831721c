//! Repository for the `pods` table.

use sqlx::PgPool;
use vidpod_core::types::DbId;

use crate::models::pod::Pod;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, host, created_at, updated_at";

/// Provides lookups over known peer pods.
pub struct PodRepo;

impl PodRepo {
    /// Find a pod by host, creating it if unknown.
    pub async fn find_or_create(pool: &PgPool, host: &str) -> Result<Pod, sqlx::Error> {
        let query = format!(
            "INSERT INTO pods (host) VALUES ($1)
             ON CONFLICT (host) DO UPDATE SET updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pod>(&query).bind(host).fetch_one(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pods WHERE id = $1");
        sqlx::query_as::<_, Pod>(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn find_by_host(pool: &PgPool, host: &str) -> Result<Option<Pod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pods WHERE host = $1");
        sqlx::query_as::<_, Pod>(&query).bind(host).fetch_optional(pool).await
    }

    /// All known peer hosts, the broadcast target set.
    pub async fn list_hosts(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT host FROM pods ORDER BY host ASC")
            .fetch_all(pool)
            .await
    }
}
