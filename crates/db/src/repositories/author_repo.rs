//! Repository for the `authors` table.

use sqlx::PgPool;
use vidpod_core::types::DbId;

use crate::models::author::Author;

const COLUMNS: &str = "id, name, pod_id, created_at, updated_at";

/// Provides lookups over video authors.
pub struct AuthorRepo;

impl AuthorRepo {
    /// Find an author by (name, pod), creating it if unknown.
    ///
    /// `pod_id = None` means a local author. Uniqueness treats NULL pod
    /// ids as equal (`NULLS NOT DISTINCT`), so each local author name
    /// exists once.
    pub async fn find_or_create(
        pool: &PgPool,
        name: &str,
        pod_id: Option<DbId>,
    ) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (name, pod_id) VALUES ($1, $2)
             ON CONFLICT (name, pod_id) DO UPDATE SET updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(name)
            .bind(pod_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = $1");
        sqlx::query_as::<_, Author>(&query).bind(id).fetch_optional(pool).await
    }
}
