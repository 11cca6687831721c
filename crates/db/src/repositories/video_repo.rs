//! Repository for the `videos` table, including the search dispatch
//! query.
//!
//! List and search queries always join Author → Pod and the tag
//! relation so tag-name sorting works and totals count distinct
//! videos (the tag join can multiply rows).

use sqlx::PgPool;
use uuid::Uuid;
use vidpod_core::search::{Sort, SearchPredicate};
use vidpod_core::types::DbId;

use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoListRow};

/// Column list shared across single-row queries.
const COLUMNS: &str = "\
    id, uuid, remote_uuid, name, description, extname, \
    info_hash, duration, author_id, created_at, updated_at";

/// Select list for joined list/search rows. Tag names aggregate into a
/// NULL-free array; grouping by the three primary keys keeps author and
/// pod columns valid under aggregation.
const LIST_SELECT: &str = "\
    SELECT videos.id, videos.uuid, videos.remote_uuid, videos.name, \
           videos.description, videos.extname, videos.info_hash, \
           videos.duration, videos.author_id, videos.created_at, \
           videos.updated_at, authors.name AS author_name, \
           pods.host AS pod_host, \
           ARRAY_REMOVE(ARRAY_AGG(DISTINCT tags.name), NULL) AS tag_names \
    FROM videos \
    JOIN authors ON authors.id = videos.author_id \
    LEFT JOIN pods ON pods.id = authors.pod_id \
    LEFT JOIN video_tags ON video_tags.video_id = videos.id \
    LEFT JOIN tags ON tags.id = video_tags.tag_id";

const LIST_GROUP_BY: &str = "GROUP BY videos.id, authors.id, pods.id";

/// FROM/JOIN clause reused by the distinct-count queries.
const COUNT_FROM: &str = "\
    FROM videos \
    JOIN authors ON authors.id = videos.author_id \
    LEFT JOIN pods ON pods.id = authors.pod_id \
    LEFT JOIN video_tags ON video_tags.video_id = videos.id \
    LEFT JOIN tags ON tags.id = video_tags.tag_id";

/// Provides CRUD plus filtered/paginated/joined queries for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video row, returning it.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos \
                 (uuid, remote_uuid, name, description, extname, info_hash, duration, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.uuid)
            .bind(input.remote_uuid)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.extname)
            .bind(&input.info_hash)
            .bind(input.duration)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE uuid = $1");
        sqlx::query_as::<_, Video>(&query).bind(uuid).fetch_optional(pool).await
    }

    /// Find a mirrored video by the identifier its owning pod assigned.
    /// Remote ids are only unique per pod, so the lookup is scoped by
    /// the announcing host.
    pub async fn find_by_remote_uuid(
        pool: &PgPool,
        remote_uuid: Uuid,
        pod_host: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = "\
            SELECT videos.id, videos.uuid, videos.remote_uuid, videos.name, \
                   videos.description, videos.extname, videos.info_hash, \
                   videos.duration, videos.author_id, videos.created_at, \
                   videos.updated_at \
            FROM videos \
            JOIN authors ON authors.id = videos.author_id \
            JOIN pods ON pods.id = authors.pod_id \
            WHERE videos.remote_uuid = $1 AND pods.host = $2";
        sqlx::query_as::<_, Video>(query)
            .bind(remote_uuid)
            .bind(pod_host)
            .fetch_optional(pool)
            .await
    }

    /// A single video with its author, pod, and tag names joined.
    pub async fn find_list_row(
        pool: &PgPool,
        uuid: Uuid,
    ) -> Result<Option<VideoListRow>, sqlx::Error> {
        let query = format!("{LIST_SELECT} WHERE videos.uuid = $1 {LIST_GROUP_BY}");
        sqlx::query_as::<_, VideoListRow>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Commit the computed info-hash onto a record, overwriting the
    /// placeholder. Returns `false` if the row no longer exists.
    pub async fn set_info_hash(
        pool: &PgPool,
        id: DbId,
        info_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE videos SET info_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(info_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update display metadata. Only non-`None` fields are applied.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a video row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a page of videos with joined author/pod/tags.
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        sort: &Sort,
    ) -> Result<Vec<VideoListRow>, sqlx::Error> {
        let query = format!(
            "{LIST_SELECT} {LIST_GROUP_BY} ORDER BY {} LIMIT $1 OFFSET $2",
            sort.sql()
        );
        sqlx::query_as::<_, VideoListRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All owned videos as list rows, oldest first. Feeds the
    /// catalogue announcement sent to a newly known pod.
    pub async fn list_owned_rows(pool: &PgPool) -> Result<Vec<VideoListRow>, sqlx::Error> {
        let query = format!(
            "{LIST_SELECT} WHERE videos.remote_uuid IS NULL {LIST_GROUP_BY} \
             ORDER BY videos.created_at ASC"
        );
        sqlx::query_as::<_, VideoListRow>(&query).fetch_all(pool).await
    }

    /// Total number of videos.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM videos")
            .fetch_one(pool)
            .await
    }

    /// Run a resolved search predicate with pagination and sort,
    /// returning the matching page.
    pub async fn search(
        pool: &PgPool,
        predicate: &SearchPredicate,
        offset: i64,
        limit: i64,
        sort: &Sort,
    ) -> Result<Vec<VideoListRow>, sqlx::Error> {
        let (condition, value) = predicate_sql(predicate);
        let query = format!(
            "{LIST_SELECT} WHERE {condition} {LIST_GROUP_BY} \
             ORDER BY {} LIMIT $2 OFFSET $3",
            sort.sql()
        );
        sqlx::query_as::<_, VideoListRow>(&query)
            .bind(value)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of DISTINCT videos matching a predicate. Distinct
    /// because the tag join can multiply rows.
    pub async fn search_count(
        pool: &PgPool,
        predicate: &SearchPredicate,
    ) -> Result<i64, sqlx::Error> {
        let (condition, value) = predicate_sql(predicate);
        let query =
            format!("SELECT COUNT(DISTINCT videos.id)::BIGINT {COUNT_FROM} WHERE {condition}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}

/// Translate a predicate into a WHERE condition with `$1` bound to the
/// search value. Substring branches are case-sensitive LIKE matches.
fn predicate_sql(predicate: &SearchPredicate) -> (String, &str) {
    match predicate {
        SearchPredicate::InfoHashEquals(hash) => ("videos.info_hash = $1".to_string(), hash),
        SearchPredicate::TagContains(value) => (
            // Subquery over the membership relation: at least one tag
            // name containing the value.
            "EXISTS (SELECT 1 FROM video_tags vt \
                     JOIN tags t ON t.id = vt.tag_id \
                     WHERE vt.video_id = videos.id \
                       AND t.name LIKE '%' || $1 || '%')"
                .to_string(),
            value,
        ),
        SearchPredicate::HostContains(value) => (
            // Requires the pod join: locally authored videos have no
            // pod row and are excluded from host search.
            "authors.pod_id IS NOT NULL AND pods.host LIKE '%' || $1 || '%'".to_string(),
            value,
        ),
        SearchPredicate::AuthorContains(value) => {
            ("authors.name LIKE '%' || $1 || '%'".to_string(), value)
        }
        SearchPredicate::ColumnContains { column, value } => {
            (format!("videos.{column} LIKE '%' || $1 || '%'"), value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_hash_predicate_is_exact_equality() {
        let p = SearchPredicate::InfoHashEquals("abc".into());
        let (sql, value) = predicate_sql(&p);
        assert_eq!(sql, "videos.info_hash = $1");
        assert_eq!(value, "abc");
    }

    #[test]
    fn host_predicate_requires_pod_join() {
        let p = SearchPredicate::HostContains("example".into());
        let (sql, _) = predicate_sql(&p);
        assert!(sql.contains("authors.pod_id IS NOT NULL"));
    }

    #[test]
    fn column_predicate_interpolates_only_whitelisted_names() {
        // Columns arrive pre-whitelisted from SearchField::predicate;
        // the repo trusts the static string.
        let p = SearchPredicate::ColumnContains {
            column: "description",
            value: "x".into(),
        };
        let (sql, _) = predicate_sql(&p);
        assert_eq!(sql, "videos.description LIKE '%' || $1 || '%'");
    }
}
