//! Repository for the `tags` and `video_tags` tables.

use sqlx::PgPool;
use vidpod_core::types::DbId;

use crate::models::tag::Tag;

/// Provides tag upserts and the video ↔ tag membership relation.
pub struct TagRepo;

impl TagRepo {
    /// Upsert a set of tag names, returning the rows in input order.
    pub async fn find_or_create_all(
        pool: &PgPool,
        names: &[String],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let tag = sqlx::query_as::<_, Tag>(
                "INSERT INTO tags (name) VALUES ($1)
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                 RETURNING id, name",
            )
            .bind(name)
            .fetch_one(pool)
            .await?;
            tags.push(tag);
        }
        Ok(tags)
    }

    /// Replace a video's tag set with the given names.
    pub async fn set_for_video(
        pool: &PgPool,
        video_id: DbId,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        let tags = Self::find_or_create_all(pool, names).await?;

        sqlx::query("DELETE FROM video_tags WHERE video_id = $1")
            .bind(video_id)
            .execute(pool)
            .await?;

        for tag in &tags {
            sqlx::query(
                "INSERT INTO video_tags (video_id, tag_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(video_id)
            .bind(tag.id)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Tag names attached to a video, sorted ascending.
    pub async fn names_for_video(pool: &PgPool, video_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT tags.name FROM tags
             JOIN video_tags ON video_tags.tag_id = tags.id
             WHERE video_tags.video_id = $1
             ORDER BY tags.name ASC",
        )
        .bind(video_id)
        .fetch_all(pool)
        .await
    }
}
