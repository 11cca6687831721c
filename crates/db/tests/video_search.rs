//! Integration tests for the video repository and search dispatch.
//!
//! Exercises the repository layer against a real database: ownership
//! flag round-trips, the joined list row, and every search-field
//! branch including the distinct-count semantics of the tag join.

use sqlx::PgPool;
use uuid::Uuid;
use vidpod_core::search::{SearchField, Sort, DEFAULT_SORT};
use vidpod_db::models::video::{CreateVideo, UpdateVideo};
use vidpod_db::repositories::{AuthorRepo, PodRepo, TagRepo, VideoRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HASH_A: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";
const HASH_B: &str = "b94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

fn new_video(author_id: i64, name: &str, info_hash: &str) -> CreateVideo {
    CreateVideo {
        uuid: Uuid::new_v4(),
        remote_uuid: None,
        name: name.to_string(),
        description: Some("A test video".to_string()),
        extname: ".mp4".to_string(),
        info_hash: info_hash.to_string(),
        duration: 120,
        author_id,
    }
}

async fn search(
    pool: &PgPool,
    field: &str,
    value: &str,
) -> (Vec<vidpod_db::models::video::VideoListRow>, i64) {
    let predicate = SearchField::parse(field).predicate(value).unwrap();
    let rows = VideoRepo::search(pool, &predicate, 0, 20, &DEFAULT_SORT)
        .await
        .unwrap();
    let total = VideoRepo::search_count(pool, &predicate).await.unwrap();
    (rows, total)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_and_find_owned_video(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let created = VideoRepo::create(&pool, &new_video(author.id, "Demo", HASH_A))
        .await
        .unwrap();

    assert!(created.is_owned());
    assert_eq!(created.info_hash, HASH_A);

    let found = VideoRepo::find_by_uuid(&pool, created.uuid).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(
        VideoRepo::find_by_remote_uuid(&pool, created.uuid, "peer.example.com:9000")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn mirrored_video_found_by_remote_uuid(pool: PgPool) {
    let pod = PodRepo::find_or_create(&pool, "peer.example.com:9000").await.unwrap();
    let author = AuthorRepo::find_or_create(&pool, "bob", Some(pod.id)).await.unwrap();

    let remote = Uuid::new_v4();
    let mut input = new_video(author.id, "Mirrored", HASH_B);
    input.remote_uuid = Some(remote);
    let created = VideoRepo::create(&pool, &input).await.unwrap();

    assert!(!created.is_owned());
    let found = VideoRepo::find_by_remote_uuid(&pool, remote, "peer.example.com:9000")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    assert!(
        VideoRepo::find_by_remote_uuid(&pool, remote, "other.example.com:9000")
            .await
            .unwrap()
            .is_none()
    );

    let row = VideoRepo::find_list_row(&pool, created.uuid).await.unwrap().unwrap();
    assert_eq!(row.pod_host.as_deref(), Some("peer.example.com:9000"));
    assert_eq!(row.author_name, "bob");
}

#[sqlx::test(migrations = "../../migrations")]
async fn set_info_hash_overwrites_placeholder(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let created = VideoRepo::create(
        &pool,
        &new_video(
            author.id,
            "Demo",
            vidpod_core::infohash::INFO_HASH_PLACEHOLDER,
        ),
    )
    .await
    .unwrap();

    assert!(VideoRepo::set_info_hash(&pool, created.id, HASH_A).await.unwrap());
    let found = VideoRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.info_hash, HASH_A);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_metadata_applies_only_set_fields(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let created = VideoRepo::create(&pool, &new_video(author.id, "Before", HASH_A))
        .await
        .unwrap();

    let updated = VideoRepo::update_metadata(
        &pool,
        created.id,
        &UpdateVideo {
            name: Some("After".into()),
            description: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "After");
    assert_eq!(updated.description.as_deref(), Some("A test video"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_removes_row_and_tag_links(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let created = VideoRepo::create(&pool, &new_video(author.id, "Doomed", HASH_A))
        .await
        .unwrap();
    TagRepo::set_for_video(&pool, created.id, &["rock".into()]).await.unwrap();

    assert!(VideoRepo::delete(&pool, created.id).await.unwrap());
    assert!(VideoRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert_eq!(VideoRepo::count(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Search dispatch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn host_search_excludes_podless_authors(pool: PgPool) {
    let local = AuthorRepo::find_or_create(&pool, "local-author", None).await.unwrap();
    VideoRepo::create(&pool, &new_video(local.id, "Local video", HASH_A))
        .await
        .unwrap();

    let pod = PodRepo::find_or_create(&pool, "peer.example.com:9000").await.unwrap();
    let remote_author = AuthorRepo::find_or_create(&pool, "remote-author", Some(pod.id))
        .await
        .unwrap();
    let mut input = new_video(remote_author.id, "Remote video", HASH_B);
    input.remote_uuid = Some(Uuid::new_v4());
    VideoRepo::create(&pool, &input).await.unwrap();

    let (rows, total) = search(&pool, "host", "example.com").await;
    assert_eq!(total, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Remote video");

    // A substring matching nothing hosted remotely returns nothing,
    // even though a local video exists.
    let (rows, total) = search(&pool, "host", "elsewhere").await;
    assert_eq!(total, 0);
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn tag_search_counts_distinct_videos(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();

    // Two matching tags on one video must count it once.
    let both = VideoRepo::create(&pool, &new_video(author.id, "Both tags", HASH_A))
        .await
        .unwrap();
    TagRepo::set_for_video(&pool, both.id, &["xrock".into(), "xlive".into()])
        .await
        .unwrap();

    let one = VideoRepo::create(&pool, &new_video(author.id, "One tag", HASH_B))
        .await
        .unwrap();
    TagRepo::set_for_video(&pool, one.id, &["xjazz".into()]).await.unwrap();

    let none = VideoRepo::create(&pool, &new_video(author.id, "No match", HASH_B))
        .await
        .unwrap();
    TagRepo::set_for_video(&pool, none.id, &["metal".into()]).await.unwrap();

    let (rows, total) = search(&pool, "tags", "x").await;
    assert_eq!(total, 2);
    assert_eq!(rows.len(), 2);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Both tags"));
    assert!(names.contains(&"One tag"));

    // Tag names are case-sensitive substrings.
    let (_, total) = search(&pool, "tags", "X").await;
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn magnet_search_matches_info_hash_only(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let target = VideoRepo::create(&pool, &new_video(author.id, "Target", HASH_A))
        .await
        .unwrap();
    VideoRepo::create(&pool, &new_video(author.id, "Other", HASH_B))
        .await
        .unwrap();

    // The URI's embedded name and tracker are irrelevant to matching.
    let uri = format!("magnet:?xt=urn:btih:{HASH_A}&dn=Completely%20Different&tr=ws%3A%2F%2Fnowhere");
    let (rows, total) = search(&pool, "magnetUri", &uri).await;
    assert_eq!(total, 1);
    assert_eq!(rows[0].uuid, target.uuid);
}

#[sqlx::test(migrations = "../../migrations")]
async fn author_and_default_field_search(pool: PgPool) {
    let alice = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    let bob = AuthorRepo::find_or_create(&pool, "bob", None).await.unwrap();
    VideoRepo::create(&pool, &new_video(alice.id, "Mountain hike", HASH_A))
        .await
        .unwrap();
    VideoRepo::create(&pool, &new_video(bob.id, "Sea dive", HASH_B))
        .await
        .unwrap();

    let (rows, total) = search(&pool, "author", "ali").await;
    assert_eq!(total, 1);
    assert_eq!(rows[0].name, "Mountain hike");

    // Unknown field names fall back to a name substring filter.
    let (rows, total) = search(&pool, "whatever", "Sea").await;
    assert_eq!(total, 1);
    assert_eq!(rows[0].name, "Sea dive");

    let (_, total) = search(&pool, "name", "e").await;
    assert_eq!(total, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_pagination_and_sort(pool: PgPool) {
    let author = AuthorRepo::find_or_create(&pool, "alice", None).await.unwrap();
    for name in ["Alpha", "Beta", "Gamma"] {
        VideoRepo::create(&pool, &new_video(author.id, name, HASH_A))
            .await
            .unwrap();
    }

    let sort = Sort::parse(Some("name"));
    let page = VideoRepo::list(&pool, 0, 2, &sort).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "Alpha");
    assert_eq!(page[1].name, "Beta");

    let rest = VideoRepo::list(&pool, 2, 2, &sort).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].name, "Gamma");

    assert_eq!(VideoRepo::count(&pool).await.unwrap(), 3);
}
