//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod author_repo;
pub mod pod_repo;
pub mod tag_repo;
pub mod video_repo;

pub use author_repo::AuthorRepo;
pub use pod_repo::PodRepo;
pub use tag_repo::TagRepo;
pub use video_repo::VideoRepo;
