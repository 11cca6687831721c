pub mod remote_videos;
pub mod videos;
