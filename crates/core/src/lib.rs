//! Domain logic for the vidpod backend.
//!
//! This crate has no internal dependencies and holds the pure pieces of
//! the video lifecycle: deterministic artifact naming, the magnet and
//! torrent codecs, ffmpeg/ffprobe wrappers, search-field dispatch, and
//! field-level validation rules.

pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod identity;
pub mod infohash;
pub mod magnet;
pub mod search;
pub mod torrent;
pub mod types;
pub mod video_rules;
