//! Pod configuration objects.
//!
//! Components receive these explicitly at construction rather than
//! reading ambient global state, which also makes per-test
//! configuration trivial.

use std::path::{Path, PathBuf};

/// URL path under which torrent descriptors are served statically.
pub const STATIC_TORRENTS_PATH: &str = "/static/torrents/";

/// URL path under which raw video files are served as web seeds.
pub const STATIC_WEBSEED_PATH: &str = "/static/webseed/";

/// URL path under which thumbnails are served statically.
pub const STATIC_THUMBNAILS_PATH: &str = "/static/thumbnails/";

/// URL path under which full-size previews are served statically.
pub const STATIC_PREVIEWS_PATH: &str = "/static/previews/";

/// Announce path on the tracker endpoint.
pub const TRACKER_ANNOUNCE_PATH: &str = "/tracker/announce";

// ---------------------------------------------------------------------------
// Storage directories
// ---------------------------------------------------------------------------

/// Per-artifact-type storage directories.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Raw uploaded media files.
    pub videos_dir: PathBuf,
    /// Torrent descriptors.
    pub torrents_dir: PathBuf,
    /// Thumbnails (kept for owned and mirrored videos alike).
    pub thumbnails_dir: PathBuf,
    /// Full-size preview images (owned videos only).
    pub previews_dir: PathBuf,
}

impl StorageConfig {
    /// Load directories from environment variables with defaults.
    ///
    /// | Env Var          | Default              |
    /// |------------------|----------------------|
    /// | `STORAGE_ROOT`   | `storage`            |
    pub fn from_env() -> Self {
        let root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into());
        Self::under_root(Path::new(&root))
    }

    /// Build the conventional layout under a single root directory.
    pub fn under_root(root: &Path) -> Self {
        Self {
            videos_dir: root.join("videos"),
            torrents_dir: root.join("torrents"),
            thumbnails_dir: root.join("thumbnails"),
            previews_dir: root.join("previews"),
        }
    }
}

// ---------------------------------------------------------------------------
// Origins
// ---------------------------------------------------------------------------

/// This pod's public HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `http` or `https`.
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
}

impl WebConfig {
    /// Load from `WEB_SCHEME` / `WEB_HOSTNAME` / `WEB_PORT`
    /// (defaults: `http`, `localhost`, `9000`).
    pub fn from_env() -> Self {
        Self {
            scheme: std::env::var("WEB_SCHEME").unwrap_or_else(|_| "http".into()),
            hostname: std::env::var("WEB_HOSTNAME").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("WEB_PORT")
                .unwrap_or_else(|_| "9000".into())
                .parse()
                .expect("WEB_PORT must be a valid u16"),
        }
    }

    /// Base HTTP origin, e.g. `http://localhost:9000`.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.hostname, self.port)
    }
}

/// This pod's tracker endpoint.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Tracker protocol scheme, e.g. `ws` or `wss`.
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
}

impl TrackerConfig {
    /// Load from `TRACKER_SCHEME` / `TRACKER_HOSTNAME` / `TRACKER_PORT`
    /// (defaults: `ws`, `localhost`, `9001`).
    pub fn from_env() -> Self {
        Self {
            scheme: std::env::var("TRACKER_SCHEME").unwrap_or_else(|_| "ws".into()),
            hostname: std::env::var("TRACKER_HOSTNAME").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("TRACKER_PORT")
                .unwrap_or_else(|_| "9001".into())
                .parse()
                .expect("TRACKER_PORT must be a valid u16"),
        }
    }

    /// Full announce URL, e.g. `ws://localhost:9001/tracker/announce`.
    pub fn announce_url(&self) -> String {
        format!(
            "{}://{}:{}{TRACKER_ANNOUNCE_PATH}",
            self.scheme, self.hostname, self.port
        )
    }
}

/// Everything a component needs to address this pod and its storage.
#[derive(Debug, Clone)]
pub struct PodConfig {
    pub web: WebConfig,
    pub tracker: TrackerConfig,
    pub storage: StorageConfig,
}

impl PodConfig {
    pub fn from_env() -> Self {
        Self {
            web: WebConfig::from_env(),
            tracker: TrackerConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_origin_format() {
        let web = WebConfig {
            scheme: "https".into(),
            hostname: "pod.example.com".into(),
            port: 443,
        };
        assert_eq!(web.origin(), "https://pod.example.com:443");
    }

    #[test]
    fn tracker_announce_url_format() {
        let tracker = TrackerConfig {
            scheme: "ws".into(),
            hostname: "pod.example.com".into(),
            port: 9001,
        };
        assert_eq!(
            tracker.announce_url(),
            "ws://pod.example.com:9001/tracker/announce"
        );
    }

    #[test]
    fn storage_layout_under_root() {
        let storage = StorageConfig::under_root(Path::new("/data"));
        assert_eq!(storage.videos_dir, PathBuf::from("/data/videos"));
        assert_eq!(storage.torrents_dir, PathBuf::from("/data/torrents"));
        assert_eq!(storage.thumbnails_dir, PathBuf::from("/data/thumbnails"));
        assert_eq!(storage.previews_dir, PathBuf::from("/data/previews"));
    }
}
