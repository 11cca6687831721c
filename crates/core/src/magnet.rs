//! Magnet descriptor codec and builder.
//!
//! A magnet descriptor is the self-contained locator handed to peers:
//! info-hash (`xt`), display name (`dn`), tracker announce (`tr`),
//! web-seed (`ws`) and torrent descriptor URL (`xs`). Encoding is pure;
//! no I/O happens here.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

use crate::config::{TrackerConfig, WebConfig, STATIC_TORRENTS_PATH, STATIC_WEBSEED_PATH, TRACKER_ANNOUNCE_PATH};
use crate::error::CoreError;
use crate::identity::{self, Ownership};
use crate::infohash;

/// Characters escaped in magnet URI query components (RFC 3986
/// unreserved characters pass through).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The fields carried by a magnet URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetDescriptor {
    /// Torrent descriptor URL (`xs`).
    pub xs: String,
    /// Tracker announce URLs (`tr`).
    pub announce: Vec<String>,
    /// Web-seed URLs (`ws`).
    pub url_list: Vec<String>,
    /// 40-char hex content identity (`xt=urn:btih:`).
    pub info_hash: String,
    /// Display name (`dn`).
    pub name: String,
}

impl MagnetDescriptor {
    /// Compose the descriptor for a video from its ownership state and
    /// this pod's configuration.
    ///
    /// Owned videos point at this pod's own web and tracker origins;
    /// mirrored videos point at the owning pod's authority, keeping the
    /// local schemes.
    pub fn for_video(
        ownership: &Ownership,
        uuid: Uuid,
        extname: &str,
        info_hash: &str,
        name: &str,
        web: &WebConfig,
        tracker: &TrackerConfig,
    ) -> Result<Self, CoreError> {
        infohash::validate(info_hash)?;

        let (http_origin, announce) = match ownership {
            Ownership::Owned => (web.origin(), tracker.announce_url()),
            Ownership::Mirrored { pod_host, .. } => (
                format!("{}://{pod_host}", web.scheme),
                format!("{}://{pod_host}{TRACKER_ANNOUNCE_PATH}", tracker.scheme),
            ),
        };

        let torrent_name = identity::torrent_file_name(ownership, uuid);
        let video_name = identity::video_file_name(ownership, uuid, extname);

        Ok(Self {
            xs: format!("{http_origin}{STATIC_TORRENTS_PATH}{torrent_name}"),
            announce: vec![announce],
            url_list: vec![format!("{http_origin}{STATIC_WEBSEED_PATH}{video_name}")],
            info_hash: info_hash.to_string(),
            name: name.to_string(),
        })
    }

    /// Encode into a standard magnet URI string.
    ///
    /// Fails if the info-hash is not well-formed.
    pub fn encode(&self) -> Result<String, CoreError> {
        infohash::validate(&self.info_hash)?;

        let mut uri = format!("magnet:?xt=urn:btih:{}", self.info_hash);
        push_param(&mut uri, "dn", &self.name);
        for tr in &self.announce {
            push_param(&mut uri, "tr", tr);
        }
        for ws in &self.url_list {
            push_param(&mut uri, "ws", ws);
        }
        push_param(&mut uri, "xs", &self.xs);
        Ok(uri)
    }

    /// Decode a magnet URI back into its fields.
    ///
    /// Unknown parameters are ignored. Fails when the `xt` parameter is
    /// missing or carries a malformed info-hash.
    pub fn decode(uri: &str) -> Result<Self, CoreError> {
        let query = uri
            .strip_prefix("magnet:?")
            .ok_or_else(|| CoreError::Validation(format!("Not a magnet URI: '{uri}'")))?;

        let mut info_hash = None;
        let mut name = String::new();
        let mut announce = Vec::new();
        let mut url_list = Vec::new();
        let mut xs = String::new();

        for pair in query.split('&') {
            let (key, raw) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            let value = percent_decode_str(raw)
                .decode_utf8()
                .map_err(|e| CoreError::Validation(format!("Invalid magnet encoding: {e}")))?
                .into_owned();

            match key {
                "xt" => {
                    let hash = value.strip_prefix("urn:btih:").ok_or_else(|| {
                        CoreError::Validation(format!("Unsupported xt parameter '{value}'"))
                    })?;
                    info_hash = Some(hash.to_string());
                }
                "dn" => name = value,
                "tr" => announce.push(value),
                "ws" => url_list.push(value),
                "xs" => xs = value,
                _ => {}
            }
        }

        let info_hash = info_hash
            .ok_or_else(|| CoreError::Validation("Magnet URI has no xt parameter".into()))?;
        infohash::validate(&info_hash)?;

        Ok(Self {
            xs,
            announce,
            url_list,
            info_hash,
            name,
        })
    }
}

fn push_param(uri: &mut String, key: &str, value: &str) {
    uri.push('&');
    uri.push_str(key);
    uri.push('=');
    uri.push_str(&utf8_percent_encode(value, COMPONENT).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

    fn web() -> WebConfig {
        WebConfig {
            scheme: "http".into(),
            hostname: "localhost".into(),
            port: 9000,
        }
    }

    fn tracker() -> TrackerConfig {
        TrackerConfig {
            scheme: "ws".into(),
            hostname: "localhost".into(),
            port: 9001,
        }
    }

    fn demo() -> MagnetDescriptor {
        MagnetDescriptor {
            xs: "http://localhost:9000/static/torrents/abc.torrent".into(),
            announce: vec!["ws://localhost:9001/tracker/announce".into()],
            url_list: vec!["http://localhost:9000/static/webseed/abc.mp4".into()],
            info_hash: HASH.into(),
            name: "Demo video".into(),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let descriptor = demo();
        let uri = descriptor.encode().unwrap();
        let decoded = MagnetDescriptor::decode(&uri).unwrap();
        assert_eq!(decoded, descriptor);
    }

    #[test]
    fn encode_rejects_malformed_hash() {
        let mut descriptor = demo();
        descriptor.info_hash = "not-hex".into();
        assert!(descriptor.encode().is_err());
    }

    #[test]
    fn decode_requires_xt() {
        assert!(MagnetDescriptor::decode("magnet:?dn=hello").is_err());
        assert!(MagnetDescriptor::decode("http://example.com").is_err());
    }

    #[test]
    fn decode_ignores_unknown_params() {
        let uri = format!("magnet:?xt=urn:btih:{HASH}&dn=x&foo=bar");
        let decoded = MagnetDescriptor::decode(&uri).unwrap();
        assert_eq!(decoded.info_hash, HASH);
        assert_eq!(decoded.name, "x");
    }

    #[test]
    fn owned_video_uses_local_origins() {
        let uuid = Uuid::from_u128(5);
        let descriptor = MagnetDescriptor::for_video(
            &Ownership::Owned,
            uuid,
            ".mp4",
            HASH,
            "Demo",
            &web(),
            &tracker(),
        )
        .unwrap();
        assert_eq!(
            descriptor.xs,
            format!("http://localhost:9000/static/torrents/{uuid}.torrent")
        );
        assert_eq!(
            descriptor.announce,
            vec!["ws://localhost:9001/tracker/announce".to_string()]
        );
        assert_eq!(
            descriptor.url_list,
            vec![format!("http://localhost:9000/static/webseed/{uuid}.mp4")]
        );
    }

    #[test]
    fn mirrored_video_uses_peer_origins() {
        let uuid = Uuid::from_u128(5);
        let remote = Uuid::from_u128(6);
        let ownership = Ownership::Mirrored {
            remote_id: remote,
            pod_host: "peer.example.com:9000".into(),
        };
        let descriptor = MagnetDescriptor::for_video(
            &ownership, uuid, ".mp4", HASH, "Demo", &web(), &tracker(),
        )
        .unwrap();
        assert_eq!(
            descriptor.xs,
            format!("http://peer.example.com:9000/static/torrents/{remote}.torrent")
        );
        assert_eq!(
            descriptor.announce,
            vec![format!(
                "ws://peer.example.com:9000/tracker/announce"
            )]
        );
    }

    #[test]
    fn for_video_accepts_any_well_formed_hash() {
        // The builder only checks well-formedness; callers must never
        // hand it a record whose hash is still the placeholder.
        let descriptor = MagnetDescriptor::for_video(
            &Ownership::Owned,
            Uuid::from_u128(1),
            ".mp4",
            crate::infohash::INFO_HASH_PLACEHOLDER,
            "Demo",
            &web(),
            &tracker(),
        );
        assert!(descriptor.is_ok());
    }
}
