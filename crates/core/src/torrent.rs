//! Torrent descriptor codec.
//!
//! Builds a v1 single-file torrent descriptor for a raw media file and
//! recovers the info-hash from descriptor bytes. The info-hash is the
//! SHA-1 of the bencoded `info` dictionary, rendered as lowercase hex.

use std::path::Path;

use sha1::{Digest, Sha1};

/// Piece length used for locally encoded torrents (256 KiB).
const PIECE_LENGTH: usize = 256 * 1024;

/// Error type for torrent encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum TorrentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse torrent descriptor: {0}")]
    Parse(String),
}

/// Announce and web-seed endpoints embedded in the descriptor.
#[derive(Debug, Clone)]
pub struct TorrentOptions {
    /// Tracker announce URLs. The first entry doubles as the top-level
    /// `announce` key.
    pub announce_list: Vec<String>,
    /// HTTP web-seed URLs (`url-list`).
    pub url_list: Vec<String>,
}

/// The fields recovered from a descriptor by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentSummary {
    /// 40-char lowercase hex SHA-1 of the bencoded info dictionary.
    pub info_hash: String,
    /// File name from the info dictionary.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a torrent descriptor for the file at `path`.
///
/// `name` is the file name stored in the info dictionary (the video
/// file name, not the on-disk path). The file is read in full and
/// hashed in [`PIECE_LENGTH`] pieces.
pub async fn encode(
    path: &Path,
    name: &str,
    options: &TorrentOptions,
) -> Result<Vec<u8>, TorrentError> {
    let data = tokio::fs::read(path).await?;
    Ok(encode_bytes(&data, name, options))
}

/// Encode a descriptor from in-memory file contents.
pub fn encode_bytes(data: &[u8], name: &str, options: &TorrentOptions) -> Vec<u8> {
    let mut pieces = Vec::with_capacity((data.len() / PIECE_LENGTH + 1) * 20);
    for chunk in data.chunks(PIECE_LENGTH) {
        pieces.extend_from_slice(&Sha1::digest(chunk));
    }
    // An empty file still carries one (empty-input) piece digest so the
    // descriptor stays structurally valid.
    if data.is_empty() {
        pieces.extend_from_slice(&Sha1::digest([]));
    }

    // Bencode dictionary keys must appear in lexicographic order:
    // announce < announce-list < info < url-list.
    let mut out = Vec::new();
    out.push(b'd');

    if let Some(primary) = options.announce_list.first() {
        write_bytes(&mut out, b"announce");
        write_bytes(&mut out, primary.as_bytes());
    }

    write_bytes(&mut out, b"announce-list");
    out.push(b'l');
    for tracker in &options.announce_list {
        out.push(b'l');
        write_bytes(&mut out, tracker.as_bytes());
        out.push(b'e');
    }
    out.push(b'e');

    write_bytes(&mut out, b"info");
    out.push(b'd');
    write_bytes(&mut out, b"length");
    write_int(&mut out, data.len() as i64);
    write_bytes(&mut out, b"name");
    write_bytes(&mut out, name.as_bytes());
    write_bytes(&mut out, b"piece length");
    write_int(&mut out, PIECE_LENGTH as i64);
    write_bytes(&mut out, b"pieces");
    write_bytes(&mut out, &pieces);
    out.push(b'e');

    write_bytes(&mut out, b"url-list");
    out.push(b'l');
    for url in &options.url_list {
        write_bytes(&mut out, url.as_bytes());
    }
    out.push(b'e');

    out.push(b'e');
    out
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

fn write_int(out: &mut Vec<u8>, value: i64) {
    out.push(b'i');
    out.extend_from_slice(value.to_string().as_bytes());
    out.push(b'e');
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a torrent descriptor, recovering its info-hash and name.
pub fn decode(bytes: &[u8]) -> Result<TorrentSummary, TorrentError> {
    let mut parser = Parser { data: bytes, pos: 0 };

    parser.expect(b'd')?;
    let mut summary = None;

    while parser.peek()? != b'e' {
        let key = parser.parse_bytes()?;
        if key == b"info" {
            let start = parser.pos;
            let name = parser.parse_info_dict()?;
            let end = parser.pos;
            let info_hash = hex::encode(Sha1::digest(&bytes[start..end]));
            summary = Some(TorrentSummary { info_hash, name });
        } else {
            parser.skip_value()?;
        }
    }

    summary.ok_or_else(|| TorrentError::Parse("descriptor has no info dictionary".into()))
}

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Result<u8, TorrentError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| TorrentError::Parse("unexpected end of input".into()))
    }

    fn next(&mut self) -> Result<u8, TorrentError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, byte: u8) -> Result<(), TorrentError> {
        let got = self.next()?;
        if got != byte {
            return Err(TorrentError::Parse(format!(
                "expected '{}' at offset {}, got '{}'",
                byte as char,
                self.pos - 1,
                got as char
            )));
        }
        Ok(())
    }

    /// Parse a length-prefixed byte string.
    fn parse_bytes(&mut self) -> Result<&'a [u8], TorrentError> {
        let mut len: usize = 0;
        let mut saw_digit = false;
        while self.peek()?.is_ascii_digit() {
            saw_digit = true;
            let digit = (self.next()? - b'0') as usize;
            len = len
                .checked_mul(10)
                .and_then(|l| l.checked_add(digit))
                .ok_or_else(|| TorrentError::Parse("string length overflow".into()))?;
        }
        if !saw_digit {
            return Err(TorrentError::Parse(format!(
                "expected string length at offset {}",
                self.pos
            )));
        }
        self.expect(b':')?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&e| e <= self.data.len())
            .ok_or_else(|| TorrentError::Parse("string runs past end of input".into()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Parse the info dictionary, returning its `name` entry.
    fn parse_info_dict(&mut self) -> Result<String, TorrentError> {
        self.expect(b'd')?;
        let mut name = None;
        while self.peek()? != b'e' {
            let key = self.parse_bytes()?;
            if key == b"name" {
                let value = self.parse_bytes()?;
                name = Some(String::from_utf8_lossy(value).into_owned());
            } else {
                self.skip_value()?;
            }
        }
        self.expect(b'e')?;
        name.ok_or_else(|| TorrentError::Parse("info dictionary has no name".into()))
    }

    /// Skip over one bencoded value of any type.
    fn skip_value(&mut self) -> Result<(), TorrentError> {
        match self.peek()? {
            b'i' => {
                self.next()?;
                while self.next()? != b'e' {}
                Ok(())
            }
            b'l' => {
                self.next()?;
                while self.peek()? != b'e' {
                    self.skip_value()?;
                }
                self.next()?;
                Ok(())
            }
            b'd' => {
                self.next()?;
                while self.peek()? != b'e' {
                    self.parse_bytes()?;
                    self.skip_value()?;
                }
                self.next()?;
                Ok(())
            }
            b'0'..=b'9' => {
                self.parse_bytes()?;
                Ok(())
            }
            other => Err(TorrentError::Parse(format!(
                "unexpected byte '{}' at offset {}",
                other as char, self.pos
            ))),
        }
    }
}
