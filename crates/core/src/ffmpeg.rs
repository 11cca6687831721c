//! FFmpeg/FFprobe media collaborators.
//!
//! The pipeline treats media probing and frame extraction as opaque
//! services; this module shells out to `ffprobe`/`ffmpeg` and parses
//! just enough of their output.

use std::path::Path;

use serde::Deserialize;
use tokio::process::Command;

/// Fixed thumbnail dimensions.
pub const THUMBNAIL_SIZE: FrameSize = FrameSize {
    width: 200,
    height: 110,
};

#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    /// The binary could not be spawned at all, usually not installed.
    #[error("could not run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },

    #[error("{tool} exited with {code:?}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("unusable ffprobe output: {0}")]
    Parse(String),

    #[error("media file not found: {0}")]
    MissingInput(String),
}

/// Output dimensions for an extracted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: i32,
    pub height: i32,
}

/// The slice of `ffprobe -show_format` JSON we care about.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe a media file's duration in whole seconds.
pub async fn probe_duration(path: &Path) -> Result<i64, FfmpegError> {
    require_input(path)?;

    let mut command = Command::new("ffprobe");
    command
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path);
    let stdout = run("ffprobe", command).await?;

    let probe = serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| FfmpegError::Parse(format!("{e}: {stdout}")))?;
    parse_duration_secs(probe.format.duration.as_deref())
}

/// Extract one representative frame into `output_dir/output_name`.
///
/// Passing a [`FrameSize`] resizes the frame (thumbnails); `None`
/// keeps the source dimensions (previews). Returns `output_name`.
pub async fn extract_frame(
    path: &Path,
    output_dir: &Path,
    output_name: &str,
    size: Option<FrameSize>,
) -> Result<String, FfmpegError> {
    require_input(path)?;
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| FfmpegError::Spawn {
            tool: "ffmpeg",
            source: e,
        })?;

    let mut command = Command::new("ffmpeg");
    command.args(["-y", "-i"]).arg(path).args(["-vframes", "1"]);
    if let Some(FrameSize { width, height }) = size {
        command.args(["-s", &format!("{width}x{height}")]);
    }
    command.args(["-q:v", "2"]).arg(output_dir.join(output_name));

    run("ffmpeg", command).await?;
    Ok(output_name.to_string())
}

fn require_input(path: &Path) -> Result<(), FfmpegError> {
    if path.exists() {
        Ok(())
    } else {
        Err(FfmpegError::MissingInput(
            path.to_string_lossy().to_string(),
        ))
    }
}

/// Spawn, wait, and surface a failing exit status, returning stdout.
async fn run(tool: &'static str, mut command: Command) -> Result<String, FfmpegError> {
    let output = command
        .output()
        .await
        .map_err(|source| FfmpegError::Spawn { tool, source })?;
    if !output.status.success() {
        return Err(FfmpegError::CommandFailed {
            tool,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Parse the `format.duration` string, rounding to whole seconds.
fn parse_duration_secs(duration: Option<&str>) -> Result<i64, FfmpegError> {
    let raw =
        duration.ok_or_else(|| FfmpegError::Parse("ffprobe output has no duration".into()))?;
    let secs = raw
        .parse::<f64>()
        .map_err(|e| FfmpegError::Parse(format!("invalid duration '{raw}': {e}")))?;
    Ok(secs.round() as i64)
}
