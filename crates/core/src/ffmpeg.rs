//! FFprobe wrapper for reading the duration of uploaded videos.
//!
//! Uploads arrive as in-memory buffers, so the bytes are streamed to
//! `ffprobe` on stdin (`-i pipe:0`) instead of being written to disk first.

use std::process::Stdio;

use serde::Deserialize;
use tokio::io::AsyncWriteExt;

/// Error type for FFprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffprobe binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    pub format: FfprobeFormat,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
    pub format_name: Option<String>,
}

impl FfprobeOutput {
    /// Container duration in seconds, if ffprobe reported a parseable one.
    pub fn duration_secs(&self) -> Option<f64> {
        self.format
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

/// Parse the JSON printed by ffprobe.
pub fn parse_probe_output(stdout: &str) -> Result<FfprobeOutput, FfmpegError> {
    serde_json::from_str::<FfprobeOutput>(stdout)
        .map_err(|e| FfmpegError::ParseError(format!("{e}: {stdout}")))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run `ffprobe` over an in-memory media buffer.
///
/// `ffprobe_bin` is the binary to execute (usually just `"ffprobe"`).
/// ffprobe may stop reading once it has seen the container header, so a
/// broken pipe while feeding stdin is not an error.
pub async fn probe_bytes(ffprobe_bin: &str, data: &[u8]) -> Result<FfprobeOutput, FfmpegError> {
    let mut child = tokio::process::Command::new(ffprobe_bin)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-i",
            "pipe:0",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(FfmpegError::NotFound)?;

    if let Some(mut stdin) = child.stdin.take() {
        let buffer = data.to_vec();
        tokio::spawn(async move {
            // Closing stdin (by drop) signals EOF to ffprobe.
            let _ = stdin.write_all(&buffer).await;
        });
    }

    let output = child.wait_with_output().await?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Duration of an in-memory video in seconds.
pub async fn probe_duration_secs(ffprobe_bin: &str, data: &[u8]) -> Result<f64, FfmpegError> {
    let output = probe_bytes(ffprobe_bin, data).await?;
    output
        .duration_secs()
        .ok_or_else(|| FfmpegError::ParseError("ffprobe reported no duration".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_duration() {
        let out = parse_probe_output(
            r#"{"format": {"duration": "612.480000", "format_name": "mov,mp4,m4a"}}"#,
        )
        .unwrap();
        assert_eq!(out.duration_secs(), Some(612.48));
        assert_eq!(out.format.format_name.as_deref(), Some("mov,mp4,m4a"));
    }

    #[test]
    fn missing_or_bad_duration_is_none() {
        let out = parse_probe_output(r#"{"format": {}}"#).unwrap();
        assert_eq!(out.duration_secs(), None);
        let out = parse_probe_output(r#"{"format": {"duration": "N/A"}}"#).unwrap();
        assert_eq!(out.duration_secs(), None);
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(matches!(
            parse_probe_output("not json"),
            Err(FfmpegError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let err = probe_bytes("/nonexistent/ffprobe-for-tests", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, FfmpegError::NotFound(_)));
    }
}
