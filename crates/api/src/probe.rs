//! Video duration probing for upload checks.

use async_trait::async_trait;

/// Reads the duration of an uploaded video.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Duration in seconds, or `None` when it cannot be read.
    async fn video_duration_secs(&self, data: &[u8]) -> Option<f64>;
}

/// Probe backed by the `ffprobe` binary.
pub struct FfprobeProbe {
    ffprobe_bin: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn video_duration_secs(&self, data: &[u8]) -> Option<f64> {
        match artlab_core::ffmpeg::probe_duration_secs(&self.ffprobe_bin, data).await {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::warn!(error = %e, bytes = data.len(), "Could not read video duration");
                None
            }
        }
    }
}

/// Probe reporting the same duration for every video.
#[derive(Debug, Clone, Copy)]
pub struct FixedDurationProbe(pub Option<f64>);

#[async_trait]
impl MediaProbe for FixedDurationProbe {
    async fn video_duration_secs(&self, _data: &[u8]) -> Option<f64> {
        self.0
    }
}
