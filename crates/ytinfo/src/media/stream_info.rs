use crate::media::{Container, FormatDescriptor, catalog::resolution_height};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single playable stream.
///
/// Streams are totally ordered by increasing quality: resolution height
/// ("N/A" lowest), then container rank, then format id. The URL and the
/// remaining fields only break ties between otherwise identical entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    // Base url with the signature appended
    pub url: String,
    pub extension: Container,
    // e.g. "720p", or "N/A" for formats without a fixed size
    pub resolution: String,
    pub video_codec: String,
    pub profile: String,
    // Approximate bitrate in Mbit/s, may be a range like "2-2.9"
    pub video_bitrate: String,
    pub audio_codec: String,
    // Audio bitrate in kbit/s
    pub audio_bitrate: String,
    pub format_id: u32,
}

impl StreamDescriptor {
    pub fn new(url: String, format: &FormatDescriptor) -> Self {
        Self {
            url,
            extension: format.extension,
            resolution: format.resolution.to_string(),
            video_codec: format.video_codec.to_string(),
            profile: format.profile.to_string(),
            video_bitrate: format.video_bitrate.to_string(),
            audio_codec: format.audio_codec.to_string(),
            audio_bitrate: format.audio_bitrate.to_string(),
            format_id: format.itag,
        }
    }

    pub fn height(&self) -> Option<u32> {
        resolution_height(&self.resolution)
    }

    /// File name for this stream given an already sanitized base name.
    pub fn filename(&self, base: &str) -> String {
        format!("{base}{}", self.extension.extension())
    }

    #[allow(clippy::type_complexity)]
    fn sort_key(
        &self,
    ) -> (
        u32,
        Container,
        u32,
        &str,
        &str,
        &str,
        &str,
        &str,
        &str,
        &str,
    ) {
        (
            self.height().unwrap_or(0),
            self.extension,
            self.format_id,
            &self.url,
            &self.resolution,
            &self.video_codec,
            &self.profile,
            &self.video_bitrate,
            &self.audio_codec,
            &self.audio_bitrate,
        )
    }
}

impl Ord for StreamDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for StreamDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} [{} {} / {}]",
            self.format_id,
            self.extension,
            self.resolution,
            self.video_codec,
            self.profile,
            self.audio_codec
        )
    }
}
