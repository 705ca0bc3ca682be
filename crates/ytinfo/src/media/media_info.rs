use serde::{Serialize, Serializer, ser::SerializeStruct};

use super::{collection::StreamCollection, filename::safe_filename};
use crate::extractor::error::ExtractorError;

#[derive(Serialize, Debug)]
/// Result of one video lookup.
///
/// Every lookup builds its own `VideoInfo`; nothing is shared between lookups.
///
/// # Fields
///
/// * `video_id` - The identifier the lookup was made for, when known
/// * `title` - The video title, `None` when the response did not carry one
/// * `streams` - Decoded streams sorted by increasing quality
/// * `skipped` - Streams that were present in the response but could not be used
///
/// # Examples
///
/// ```rust
/// use ytinfo_parser::media::{StreamCollection, VideoInfo};
///
/// let info = VideoInfo {
///     video_id: Some("dQw4w9WgXcQ".to_string()),
///     title: Some("Sample: Video?".to_string()),
///     streams: StreamCollection::default(),
///     skipped: vec![],
/// };
/// assert_eq!(info.filename(), "Sample Video");
/// ```
pub struct VideoInfo {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub streams: StreamCollection,
    pub skipped: Vec<SkippedStream>,
}

impl VideoInfo {
    /// Sanitized title usable as a file name, falling back to the video id.
    pub fn filename(&self) -> String {
        self.title
            .as_deref()
            .and_then(safe_filename)
            .or_else(|| self.video_id.clone())
            .unwrap_or_else(|| "video".to_string())
    }

    /// Whether a stream was dropped because its scrambled signature had a
    /// length without a known transform. This usually means the platform
    /// rolled out a new cipher variant.
    pub fn has_unsupported_cipher(&self) -> bool {
        self.skipped
            .iter()
            .any(|s| matches!(s.reason, ExtractorError::UnsupportedCipherLength(_)))
    }
}

/// A stream from the response that did not make it into the collection.
#[derive(Debug)]
pub struct SkippedStream {
    // Position of the stream in the stream map
    pub index: usize,
    pub reason: ExtractorError,
}

impl Serialize for SkippedStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SkippedStream", 2)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("reason", &self.reason.to_string())?;
        state.end()
    }
}
