use serde::Serialize;

use super::formats::Container;

/// Fixed attributes of a format identifier (itag).
///
/// Bitrates are kept as the labels the platform documents ("2-2.9", "N/A")
/// since the source data mixes exact values and ranges.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub itag: u32,
    pub extension: Container,
    pub resolution: &'static str,
    pub video_codec: &'static str,
    pub profile: &'static str,
    pub video_bitrate: &'static str,
    pub audio_codec: &'static str,
    pub audio_bitrate: &'static str,
}

impl FormatDescriptor {
    /// Vertical resolution parsed from the label, `None` for "N/A".
    pub fn height(&self) -> Option<u32> {
        resolution_height(self.resolution)
    }
}

/// Numeric part of a resolution label such as `"720p"`.
pub fn resolution_height(label: &str) -> Option<u32> {
    label.strip_suffix('p').and_then(|h| h.parse().ok())
}

macro_rules! format_entry {
    ($itag:expr, $ext:ident, $res:expr, $vcodec:expr, $profile:expr, $vbitrate:expr, $acodec:expr, $abitrate:expr) => {
        FormatDescriptor {
            itag: $itag,
            extension: Container::$ext,
            resolution: $res,
            video_codec: $vcodec,
            profile: $profile,
            video_bitrate: $vbitrate,
            audio_codec: $acodec,
            audio_bitrate: $abitrate,
        }
    };
}

static FORMAT_CATALOG: &[FormatDescriptor] = &[
    // Flash Video
    format_entry!(5, Flv, "240p", "Sorenson H.263", "N/A", "0.25", "MP3", "64"),
    format_entry!(6, Flv, "270p", "Sorenson H.263", "N/A", "0.8", "MP3", "64"),
    format_entry!(34, Flv, "360p", "H.264", "Main", "0.5", "AAC", "128"),
    format_entry!(35, Flv, "480p", "H.264", "Main", "0.8-1", "AAC", "128"),
    // 3GP
    format_entry!(36, ThreeGp, "240p", "MPEG-4 Visual", "Simple", "0.17", "AAC", "38"),
    format_entry!(13, ThreeGp, "N/A", "MPEG-4 Visual", "N/A", "0.5", "AAC", "N/A"),
    format_entry!(17, ThreeGp, "144p", "MPEG-4 Visual", "Simple", "0.05", "AAC", "24"),
    // MPEG-4
    format_entry!(18, Mp4, "360p", "H.264", "Baseline", "0.5", "AAC", "96"),
    format_entry!(22, Mp4, "720p", "H.264", "High", "2-2.9", "AAC", "192"),
    format_entry!(37, Mp4, "1080p", "H.264", "High", "3-4.3", "AAC", "192"),
    format_entry!(38, Mp4, "3072p", "H.264", "High", "3.5-5", "AAC", "192"),
    format_entry!(82, Mp4, "360p", "H.264", "3D", "0.5", "AAC", "96"),
    format_entry!(83, Mp4, "240p", "H.264", "3D", "0.5", "AAC", "96"),
    format_entry!(84, Mp4, "720p", "H.264", "3D", "2-2.9", "AAC", "152"),
    format_entry!(85, Mp4, "520p", "H.264", "3D", "2-2.9", "AAC", "152"),
    // WebM
    format_entry!(43, Webm, "360p", "VP8", "N/A", "0.5", "Vorbis", "128"),
    format_entry!(44, Webm, "480p", "VP8", "N/A", "1", "Vorbis", "128"),
    format_entry!(45, Webm, "720p", "VP8", "N/A", "2", "Vorbis", "192"),
    format_entry!(46, Webm, "1080p", "VP8", "N/A", "N/A", "Vorbis", "192"),
    format_entry!(100, Webm, "360p", "VP8", "3D", "N/A", "Vorbis", "128"),
    format_entry!(101, Webm, "360p", "VP8", "3D", "N/A", "Vorbis", "192"),
    format_entry!(102, Webm, "720p", "VP8", "3D", "N/A", "Vorbis", "192"),
];

/// Resolve a format identifier. Unknown identifiers are expected (the platform
/// adds formats over time) and simply yield `None`.
pub fn lookup(itag: u32) -> Option<&'static FormatDescriptor> {
    FORMAT_CATALOG.iter().find(|format| format.itag == itag)
}

/// Every known format, in table order.
pub fn all() -> &'static [FormatDescriptor] {
    FORMAT_CATALOG
}
