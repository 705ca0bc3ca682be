use serde::{Deserialize, Serialize};

/// Fields of one entry of `url_encoded_fmt_stream_map`, percent-decoded.
///
/// Keys missing from an entry stay empty so that every record describes
/// exactly one stream.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStream {
    // scrambled signature
    pub s: String,
    pub itag: String,
    pub url: String,
    pub quality: String,
    pub fallback_host: String,
    // clear signature
    pub sig: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl RawStream {
    /// Slot for a recognized key, `None` for keys the decoder ignores.
    pub(crate) fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "s" => Some(&mut self.s),
            "itag" => Some(&mut self.itag),
            "url" => Some(&mut self.url),
            "quality" => Some(&mut self.quality),
            "fallback_host" => Some(&mut self.fallback_host),
            "sig" => Some(&mut self.sig),
            "type" => Some(&mut self.mime_type),
            _ => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "s" => Some(&self.s),
            "itag" => Some(&self.itag),
            "url" => Some(&self.url),
            "quality" => Some(&self.quality),
            "fallback_host" => Some(&self.fallback_host),
            "sig" => Some(&self.sig),
            "type" => Some(&self.mime_type),
            _ => None,
        }
    }
}

/// Keys of a stream map entry the decoder keeps.
pub const STREAM_KEYS: [&str; 7] = ["s", "itag", "url", "quality", "fallback_host", "sig", "type"];
