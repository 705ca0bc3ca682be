//! Decoding of the `url_encoded_fmt_stream_map` field.
//!
//! The field is a comma separated list of streams, each stream an
//! ampersand separated list of `key=value` pairs whose values are percent
//! encoded once more. Values regularly contain `&`, `=` and `,` of their own
//! (urls, signatures), so the map cannot go through a generic query string
//! decoder: the delimiters have to be split first and each value decoded
//! exactly once afterwards.

use super::{
    models::{RawStream, STREAM_KEYS},
    query::QueryFields,
};
use crate::extractor::error::ExtractorError;

pub const STREAM_MAP_FIELD: &str = "url_encoded_fmt_stream_map";

/// Decoded entry of the stream map. A failed entry keeps its slot so that the
/// entries after it keep their index.
pub type StreamEntry = Result<RawStream, ExtractorError>;

pub struct StreamMapDecoder;

impl StreamMapDecoder {
    /// Decode the value of the stream map field.
    pub fn decode(stream_map: &str) -> Vec<StreamEntry> {
        if stream_map.is_empty() {
            return Vec::new();
        }
        stream_map.split(',').map(Self::decode_entry).collect()
    }

    /// Locate the stream map in a raw response body and decode it.
    pub fn from_response(body: &str) -> Result<Vec<StreamEntry>, ExtractorError> {
        let fields = QueryFields::parse(body);
        Self::from_fields(&fields)
    }

    pub(crate) fn from_fields(fields: &QueryFields) -> Result<Vec<StreamEntry>, ExtractorError> {
        let stream_map = fields
            .first(STREAM_MAP_FIELD)
            .ok_or(ExtractorError::NoStreamMap)?;
        Ok(Self::decode(stream_map))
    }

    /// Decode a single `key=value&key=value` entry. Unknown keys are
    /// ignored; a repeated key keeps its last value.
    pub fn decode_entry(entry: &str) -> StreamEntry {
        let mut stream = RawStream::default();
        for pair in entry.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ExtractorError::MalformedField(format!("expected key=value, got {pair:?}"))
            })?;
            let Some(slot) = stream.field_mut(key) else {
                continue;
            };
            *slot = urlencoding::decode(value)
                .map_err(|e| ExtractorError::MalformedField(format!("{key}: {e}")))?
                .into_owned();
        }
        Ok(stream)
    }

    /// Inverse of [`StreamMapDecoder::decode`]: empty fields are omitted.
    pub fn encode(streams: &[RawStream]) -> String {
        streams
            .iter()
            .map(|stream| {
                STREAM_KEYS
                    .iter()
                    .filter_map(|key| {
                        let value = stream.field(key)?;
                        (!value.is_empty())
                            .then(|| format!("{key}={}", urlencoding::encode(value)))
                    })
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(entries: Vec<StreamEntry>) -> Vec<RawStream> {
        entries.into_iter().map(Result::unwrap).collect()
    }

    #[test]
    fn test_two_streams_stay_aligned() {
        let streams = ok(StreamMapDecoder::decode(
            "itag=18&url=http%3A%2F%2Fx,itag=22&url=http%3A%2F%2Fy",
        ));
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].itag, "18");
        assert_eq!(streams[0].url, "http://x");
        assert_eq!(streams[1].itag, "22");
        assert_eq!(streams[1].url, "http://y");
    }

    #[test]
    fn test_missing_key_leaves_empty_slot() {
        let streams = ok(StreamMapDecoder::decode(
            "itag=18&sig=AAA&url=http%3A%2F%2Fx,itag=22&url=http%3A%2F%2Fy,itag=43&sig=CCC&url=http%3A%2F%2Fz",
        ));
        let sigs: Vec<&str> = streams.iter().map(|s| s.sig.as_str()).collect();
        assert_eq!(sigs, ["AAA", "", "CCC"]);
        assert_eq!(streams[2].url, "http://z");
    }

    #[test]
    fn test_value_split_on_first_equals_only() {
        let streams = ok(StreamMapDecoder::decode("sig=abc==&itag=5"));
        assert_eq!(streams[0].sig, "abc==");
        assert_eq!(streams[0].itag, "5");
    }

    #[test]
    fn test_value_decoded_exactly_once() {
        // %2526 is an encoded "%26", which must survive as "%26"
        let streams = ok(StreamMapDecoder::decode(
            "url=http%3A%2F%2Fx%2Fvideoplayback%3Fitag%3D18%26id%3Da%2526b&type=video%2Fmp4%3B+codecs%3D%22avc1%22",
        ));
        assert_eq!(
            streams[0].url,
            "http://x/videoplayback?itag=18&id=a%26b"
        );
        // "+" is not a space at this layer
        assert_eq!(streams[0].mime_type, "video/mp4;+codecs=\"avc1\"");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let streams = ok(StreamMapDecoder::decode("itag=18&foo=bar&url=u"));
        assert_eq!(
            streams[0],
            RawStream {
                itag: "18".into(),
                url: "u".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_malformed_pair_only_fails_its_stream() {
        let entries = StreamMapDecoder::decode("itag=18&url=a,itag=22&broken&url=b,itag=43&url=c");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().unwrap().itag, "18");
        assert!(matches!(entries[1], Err(ExtractorError::MalformedField(_))));
        assert_eq!(entries[2].as_ref().unwrap().itag, "43");
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let entries = StreamMapDecoder::decode("itag=18&url=%FF%FE");
        assert!(matches!(entries[0], Err(ExtractorError::MalformedField(_))));
    }

    #[test]
    fn test_empty_map_and_stray_ampersands() {
        assert!(StreamMapDecoder::decode("").is_empty());
        let streams = ok(StreamMapDecoder::decode("&itag=18&&url=a&"));
        assert_eq!(streams[0].itag, "18");
        assert_eq!(streams[0].url, "a");
    }

    #[test]
    fn test_encode_then_decode() {
        let original = vec![
            RawStream {
                itag: "22".into(),
                url: "http://r1.example.com/videoplayback?itag=22&sparams=id,ip&key=yt1".into(),
                quality: "hd720".into(),
                fallback_host: "tc.v1.cache.example.com".into(),
                sig: "ABC.DEF=".into(),
                mime_type: "video/mp4; codecs=\"avc1.64001F, mp4a.40.2\"".into(),
                ..Default::default()
            },
            RawStream {
                s: "4D6A1C.9E0B8F".into(),
                itag: "43".into(),
                url: "http://r2.example.com/videoplayback?itag=43".into(),
                quality: "medium".into(),
                mime_type: "video/webm; codecs=\"vp8.0, vorbis\"".into(),
                ..Default::default()
            },
        ];
        let encoded = StreamMapDecoder::encode(&original);
        assert_eq!(encoded.matches(',').count(), 1);
        assert_eq!(ok(StreamMapDecoder::decode(&encoded)), original);
    }

    #[test]
    fn test_from_response() {
        let body = "status=ok&url_encoded_fmt_stream_map=itag%3D18%26url%3Dhttp%253A%252F%252Fx%2Citag%3D22%26url%3Dhttp%253A%252F%252Fy&title=t";
        let streams = ok(StreamMapDecoder::from_response(body).unwrap());
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].url, "http://x");
        assert_eq!(streams[1].itag, "22");
    }

    #[test]
    fn test_from_response_without_map() {
        assert!(matches!(
            StreamMapDecoder::from_response("status=ok&title=t"),
            Err(ExtractorError::NoStreamMap)
        ));
    }
}
