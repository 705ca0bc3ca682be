use super::{
    cipher::SignatureCipher, models::RawStream, query::QueryFields, stream_map::StreamMapDecoder,
};
use crate::{
    extractor::error::ExtractorError,
    media::{SkippedStream, StreamCollection, StreamDescriptor, VideoInfo, catalog},
};
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};
use tracing::{debug, warn};

const ERROR_FIELD: &str = "errorcode";
const REASON_FIELD: &str = "reason";
const TITLE_FIELD: &str = "title";
const VIDEO_ID_FIELD: &str = "video_id";
const UNKNOWN_ERROR: &str = "An unknown error has occurred";

static ITAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[?&])itag=(\d+)").unwrap());

/// Turns a `get_video_info` response body into a [`VideoInfo`].
///
/// Problems with the response as a whole (empty body, platform error, no
/// stream map) fail the lookup. Problems with a single stream only drop that
/// stream; it is reported in [`VideoInfo::skipped`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    cipher: SignatureCipher,
}

impl ResponseParser {
    pub fn new(age_restricted: bool) -> Self {
        Self {
            cipher: SignatureCipher::new(age_restricted),
        }
    }

    pub fn parse(&self, body: &str) -> Result<VideoInfo, ExtractorError> {
        if body.trim().is_empty() {
            return Err(ExtractorError::EmptyResponse);
        }

        let fields = QueryFields::parse(body);
        if fields.contains(ERROR_FIELD) {
            let reason = fields.last(REASON_FIELD).unwrap_or(UNKNOWN_ERROR);
            debug!(
                "Platform reported error {:?}: {}",
                fields.last(ERROR_FIELD),
                reason
            );
            return Err(ExtractorError::PlatformError(reason.to_string()));
        }

        let title = fields.scalar(TITLE_FIELD).map(str::to_string);
        let entries = StreamMapDecoder::from_fields(&fields)?;

        let mut streams = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            match entry.and_then(|raw| self.resolve_stream(&raw)) {
                Ok(stream) => {
                    debug!("Stream {}: {}", index, stream);
                    streams.push(stream);
                }
                Err(reason) => {
                    match &reason {
                        ExtractorError::UnsupportedCipherLength(_) => {
                            warn!("Skipping stream {}: {}", index, reason)
                        }
                        _ => debug!("Skipping stream {}: {}", index, reason),
                    }
                    skipped.push(SkippedStream { index, reason });
                }
            }
        }

        Ok(VideoInfo {
            video_id: fields.scalar(VIDEO_ID_FIELD).map(str::to_string),
            title,
            streams: StreamCollection::new(streams),
            skipped,
        })
    }

    /// Build the descriptor for one decoded stream.
    pub fn resolve_stream(&self, raw: &RawStream) -> Result<StreamDescriptor, ExtractorError> {
        let signature = self.resolve_signature(raw)?;
        if raw.url.is_empty() {
            return Err(ExtractorError::MalformedField("stream has no url".to_string()));
        }

        let itag = format_id(raw)?;
        let format = catalog::lookup(itag).ok_or(ExtractorError::UnknownFormat(itag))?;

        Ok(StreamDescriptor::new(
            append_signature(&raw.url, &signature),
            format,
        ))
    }

    fn resolve_signature<'a>(&self, raw: &'a RawStream) -> Result<Cow<'a, str>, ExtractorError> {
        if !raw.sig.is_empty() {
            Ok(Cow::Borrowed(&raw.sig))
        } else if !raw.s.is_empty() {
            self.cipher.descramble(&raw.s).map(Cow::Owned)
        } else {
            Err(ExtractorError::MissingSignature)
        }
    }
}

/// The format id embedded in the stream url, or the entry's own `itag`
/// field when the url has none. Conflicting ids reject the stream.
fn format_id(raw: &RawStream) -> Result<u32, ExtractorError> {
    let mut ids = ITAG_REGEX
        .captures_iter(&raw.url)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok());

    match ids.next() {
        Some(first) if ids.all(|id| id == first) => Ok(first),
        Some(_) => Err(ExtractorError::MissingFormatId),
        None => raw
            .itag
            .parse::<u32>()
            .map_err(|_| ExtractorError::MissingFormatId),
    }
}

fn append_signature(url: &str, signature: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}signature={signature}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Container;
    use url::form_urlencoded::Serializer;

    const SCRAMBLED: &str =
        "A4C123B1612DD272D1371C17149D439536B3216F.DAEEB975729FAE923D5A4FD12AABFE228F219E9C";
    const DESCRAMBLED: &str =
        "29E912F822EFBAA21DF4A5D3D9EAF927579BEEAC.F6123A6359B4D94171C1731D272DD2361B321C41";

    fn raw(itag: u32) -> RawStream {
        RawStream {
            itag: itag.to_string(),
            url: format!("http://r1.example.com/videoplayback?id=abc&itag={itag}&key=yt1"),
            quality: "medium".into(),
            fallback_host: "tc.example.com".into(),
            ..Default::default()
        }
    }

    fn signed(itag: u32, sig: &str) -> RawStream {
        RawStream {
            sig: sig.into(),
            ..raw(itag)
        }
    }

    fn scrambled(itag: u32, s: &str) -> RawStream {
        RawStream {
            s: s.into(),
            ..raw(itag)
        }
    }

    fn body(streams: &[RawStream], extra: &[(&str, &str)]) -> String {
        let mut serializer = Serializer::new(String::new());
        serializer.append_pair("status", "ok");
        for (key, value) in extra {
            serializer.append_pair(key, value);
        }
        serializer.append_pair(
            "url_encoded_fmt_stream_map",
            &StreamMapDecoder::encode(streams),
        );
        serializer.finish()
    }

    fn itags(info: &VideoInfo) -> Vec<u32> {
        info.streams.iter().map(|s| s.format_id).collect()
    }

    #[test]
    fn test_platform_error_with_reason() {
        let result = ResponseParser::default()
            .parse("status=fail&errorcode=150&reason=private+video");
        match result {
            Err(ExtractorError::PlatformError(reason)) => assert_eq!(reason, "private video"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_platform_error_wins_over_streams() {
        let mut response = body(&[signed(22, "SIG")], &[]);
        response.push_str("&errorcode=100&reason=This+video+is+unavailable.");
        match ResponseParser::default().parse(&response) {
            Err(ExtractorError::PlatformError(reason)) => {
                assert_eq!(reason, "This video is unavailable.")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_platform_error_without_reason() {
        match ResponseParser::default().parse("status=fail&errorcode=2") {
            Err(ExtractorError::PlatformError(reason)) => assert_eq!(reason, UNKNOWN_ERROR),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_response() {
        for response in ["", "   ", "\n"] {
            assert!(matches!(
                ResponseParser::default().parse(response),
                Err(ExtractorError::EmptyResponse)
            ));
        }
    }

    #[test]
    fn test_missing_stream_map() {
        assert!(matches!(
            ResponseParser::default().parse("status=ok&title=Something"),
            Err(ExtractorError::NoStreamMap)
        ));
    }

    #[test]
    fn test_title() {
        let parser = ResponseParser::default();
        let info = parser
            .parse(&body(&[signed(22, "SIG")], &[("title", "Rock & Roll = Fun")]))
            .unwrap();
        assert_eq!(info.title.as_deref(), Some("Rock & Roll = Fun"));

        let info = parser.parse(&body(&[signed(22, "SIG")], &[])).unwrap();
        assert_eq!(info.title, None);

        let info = parser
            .parse(&body(
                &[signed(22, "SIG")],
                &[("title", "first"), ("title", "second")],
            ))
            .unwrap();
        assert_eq!(info.title.as_deref(), Some("first"));
    }

    #[test]
    fn test_video_id_from_response() {
        let info = ResponseParser::default()
            .parse(&body(&[signed(22, "SIG")], &[("video_id", "abcdefghijk")]))
            .unwrap();
        assert_eq!(info.video_id.as_deref(), Some("abcdefghijk"));
    }

    #[test]
    fn test_direct_signature_is_used_verbatim() {
        let info = ResponseParser::default()
            .parse(&body(&[signed(22, "ABC.DEF")], &[]))
            .unwrap();
        assert_eq!(info.streams.len(), 1);
        let stream = info.streams.best().unwrap();
        assert_eq!(
            stream.url,
            "http://r1.example.com/videoplayback?id=abc&itag=22&key=yt1&signature=ABC.DEF"
        );
        assert_eq!(stream.extension, Container::Mp4);
        assert_eq!(stream.resolution, "720p");
        assert_eq!(stream.format_id, 22);
        assert!(info.skipped.is_empty());
    }

    #[test]
    fn test_direct_signature_takes_precedence() {
        let stream = RawStream {
            sig: "CLEAR".into(),
            s: SCRAMBLED.into(),
            ..raw(18)
        };
        let info = ResponseParser::default().parse(&body(&[stream], &[])).unwrap();
        assert!(info.streams.best().unwrap().url.ends_with("&signature=CLEAR"));
    }

    #[test]
    fn test_scrambled_signature_is_descrambled() {
        let info = ResponseParser::default()
            .parse(&body(&[scrambled(18, SCRAMBLED)], &[]))
            .unwrap();
        let stream = info.streams.best().unwrap();
        assert_eq!(
            stream.url,
            format!("http://r1.example.com/videoplayback?id=abc&itag=18&key=yt1&signature={DESCRAMBLED}")
        );
    }

    #[test]
    fn test_mixed_signatures_resolve_per_stream() {
        let info = ResponseParser::default()
            .parse(&body(
                &[signed(22, "CLEAR"), scrambled(43, SCRAMBLED), signed(18, "OTHER")],
                &[],
            ))
            .unwrap();
        assert_eq!(itags(&info), vec![43, 18, 22]);
        let urls: Vec<&str> = info.streams.iter().map(|s| s.url.as_str()).collect();
        assert!(urls[0].ends_with(&format!("signature={DESCRAMBLED}")));
        assert!(urls[1].ends_with("signature=OTHER"));
        assert!(urls[2].ends_with("signature=CLEAR"));
    }

    #[test]
    fn test_unknown_format_is_dropped() {
        let info = ResponseParser::default()
            .parse(&body(
                &[signed(22, "A"), signed(137, "B"), signed(18, "C")],
                &[],
            ))
            .unwrap();
        assert_eq!(itags(&info), vec![18, 22]);
        assert_eq!(info.skipped.len(), 1);
        assert_eq!(info.skipped[0].index, 1);
        assert!(matches!(
            info.skipped[0].reason,
            ExtractorError::UnknownFormat(137)
        ));
    }

    #[test]
    fn test_unsupported_cipher_length_only_drops_its_stream() {
        let info = ResponseParser::default()
            .parse(&body(
                &[scrambled(22, "TOO.SHORT"), signed(18, "C")],
                &[],
            ))
            .unwrap();
        assert_eq!(itags(&info), vec![18]);
        assert!(info.has_unsupported_cipher());
        assert!(matches!(
            info.skipped[0].reason,
            ExtractorError::UnsupportedCipherLength(9)
        ));
    }

    #[test]
    fn test_stream_without_signature_is_dropped() {
        let info = ResponseParser::default()
            .parse(&body(&[raw(22), signed(18, "C")], &[]))
            .unwrap();
        assert_eq!(itags(&info), vec![18]);
        assert!(matches!(
            info.skipped[0].reason,
            ExtractorError::MissingSignature
        ));
    }

    #[test]
    fn test_malformed_entry_is_dropped() {
        let response = format!(
            "status=ok&url_encoded_fmt_stream_map={}",
            urlencoding::encode(
                "itag=22&broken&sig=A&url=http%3A%2F%2Fx%3Fitag%3D22,itag=18&sig=B&url=http%3A%2F%2Fy%3Fitag%3D18"
            )
        );
        let info = ResponseParser::default().parse(&response).unwrap();
        assert_eq!(itags(&info), vec![18]);
        assert_eq!(info.streams.best().unwrap().url, "http://y?itag=18&signature=B");
        assert!(matches!(
            info.skipped[0].reason,
            ExtractorError::MalformedField(_)
        ));
    }

    #[test]
    fn test_zero_usable_streams_is_not_an_error() {
        let info = ResponseParser::default()
            .parse(&body(&[signed(137, "A"), raw(22)], &[]))
            .unwrap();
        assert!(info.streams.is_empty());
        assert_eq!(info.skipped.len(), 2);

        // a blank stream map counts as missing
        let err = ResponseParser::default()
            .parse("status=ok&url_encoded_fmt_stream_map=&title=x")
            .unwrap_err();
        assert!(matches!(err, ExtractorError::NoStreamMap));
    }

    #[test]
    fn test_output_is_sorted() {
        let info = ResponseParser::default()
            .parse(&body(
                &[
                    signed(37, "A"),
                    signed(5, "B"),
                    signed(45, "C"),
                    signed(17, "D"),
                    signed(22, "E"),
                    signed(43, "F"),
                ],
                &[],
            ))
            .unwrap();
        assert_eq!(itags(&info), vec![17, 5, 43, 45, 22, 37]);
    }

    #[test]
    fn test_age_restricted_parser() {
        let s86 = "EEE65F53E9421CE50211670EAE679F02E8D28A79023.C39C200661FCCD268A29A0D347301EF56E64DC3CD6";
        let response = body(&[scrambled(22, s86)], &[]);

        let standard = ResponseParser::default().parse(&response).unwrap();
        assert!(standard.streams.best().unwrap().url.ends_with(
            "signature=D46E65FE003743D0A92A862DCCF166002C93C.32017A82D8E20F976EAE07611235EC1249E35F56EEE"
        ));

        let restricted = ResponseParser::new(true).parse(&response).unwrap();
        assert!(restricted.streams.best().unwrap().url.ends_with(
            "signature=E65F53E9421CE50211670EAE679F02E8D28A79023.C39C200661FCCD268A23A0D347301EF56E64DC9"
        ));
    }

    #[test]
    fn test_format_id_falls_back_to_field() {
        let stream = RawStream {
            url: "http://x/videoplayback".into(),
            ..signed(43, "SIG")
        };
        let info = ResponseParser::default().parse(&body(&[stream], &[])).unwrap();
        let stream = info.streams.best().unwrap();
        assert_eq!(stream.format_id, 43);
        assert_eq!(stream.url, "http://x/videoplayback?signature=SIG");
    }

    #[test]
    fn test_format_id() {
        let mut stream = raw(22);
        assert_eq!(format_id(&stream).unwrap(), 22);

        // the url wins over the field
        stream.itag = "18".into();
        assert_eq!(format_id(&stream).unwrap(), 22);

        stream.url = "http://x/videoplayback?itag=22&foo=1&itag=22".into();
        assert_eq!(format_id(&stream).unwrap(), 22);

        stream.url = "http://x/videoplayback?itag=22&itag=18".into();
        assert!(matches!(
            format_id(&stream),
            Err(ExtractorError::MissingFormatId)
        ));

        // "xitag" is a different parameter
        stream.url = "http://x/videoplayback?xitag=5".into();
        stream.itag = String::new();
        assert!(matches!(
            format_id(&stream),
            Err(ExtractorError::MissingFormatId)
        ));
    }

    #[test]
    fn test_append_signature() {
        assert_eq!(append_signature("http://x?a=1", "S"), "http://x?a=1&signature=S");
        assert_eq!(append_signature("http://x", "S"), "http://x?signature=S");
    }
}
