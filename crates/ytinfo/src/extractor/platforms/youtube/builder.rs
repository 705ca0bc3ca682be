use crate::{
    extractor::{
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
        platforms::youtube::response::ResponseParser,
    },
    media::VideoInfo,
};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use tracing::{debug, info};

// Constants
const BASE_URL: &str = "http://www.youtube.com/get_video_info";
const DEFAULT_PARAMS: &[(&str, &str)] = &[("asv", "3"), ("el", "detailpage"), ("hl", "en_US")];

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:(?:www|m)\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

pub struct YouTube {
    pub extractor: Extractor,
    endpoint: String,
    age_restricted: bool,
}

impl YouTube {
    /// `url` is a watch url, a short or embed link, or a bare video id.
    pub fn new(url: String, client: Client) -> Self {
        let mut extractor = Extractor::new("YouTube", url, client);
        for (key, value) in DEFAULT_PARAMS {
            extractor.add_param(*key, *value);
        }

        Self {
            extractor,
            endpoint: BASE_URL.to_string(),
            age_restricted: false,
        }
    }

    /// Send the info request somewhere other than the public endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use the cipher variant for age-restricted videos.
    pub fn age_restricted(mut self, age_restricted: bool) -> Self {
        self.age_restricted = age_restricted;
        self
    }

    pub fn is_age_restricted(&self) -> bool {
        self.age_restricted
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Extract the video id without cloning
    pub fn video_id(&self) -> Result<&str, ExtractorError> {
        let url = self.extractor.url.trim();
        if VIDEO_ID_REGEX.is_match(url) {
            return Ok(url);
        }
        URL_REGEX
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                ExtractorError::InvalidUrl(format!("no video id in {:?}", self.extractor.url))
            })
    }
}

#[async_trait]
impl PlatformExtractor for YouTube {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<VideoInfo, ExtractorError> {
        let video_id = self.video_id()?;

        let response = self
            .extractor
            .get(&self.endpoint)
            .query(&[("video_id", video_id)])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        debug!("Received {} bytes of video info for {}", body.len(), video_id);

        let mut video_info = ResponseParser::new(self.age_restricted).parse(&body)?;
        video_info.video_id = Some(video_id.to_string());

        info!(
            "Found {} streams for {} ({} skipped)",
            video_info.streams.len(),
            video_id,
            video_info.skipped.len()
        );
        Ok(video_info)
    }
}
