use crate::extractor::default::DEFAULT_UA;
use crate::media::VideoInfo;

use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Shared request state of a platform extractor.
///
/// Holds the target url, the HTTP client and the headers and query
/// parameters attached to every request issued through [`Extractor::request`].
#[derive(Debug, Clone)]
pub struct Extractor {
    // url or id to extract from, e.g. "https://www.youtube.com/watch?v=..."
    pub url: String,
    // name of the platform, e.g. "YouTube"
    pub platform_name: String,
    // The reqwest client
    pub client: Client,
    // platform-specific headers and parameters
    platform_headers: HeaderMap,
    pub platform_params: FxHashMap<String, String>,
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            client,
            platform_headers: default_headers,
            platform_params: FxHashMap::default(),
        }
    }

    /// Set a header sent with every request. Invalid names or values are
    /// logged and ignored.
    pub fn add_header<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match (HeaderName::from_str(&key), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                self.platform_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", key, value),
        }
    }

    pub fn add_param<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.platform_params.insert(key.into(), value.into());
    }

    pub fn get_param(&self, key: &str) -> Option<&String> {
        self.platform_params.get(key)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request carrying the platform headers and parameters.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {} {:?}", method, url, self.platform_params);
        self.client
            .request(method, url)
            .headers(self.platform_headers.clone())
            .query(&self.platform_params)
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    fn get_platform_params(&self) -> &FxHashMap<String, String> {
        &self.get_extractor().platform_params
    }

    async fn extract(&self) -> Result<VideoInfo, ExtractorError>;
}
