use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("tls error: {0}")]
    TlsError(String),
    #[error("empty response")]
    EmptyResponse,
    #[error("platform error: {0}")]
    PlatformError(String),
    #[error("no stream map in response")]
    NoStreamMap,
    #[error("unable to decrypt signature, key length {0} not supported; retrying might work")]
    UnsupportedCipherLength(usize),
    #[error("unknown format id: {0}")]
    UnknownFormat(u32),
    #[error("malformed field: {0}")]
    MalformedField(String),
    #[error("stream has no signature")]
    MissingSignature,
    #[error("stream has no format id")]
    MissingFormatId,
    #[error("expected a single stream, {0} matched")]
    MultipleStreams(usize),
}

impl ExtractorError {
    /// Transport failures may succeed on a second attempt, everything else
    /// needs a different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::EmptyResponse)
    }

    /// Whether the error only affects a single stream of a response.
    pub fn is_per_stream(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCipherLength(_)
                | Self::UnknownFormat(_)
                | Self::MalformedField(_)
                | Self::MissingSignature
                | Self::MissingFormatId
        )
    }
}
