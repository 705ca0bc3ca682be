//! Decoding of `get_video_info` responses into playable stream descriptors.
//!
//! The [`media`] module holds the data model (format catalog, stream
//! descriptors, the sorted stream collection) and the [`extractor`] module
//! holds the fetch layer together with the response decoding pipeline.

pub mod extractor;
pub mod media;

pub use extractor::error::ExtractorError;
pub use extractor::platforms::youtube::{
    ResponseParser, StreamMapDecoder, YouTube, cipher::SignatureCipher,
};
pub use media::{Container, FormatDescriptor, StreamCollection, StreamDescriptor, VideoInfo};
