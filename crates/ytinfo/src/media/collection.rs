use serde::{Deserialize, Serialize};

use crate::extractor::error::ExtractorError;
use crate::media::{Container, StreamDescriptor};

/// Streams of one video, sorted ascending by quality (best last).
///
/// The collection is sorted once on construction and exposes no way to
/// reorder or mutate its entries afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "Vec<StreamDescriptor>", into = "Vec<StreamDescriptor>")]
pub struct StreamCollection {
    streams: Vec<StreamDescriptor>,
}

impl StreamCollection {
    pub fn new(mut streams: Vec<StreamDescriptor>) -> Self {
        streams.sort();
        Self { streams }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StreamDescriptor> {
        self.streams.iter()
    }

    pub fn as_slice(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    pub fn into_vec(self) -> Vec<StreamDescriptor> {
        self.streams
    }

    /// Iterate from the highest quality stream down.
    pub fn highest_first(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().rev()
    }

    pub fn best(&self) -> Option<&StreamDescriptor> {
        self.streams.last()
    }

    pub fn worst(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    /// All streams matching the given criteria, in collection order.
    /// A `None` criterion matches everything.
    pub fn filter(
        &self,
        extension: Option<Container>,
        resolution: Option<&str>,
    ) -> Vec<&StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| extension.is_none_or(|ext| s.extension == ext))
            .filter(|s| resolution.is_none_or(|res| s.resolution == res))
            .collect()
    }

    /// The single stream matching the given criteria.
    ///
    /// Returns `Ok(None)` when nothing matches and
    /// [`ExtractorError::MultipleStreams`] when the criteria are ambiguous.
    pub fn get(
        &self,
        extension: Option<Container>,
        resolution: Option<&str>,
    ) -> Result<Option<&StreamDescriptor>, ExtractorError> {
        let mut matches = self.filter(extension, resolution);
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(ExtractorError::MultipleStreams(n)),
        }
    }
}

impl From<Vec<StreamDescriptor>> for StreamCollection {
    fn from(streams: Vec<StreamDescriptor>) -> Self {
        Self::new(streams)
    }
}

impl From<StreamCollection> for Vec<StreamDescriptor> {
    fn from(collection: StreamCollection) -> Self {
        collection.streams
    }
}

impl IntoIterator for StreamCollection {
    type Item = StreamDescriptor;
    type IntoIter = std::vec::IntoIter<StreamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.into_iter()
    }
}

impl<'a> IntoIterator for &'a StreamCollection {
    type Item = &'a StreamDescriptor;
    type IntoIter = std::slice::Iter<'a, StreamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}
