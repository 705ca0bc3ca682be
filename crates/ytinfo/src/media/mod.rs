pub mod catalog;
pub mod collection;
pub mod filename;
pub mod formats;
pub mod media_info;
pub mod stream_info;

pub use catalog::FormatDescriptor;
pub use collection::StreamCollection;
pub use formats::Container;
pub use media_info::{SkippedStream, VideoInfo};
pub use stream_info::StreamDescriptor;
