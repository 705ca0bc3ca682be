pub mod builder;
pub mod cipher;
pub mod models;
pub mod query;
pub mod response;
pub mod stream_map;

pub use builder::YouTube;
pub use response::ResponseParser;
pub use stream_map::StreamMapDecoder;
