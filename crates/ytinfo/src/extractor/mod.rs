mod default;
pub mod error;
pub mod platform_extractor;
pub mod platforms;

pub use default::{ProxyConfig, create_client, default_client};
