use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Container of a progressive stream.
///
/// The variant order is the quality rank used when sorting streams that share
/// a resolution: `3gp < flv < webm < mp4`.
#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[serde(rename = "3gp")]
    ThreeGp,
    Flv,
    Webm,
    Mp4,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::ThreeGp => "3gp",
            Container::Flv => "flv",
            Container::Webm => "webm",
            Container::Mp4 => "mp4",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> String {
        format!(".{}", self.as_str())
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Container {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "3gp" | "3gpp" => Ok(Container::ThreeGp),
            "flv" => Ok(Container::Flv),
            "webm" => Ok(Container::Webm),
            "mp4" => Ok(Container::Mp4),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extensions_case_insensitively() {
        assert_eq!("MP4".parse::<Container>(), Ok(Container::Mp4));
        assert_eq!(".webm".parse::<Container>(), Ok(Container::Webm));
        assert_eq!("3gp".parse::<Container>(), Ok(Container::ThreeGp));
        assert!("mkv".parse::<Container>().is_err());
    }

    #[test]
    fn rank_follows_quality() {
        assert!(Container::ThreeGp < Container::Flv);
        assert!(Container::Flv < Container::Webm);
        assert!(Container::Webm < Container::Mp4);
    }

    #[test]
    fn serializes_as_extension() {
        assert_eq!(
            serde_json::to_string(&Container::ThreeGp).unwrap(),
            "\"3gp\""
        );
        assert_eq!(serde_json::to_string(&Container::Mp4).unwrap(), "\"mp4\"");
    }
}
