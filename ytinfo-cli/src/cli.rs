use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ytinfo",
    about = "ytinfo - CLI tool for listing the playable streams of a video",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Number of retry attempts (overrides the configuration)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the streams of a video
    Extract {
        /// Watch URL, short link or video id
        #[arg(short, long)]
        url: String,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Save output to file
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,

        /// Only keep streams with this container (e.g., "mp4", "webm")
        #[arg(short, long)]
        extension: Option<String>,

        /// Only keep streams with this resolution (e.g., "720p")
        #[arg(short, long)]
        resolution: Option<String>,

        /// Select the best matching stream without prompt
        #[arg(long)]
        auto_select: bool,

        /// Print every matching stream instead of selecting one
        #[arg(short, long, conflicts_with = "auto_select")]
        all: bool,

        /// Descramble signatures with the age-restricted cipher
        #[arg(long)]
        age_restricted: bool,
    },

    /// Process multiple URLs from a file
    Batch {
        /// Input file containing URLs or video ids (one per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for results
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, default_value = "json")]
        output_format: OutputFormat,

        /// Maximum concurrent extractions (overrides the configuration)
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Keep going when a URL fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// List the known format ids
    Formats {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty-printed human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
    /// Table format
    Table,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonCompact => write!(f, "json-compact"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let args = Args::parse_from([
            "ytinfo",
            "extract",
            "-u",
            "dQw4w9WgXcQ",
            "-e",
            "mp4",
            "-r",
            "720p",
            "--auto-select",
            "-o",
            "json-compact",
            "--timeout",
            "10",
        ]);
        assert_eq!(args.timeout, Some(10));
        match args.command {
            Commands::Extract {
                url,
                extension,
                resolution,
                auto_select,
                all,
                output,
                ..
            } => {
                assert_eq!(url, "dQw4w9WgXcQ");
                assert_eq!(extension.as_deref(), Some("mp4"));
                assert_eq!(resolution.as_deref(), Some("720p"));
                assert!(auto_select);
                assert!(!all);
                assert_eq!(output, Some(OutputFormat::JsonCompact));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_all_conflicts_with_auto_select() {
        let result = Args::try_parse_from(["ytinfo", "extract", "-u", "x", "--all", "--auto-select"]);
        assert!(result.is_err());
    }
}
