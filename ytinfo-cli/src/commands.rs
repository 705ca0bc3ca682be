use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{CliError, Result},
    output::{OutputManager, write_output},
};
#[cfg(feature = "colored-output")]
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::{path::Path, sync::Arc, time::Duration};
use tokio::{
    sync::Semaphore,
    time::{sleep, timeout},
};
use tracing::{debug, warn};
use ytinfo_parser::{
    ExtractorError, YouTube,
    extractor::{ProxyConfig, create_client, platform_extractor::PlatformExtractor},
    media::{Container, StreamDescriptor, VideoInfo, catalog},
};

type BatchResultTuple = (usize, String, Result<VideoInfo>);

pub struct CommandExecutor {
    config: AppConfig,
    client: Client,
}

impl CommandExecutor {
    /// `proxy` overrides the proxy from the configuration.
    pub fn new(config: AppConfig, proxy: Option<ProxyConfig>) -> Result<Self> {
        let proxy_config = proxy.or_else(|| {
            config.default_proxy.as_ref().map(|url| ProxyConfig {
                url: url.clone(),
                username: config.default_proxy_username.clone(),
                password: config.default_proxy_password.clone(),
            })
        });

        let client = create_client(proxy_config)?;
        Ok(Self { config, client })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn extract_single(
        &self,
        url: &str,
        output_file: Option<&Path>,
        extension: Option<&str>,
        resolution: Option<&str>,
        auto_select: bool,
        all: bool,
        age_restricted: bool,
        output_format: OutputFormat,
        timeout_duration: Duration,
        retries: u32,
    ) -> Result<()> {
        let extension = parse_extension(extension)?;

        let pb = self.create_progress_bar("Extracting...");
        let result = extract_with_retry(
            &self.client,
            self.config.user_agent.as_deref(),
            url,
            age_restricted,
            timeout_duration,
            retries,
        )
        .await;
        pb.finish_and_clear();

        let video_info = match result {
            Ok(video_info) => video_info,
            Err(e) => {
                #[cfg(feature = "colored-output")]
                {
                    eprintln!("{}", e.to_string().red());
                }
                #[cfg(not(feature = "colored-output"))]
                {
                    eprintln!("{}", e);
                }
                return Err(e);
            }
        };

        if video_info.streams.is_empty() {
            if video_info.has_unsupported_cipher() {
                warn!("All scrambled signatures use an unsupported cipher; retrying might work");
            }
            return Err(CliError::no_streams_found());
        }

        let selected = if all {
            video_info.streams.filter(extension, resolution)
        } else {
            vec![self.select_stream(&video_info, extension, resolution, auto_select)?]
        };
        if selected.is_empty() {
            return Err(CliError::no_matching_stream());
        }

        let output_manager = OutputManager::new(self.config.colored_output);
        let output = output_manager.format_video_info(&video_info, &selected, &output_format)?;

        write_output(&output, output_file)?;
        Ok(())
    }

    fn select_stream<'a>(
        &self,
        video_info: &'a VideoInfo,
        extension: Option<Container>,
        resolution: Option<&str>,
        auto_select: bool,
    ) -> Result<&'a StreamDescriptor> {
        if auto_select {
            return video_info
                .streams
                .filter(extension, resolution)
                .pop()
                .ok_or_else(CliError::no_matching_stream);
        }

        match video_info.streams.get(extension, resolution) {
            Ok(Some(stream)) => Ok(stream),
            Ok(None) => Err(CliError::no_matching_stream()),
            Err(ExtractorError::MultipleStreams(n)) => {
                debug!("{} streams match, asking for a selection", n);
                let mut candidates = video_info.streams.filter(extension, resolution);
                candidates.reverse();
                self.interactive_select_stream(candidates)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn batch_process(
        &self,
        input_file: &Path,
        output_dir: Option<&Path>,
        concurrency: usize,
        continue_on_error: bool,
        age_restricted: bool,
        output_format: OutputFormat,
        timeout_duration: Duration,
        retries: u32,
    ) -> Result<()> {
        let content = std::fs::read_to_string(input_file)?;
        let urls: Vec<String> = content
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    None
                } else {
                    Some(line.to_string())
                }
            })
            .collect();

        if urls.is_empty() {
            return Err(CliError::invalid_input("No valid URLs found in input file"));
        }

        let pb = Arc::new(ProgressBar::new(urls.len() as u64));
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }

        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = Vec::with_capacity(urls.len());

        for (index, url) in urls.into_iter().enumerate() {
            let pb = Arc::clone(&pb);
            let permit = semaphore.clone().acquire_owned().await?;
            let client = self.client.clone();
            let user_agent = self.config.user_agent.clone();

            let task = tokio::spawn(async move {
                let _permit = permit;

                pb.set_message(format!("Processing: {url}"));
                let result = extract_with_retry(
                    &client,
                    user_agent.as_deref(),
                    &url,
                    age_restricted,
                    timeout_duration,
                    retries,
                )
                .await;

                pb.inc(1);
                (index, url, result)
            });

            tasks.push(task);
        }

        let mut results: Vec<BatchResultTuple> = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(result) => results.push(result),
                Err(e) => return Err(CliError::Extraction(e.to_string())),
            }
        }

        pb.finish_with_message("Batch processing completed");

        match &output_format {
            OutputFormat::Json | OutputFormat::JsonCompact => {
                self.output_batch_json(&results, output_dir, &output_format)?;
            }
            _ => {
                self.output_batch_summary(&results, output_dir)?;
            }
        }

        let failed = results.iter().filter(|(_, _, r)| r.is_err()).count();
        if failed > 0 && !continue_on_error {
            return Err(CliError::Extraction(format!(
                "{failed} of {} URLs failed",
                results.len()
            )));
        }

        Ok(())
    }

    pub fn list_formats(&self, output_format: &OutputFormat) -> Result<()> {
        let output_manager = OutputManager::new(self.config.colored_output);
        let output = output_manager.format_catalog(catalog::all(), output_format)?;
        write_output(&output, None)
    }

    fn create_progress_bar(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(500));
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(message.to_string());
        pb
    }

    fn interactive_select_stream<'a>(
        &self,
        streams: Vec<&'a StreamDescriptor>,
    ) -> Result<&'a StreamDescriptor> {
        if streams.is_empty() {
            return Err(CliError::no_streams_found());
        }

        #[cfg(feature = "interactive")]
        {
            inquire::Select::new("Select a stream:", streams)
                .prompt()
                .map_err(|_| CliError::user_cancelled())
        }

        #[cfg(not(feature = "interactive"))]
        {
            // Fallback: take the first (highest quality) candidate
            streams
                .into_iter()
                .next()
                .ok_or_else(CliError::no_streams_found)
        }
    }

    fn output_batch_json(
        &self,
        results: &[BatchResultTuple],
        output_dir: Option<&Path>,
        output_format: &OutputFormat,
    ) -> Result<()> {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|(index, url, result)| match result {
                Ok(video_info) => {
                    serde_json::json!({
                        "index": index,
                        "url": url,
                        "status": "success",
                        "video_info": video_info,
                        "best_stream": video_info.streams.best(),
                    })
                }
                Err(e) => {
                    serde_json::json!({
                        "index": index,
                        "url": url,
                        "status": "error",
                        "error": e.to_string()
                    })
                }
            })
            .collect();

        let output = match output_format {
            OutputFormat::Json => serde_json::to_string_pretty(&json_results)?,
            _ => serde_json::to_string(&json_results)?,
        };

        let output_file = output_dir.map(|dir| dir.join("batch_results.json"));
        write_output(&output, output_file.as_deref())
    }

    fn output_batch_summary(
        &self,
        results: &[BatchResultTuple],
        output_dir: Option<&Path>,
    ) -> Result<()> {
        let mut summary = String::new();

        summary.push_str("=== Batch Processing Summary ===\n\n");

        let successful = results.iter().filter(|(_, _, r)| r.is_ok()).count();
        let failed = results.len() - successful;

        summary.push_str(&format!("Total URLs: {}\n", results.len()));
        summary.push_str(&format!("Successful: {successful}\n"));
        summary.push_str(&format!("Failed: {failed}\n\n"));

        for (index, url, result) in results {
            let status_line = match result {
                Ok(video_info) => format!(
                    "[{}] ✓ {} - {} streams: {}",
                    index + 1,
                    video_info.title.as_deref().unwrap_or("unknown title"),
                    video_info.streams.len(),
                    url
                ),
                Err(e) => format!("[{}] ✗ ERROR for URL {url}: {e}", index + 1),
            };
            summary.push_str(&status_line);
            summary.push('\n');
        }

        let output_file = output_dir.map(|dir| dir.join("batch_summary.txt"));
        write_output(&summary, output_file.as_deref())
    }
}

fn parse_extension(extension: Option<&str>) -> Result<Option<Container>> {
    extension
        .map(|ext| {
            ext.parse::<Container>()
                .map_err(|_| CliError::invalid_filter(format!("Unknown extension: {ext}")))
        })
        .transpose()
}

fn build_extractor(
    client: &Client,
    user_agent: Option<&str>,
    url: &str,
    age_restricted: bool,
) -> YouTube {
    let mut youtube = YouTube::new(url.to_string(), client.clone()).age_restricted(age_restricted);
    if let Some(user_agent) = user_agent {
        youtube
            .extractor
            .add_header(reqwest::header::USER_AGENT.to_string(), user_agent);
    }
    youtube
}

/// Run one lookup, retrying transport failures with exponential backoff.
async fn extract_with_retry(
    client: &Client,
    user_agent: Option<&str>,
    url: &str,
    age_restricted: bool,
    timeout_duration: Duration,
    retries: u32,
) -> Result<VideoInfo> {
    let extractor = build_extractor(client, user_agent, url, age_restricted);
    let mut last_error = None;

    for attempt in 0..=retries {
        let error = match timeout(timeout_duration, extractor.extract()).await {
            Ok(Ok(video_info)) => return Ok(video_info),
            Ok(Err(e)) => CliError::from(e),
            Err(_) => CliError::timeout(timeout_duration.as_secs()),
        };

        if !error.is_retryable() {
            return Err(error);
        }
        warn!("Attempt {} for {} failed: {}", attempt + 1, url, error);
        last_error = Some(error);

        if attempt < retries {
            let delay = Duration::from_millis(1000 * (1 << attempt.min(6)));
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| CliError::timeout(timeout_duration.as_secs())))
}
