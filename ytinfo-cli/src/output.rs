use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use std::borrow::Cow;
use std::io::Write;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};
use ytinfo_parser::media::{FormatDescriptor, StreamDescriptor, VideoInfo};

const CSV_HEADER: &str =
    "format_id,extension,resolution,video_codec,profile,video_bitrate,audio_codec,audio_bitrate";

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_video_info(
        &self,
        video_info: &VideoInfo,
        streams: &[&StreamDescriptor],
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Pretty => self.format_pretty(video_info, streams),
            OutputFormat::Json => self.format_json(video_info, streams, true),
            OutputFormat::JsonCompact => self.format_json(video_info, streams, false),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => self.format_table(video_info, streams),
            #[cfg(not(feature = "table-output"))]
            OutputFormat::Table => {
                // Fallback to pretty format when table feature is disabled
                self.format_pretty(video_info, streams)
            }
            OutputFormat::Csv => Ok(self.format_csv(streams)),
        }
    }

    pub fn format_catalog(
        &self,
        formats: &[FormatDescriptor],
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(formats)? + "\n"),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(formats)? + "\n"),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => {
                #[derive(Tabled)]
                struct FormatRow {
                    itag: u32,
                    container: &'static str,
                    resolution: &'static str,
                    video: String,
                    audio: String,
                }

                let rows = formats.iter().map(|f| FormatRow {
                    itag: f.itag,
                    container: f.extension.as_str(),
                    resolution: f.resolution,
                    video: format!("{} {} ({} Mbit/s)", f.video_codec, f.profile, f.video_bitrate),
                    audio: format!("{} ({} kbit/s)", f.audio_codec, f.audio_bitrate),
                });
                Ok(Table::new(rows).with(Style::modern()).to_string() + "\n")
            }
            OutputFormat::Csv => {
                let mut output = String::from(CSV_HEADER);
                output.push('\n');
                for f in formats {
                    output.push_str(&format!(
                        "{},{},{},\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
                        f.itag,
                        f.extension,
                        f.resolution,
                        f.video_codec,
                        f.profile,
                        f.video_bitrate,
                        f.audio_codec,
                        f.audio_bitrate
                    ));
                }
                Ok(output)
            }
            _ => {
                let mut output = self.colorize("Known Formats:", &Color::Green, true);
                output.push('\n');
                for f in formats {
                    output.push_str(&format!(
                        "  {:>3}  {:<5} {:<6} {} {} / {} {}\n",
                        self.colorize(&f.itag.to_string(), &Color::Cyan, true),
                        f.extension,
                        f.resolution,
                        f.video_codec,
                        f.profile,
                        f.audio_codec,
                        f.audio_bitrate
                    ));
                }
                Ok(output)
            }
        }
    }

    fn format_pretty(&self, video_info: &VideoInfo, streams: &[&StreamDescriptor]) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.colorize("Video Information:", &Color::Green, true));
        output.push('\n');

        self.push_field(
            &mut output,
            "Title",
            video_info.title.as_deref().unwrap_or("unknown title"),
            &Color::Cyan,
        );
        if let Some(video_id) = &video_info.video_id {
            self.push_field(&mut output, "Video ID", video_id, &Color::Cyan);
        }
        self.push_field(
            &mut output,
            "Streams",
            &video_info.streams.len().to_string(),
            &Color::Cyan,
        );

        if !video_info.skipped.is_empty() {
            self.push_field(
                &mut output,
                "Skipped",
                &video_info.skipped.len().to_string(),
                &Color::Cyan,
            );
            if video_info.has_unsupported_cipher() {
                output.push_str(&format!(
                    "  {}\n",
                    self.colorize(
                        "Some signatures use an unsupported cipher; retrying might work",
                        &Color::Yellow,
                        false
                    )
                ));
            }
        }

        let base = video_info.filename();
        for stream in streams {
            output.push('\n');
            output.push_str(&self.colorize(
                &format!("Stream {}:", stream.format_id),
                &Color::Green,
                true,
            ));
            output.push('\n');

            self.push_field(&mut output, "Container", stream.extension.as_str(), &Color::Cyan);
            self.push_field(&mut output, "Resolution", &stream.resolution, &Color::Cyan);
            self.push_field(
                &mut output,
                "Video",
                &format!(
                    "{} {} ({} Mbit/s)",
                    stream.video_codec, stream.profile, stream.video_bitrate
                ),
                &Color::Cyan,
            );
            self.push_field(
                &mut output,
                "Audio",
                &format!("{} ({} kbit/s)", stream.audio_codec, stream.audio_bitrate),
                &Color::Cyan,
            );
            self.push_field(&mut output, "Filename", &stream.filename(&base), &Color::Cyan);
            self.push_field(&mut output, "URL", &stream.url, &Color::Blue);
        }

        Ok(output)
    }

    fn push_field(&self, output: &mut String, name: &str, value: &str, color: &Color) {
        output.push_str(&format!(
            "  {}: {}\n",
            self.colorize(name, &Color::Yellow, false),
            self.colorize(value, color, false)
        ));
    }

    fn format_json(
        &self,
        video_info: &VideoInfo,
        streams: &[&StreamDescriptor],
        pretty: bool,
    ) -> Result<String> {
        let output = serde_json::json!({
            "video": {
                "video_id": &video_info.video_id,
                "title": &video_info.title,
                "filename": video_info.filename(),
                "stream_count": video_info.streams.len(),
                "skipped": &video_info.skipped,
            },
            "streams": streams,
        });

        let mut result = if pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        result.push('\n');
        Ok(result)
    }

    #[cfg(feature = "table-output")]
    fn format_table(&self, video_info: &VideoInfo, streams: &[&StreamDescriptor]) -> Result<String> {
        #[derive(Tabled)]
        struct StreamRow<'a> {
            itag: u32,
            container: &'static str,
            resolution: &'a str,
            video: String,
            audio: String,
            url: Cow<'a, str>,
        }

        let rows = streams.iter().map(|stream| StreamRow {
            itag: stream.format_id,
            container: stream.extension.as_str(),
            resolution: &stream.resolution,
            video: format!("{} {}", stream.video_codec, stream.profile),
            audio: format!("{} {}", stream.audio_codec, stream.audio_bitrate),
            url: Cow::Borrowed(&stream.url),
        });

        let mut output = format!(
            "{}\n",
            video_info.title.as_deref().unwrap_or("unknown title")
        );
        output.push_str(&Table::new(rows).with(Style::modern()).to_string());
        output.push('\n');
        Ok(output)
    }

    fn format_csv(&self, streams: &[&StreamDescriptor]) -> String {
        let mut output = format!("{CSV_HEADER},url\n");
        for stream in streams {
            output.push_str(&format!(
                "{},{},{},\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
                stream.format_id,
                stream.extension,
                stream.resolution,
                Self::escape_csv(&stream.video_codec),
                Self::escape_csv(&stream.profile),
                Self::escape_csv(&stream.video_bitrate),
                Self::escape_csv(&stream.audio_codec),
                Self::escape_csv(&stream.audio_bitrate),
                Self::escape_csv(&stream.url)
            ));
        }
        output
    }

    fn escape_csv(s: &str) -> Cow<'_, str> {
        if s.contains('"') {
            Cow::Owned(s.replace('"', "\"\""))
        } else {
            Cow::Borrowed(s)
        }
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (self.colored, color, bold);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

pub fn write_output(content: &str, output_file: Option<&std::path::Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            print!("{content}");
            std::io::stdout().flush()?;
        }
    }
    Ok(())
}
