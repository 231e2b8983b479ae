use std::io::ErrorKind;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SrtError};

/// A contiguous span of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Raw text, may be empty or whitespace
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self { start, end, text: text.into() }
    }
}

/// Ordered segments plus the language the engine detected for the whole file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub segments: Vec<Segment>,
    pub language: Option<String>,
}

impl Transcription {
    pub fn new(segments: Vec<Segment>, language: Option<String>) -> Self {
        Self { segments, language }
    }

    /// Overall language, or `default` when the engine reported none
    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.language
            .as_deref()
            .filter(|lang| !lang.is_empty())
            .unwrap_or(default)
    }
}

/// Trait for converting engine-specific output to `Transcription`
pub trait TranscriptionMapper<T> {
    fn to_transcription(engine_output: T) -> Result<Transcription>;
}

/// Verify a command-line tool can be spawned.
///
/// A binary that cannot be found maps to `MissingDependency`, any other
/// spawn failure to `ModelLoad`.
pub async fn check_binary(binary: &str) -> Result<()> {
    let output = Command::new(binary)
        .arg("--help")
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => SrtError::MissingDependency(binary.to_string()),
            _ => SrtError::ModelLoad(format!("Failed to execute {}: {}", binary, e)),
        })?;

    debug!("{} --help exited with {}", binary, output.status);
    Ok(())
}
