// OpenAI Whisper command-line engine (`pip install openai-whisper`)

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, SrtError};
use super::{ModelLoader, Segment, SpeechModel, Transcription, TranscriptionMapper, check_binary};

/// Model names accepted by `whisper --model`
pub const OPENAI_MODELS: &[&str] = &[
    "tiny.en", "tiny", "base.en", "base", "small.en", "small",
    "medium.en", "medium", "large-v1", "large-v2", "large-v3", "large",
    "large-v3-turbo", "turbo",
];

/// OpenAI Whisper JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

pub struct OpenAIWhisperMapper;

impl TranscriptionMapper<OpenAIWhisperOutput> for OpenAIWhisperMapper {
    fn to_transcription(whisper_output: OpenAIWhisperOutput) -> Result<Transcription> {
        let segments = whisper_output.segments
            .into_iter()
            .map(|seg| Segment::new(seg.start, seg.end, seg.text))
            .collect();

        Ok(Transcription::new(segments, whisper_output.language))
    }
}

pub struct OpenAiLoader {
    config: TranscriberConfig,
}

impl OpenAiLoader {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    /// Known model name, or a path to a local checkpoint
    fn resolve_model(&self, model_size: &str) -> Result<String> {
        if OPENAI_MODELS.contains(&model_size) || Path::new(model_size).is_file() {
            return Ok(model_size.to_string());
        }

        Err(SrtError::ModelLoad(format!(
            "Model {} not found; available models = {:?}",
            model_size, OPENAI_MODELS
        )))
    }
}

#[async_trait]
impl ModelLoader for OpenAiLoader {
    async fn load(&self, model_size: &str) -> Result<Box<dyn SpeechModel>> {
        info!("Loading OpenAI Whisper model: {}", model_size);
        check_binary(self.config.binary()).await?;
        let model = self.resolve_model(model_size)?;

        Ok(Box::new(OpenAiWhisperModel {
            binary: self.config.binary().to_string(),
            model,
        }))
    }
}

pub struct OpenAiWhisperModel {
    binary: String,
    model: String,
}

impl OpenAiWhisperModel {
    fn output_file(output_dir: &Path, audio_path: &Path) -> Result<PathBuf> {
        let audio_filename = audio_path.file_stem()
            .ok_or_else(|| SrtError::Transcription("Invalid audio filename".to_string()))?;
        Ok(output_dir.join(format!("{}.json", audio_filename.to_string_lossy())))
    }
}

#[async_trait]
impl SpeechModel for OpenAiWhisperModel {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        info!("Starting OpenAI Whisper transcription of: {}", audio_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SrtError::Transcription(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let output = Command::new(&self.binary)
            .arg(audio_path)
            .arg("--model").arg(&self.model)
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json")
            .arg("--verbose").arg("False")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SrtError::Transcription(format!("Failed to execute whisper command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SrtError::Transcription(format!(
                "OpenAI Whisper transcription failed: {}",
                stderr
            )));
        }

        let json_file = Self::output_file(output_dir, audio_path)?;
        debug!("Reading whisper output: {}", json_file.display());
        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| SrtError::Transcription(format!("Failed to read JSON output: {}", e)))?;

        let whisper_output: OpenAIWhisperOutput = serde_json::from_str(&json_content)
            .map_err(|e| SrtError::Transcription(format!("Failed to parse OpenAI Whisper JSON: {}", e)))?;

        let transcription = OpenAIWhisperMapper::to_transcription(whisper_output)?;
        info!("Transcribed {} segments (language: {:?})",
              transcription.segments.len(), transcription.language);
        Ok(transcription)
    }
}
