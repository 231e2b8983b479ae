// whisper.cpp command-line engine
//
// Models are ggml files named `ggml-<size>.bin` under the configured models
// directory. whisper-cli reads 16 kHz WAV input unless it was built with
// ffmpeg support.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, SrtError};
use super::{ModelLoader, Segment, SpeechModel, Transcription, TranscriptionMapper, check_binary};

// Structs for parsing whisper.cpp JSON output (`-oj`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    pub result: WhisperCppResult,
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppResult {
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub offsets: WhisperCppOffsets,
    pub text: String,
}

/// Segment bounds in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOffsets {
    pub from: i64,
    pub to: i64,
}

pub struct WhisperCppMapper;

impl TranscriptionMapper<WhisperCppOutput> for WhisperCppMapper {
    fn to_transcription(whisper_output: WhisperCppOutput) -> Result<Transcription> {
        let segments = whisper_output.transcription
            .into_iter()
            .map(|seg| Segment::new(
                seg.offsets.from as f64 / 1000.0,
                seg.offsets.to as f64 / 1000.0,
                seg.text,
            ))
            .collect();

        let language = Some(whisper_output.result.language).filter(|lang| !lang.is_empty());
        Ok(Transcription::new(segments, language))
    }
}

pub struct WhisperCppLoader {
    config: TranscriberConfig,
}

impl WhisperCppLoader {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    /// Convert a model name to the ggml file path
    fn resolve_model_path(&self, model_size: &str) -> PathBuf {
        if model_size.contains('/') || model_size.ends_with(".bin") {
            debug!("Model path already resolved: {}", model_size);
            return PathBuf::from(model_size);
        }

        let resolved = self.config.models_dir.join(format!("ggml-{}.bin", model_size));
        debug!("Resolved model '{}' to path: {}", model_size, resolved.display());
        resolved
    }
}

#[async_trait]
impl ModelLoader for WhisperCppLoader {
    async fn load(&self, model_size: &str) -> Result<Box<dyn SpeechModel>> {
        info!("Loading whisper.cpp model: {}", model_size);

        let model_path = self.resolve_model_path(model_size);
        if !model_path.is_file() {
            return Err(SrtError::ModelLoad(format!(
                "Model file not found: {} (download it from https://huggingface.co/ggerganov/whisper.cpp)",
                model_path.display()
            )));
        }
        check_binary(self.config.binary()).await?;

        Ok(Box::new(WhisperCppModel {
            binary: self.config.binary().to_string(),
            model_path,
        }))
    }
}

pub struct WhisperCppModel {
    binary: String,
    model_path: PathBuf,
}

#[async_trait]
impl SpeechModel for WhisperCppModel {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        info!("Starting whisper.cpp transcription of: {}", audio_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SrtError::Transcription(format!("Failed to create temp directory: {}", e)))?;
        let output_base = temp_dir.path().join("transcript");

        let output = Command::new(&self.binary)
            .arg("-m").arg(&self.model_path)
            .arg("-f").arg(audio_path)
            .arg("-l").arg("auto")
            .arg("-oj")
            .arg("-of").arg(&output_base)
            .arg("-np")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SrtError::Transcription(format!("Failed to execute whisper-cli: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SrtError::Transcription(format!("whisper.cpp transcription failed: {}", stderr)));
        }

        let json_file = output_base.with_extension("json");
        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| SrtError::Transcription(format!("Failed to read output: {}", e)))?;

        let whisper_output: WhisperCppOutput = serde_json::from_str(&json_content)
            .map_err(|e| SrtError::Transcription(format!("Failed to parse whisper.cpp JSON: {}", e)))?;

        let transcription = WhisperCppMapper::to_transcription(whisper_output)?;
        info!("Transcribed {} segments (language: {:?})",
              transcription.segments.len(), transcription.language);
        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_whisper_cpp_output() {
        let json = r#"{
            "systeminfo": "AVX = 1",
            "result": {"language": "ja"},
            "transcription": [
                {"timestamps": {"from": "00:00:00,000", "to": "00:00:02,500"},
                 "offsets": {"from": 0, "to": 2500}, "text": " こんにちは"},
                {"timestamps": {"from": "00:00:02,500", "to": "00:00:04,000"},
                 "offsets": {"from": 2500, "to": 4000}, "text": " "}
            ]
        }"#;

        let output: WhisperCppOutput = serde_json::from_str(json).unwrap();
        let transcription = WhisperCppMapper::to_transcription(output).unwrap();

        assert_eq!(transcription.language.as_deref(), Some("ja"));
        assert_eq!(transcription.segments[0], Segment::new(0.0, 2.5, " こんにちは"));
        assert_eq!(transcription.segments[1], Segment::new(2.5, 4.0, " "));
    }

    #[test]
    fn test_resolve_model_path() {
        let config = TranscriberConfig {
            models_dir: PathBuf::from("/opt/models"),
            ..TranscriberConfig::default()
        };
        let loader = WhisperCppLoader::new(config);

        assert_eq!(loader.resolve_model_path("small"), PathBuf::from("/opt/models/ggml-small.bin"));
        assert_eq!(loader.resolve_model_path("./custom.bin"), PathBuf::from("./custom.bin"));
    }

    #[tokio::test]
    async fn test_load_without_model_file_is_model_load_error() {
        let models = tempfile::tempdir().unwrap();
        let config = TranscriberConfig {
            engine: crate::config::TranscriptionEngine::WhisperCpp,
            models_dir: models.path().to_path_buf(),
            ..TranscriberConfig::default()
        };
        let loader = WhisperCppLoader::new(config);

        let err = loader.load("medium").await.err().unwrap();
        match err {
            SrtError::ModelLoad(message) => assert!(message.contains("ggml-medium.bin")),
            other => panic!("expected ModelLoad, got {:?}", other),
        }
    }
}
