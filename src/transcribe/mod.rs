// Modular transcription architecture
//
// A `ModelLoader` turns a model size selector ("base", "small", ...) into a
// ready `SpeechModel`. Two command-line engines are provided:
// - OpenAi: the `whisper` tool from the openai-whisper Python package
// - WhisperCpp: `whisper-cli` from whisper.cpp with ggml model files
//
// Each engine parses its own JSON output and maps it onto `Transcription`
// through `TranscriptionMapper`.

pub mod common;
pub mod openai;
pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::Path;

pub use common::*;
use crate::config::{TranscriberConfig, TranscriptionEngine};
use crate::error::Result;

/// A loaded speech-to-text model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Transcribe an audio file into timed segments
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription>;
}

/// Loads speech models by size selector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Load the model for `model_size`; failure is fatal to the run
    async fn load(&self, model_size: &str) -> Result<Box<dyn SpeechModel>>;
}

/// Factory for creating model loaders
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the loader for the configured engine
    pub fn create_loader(config: TranscriberConfig) -> Box<dyn ModelLoader> {
        match config.engine {
            TranscriptionEngine::OpenAi => Box::new(openai::OpenAiLoader::new(config)),
            TranscriptionEngine::WhisperCpp => Box::new(whisper_cpp::WhisperCppLoader::new(config)),
        }
    }
}
