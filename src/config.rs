use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SrtError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub detect: DetectConfig,
    pub translate: TranslateConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Transcription engine to load models with
    pub engine: TranscriptionEngine,
    /// Path to the transcriber binary, engine default when unset
    pub binary_path: Option<String>,
    /// Directory holding ggml model files for whisper.cpp
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptionEngine {
    /// OpenAI Whisper command-line tool (`pip install openai-whisper`)
    OpenAi,
    /// whisper.cpp command-line tool with ggml models
    WhisperCpp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Overall language used when the transcriber does not report one
    pub fallback_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Translation backend
    pub provider: TranslationProvider,
    /// Segments detected in this language are translated
    pub source_language: String,
    /// Language to translate into
    pub target_language: String,
    /// Service base URL, provider default when unset
    pub endpoint: Option<String>,
    /// LLM model, only used by the Ollama provider
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationProvider {
    /// Public Google translate endpoint
    Google,
    /// Local LLM served by Ollama
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Suffix for downloaded audio when the URL path has no extension
    pub default_suffix: String,
    /// User agent sent when downloading audio
    pub user_agent: String,
    /// Directory for downloaded audio, system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            engine: TranscriptionEngine::OpenAi,
            binary_path: None,
            models_dir: PathBuf::from(".audio-to-srt").join("models"),
        }
    }
}

impl TranscriberConfig {
    /// Binary to run: the configured path or the engine's usual name
    pub fn binary(&self) -> &str {
        self.binary_path.as_deref().unwrap_or(match self.engine {
            TranscriptionEngine::OpenAi => "whisper",
            TranscriptionEngine::WhisperCpp => "whisper-cli",
        })
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            fallback_language: "en".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::Google,
            source_language: "ja".to_string(),
            target_language: "en".to_string(),
            endpoint: None,
            model: "llama3.2:3b".to_string(),
            timeout_secs: 60,
        }
    }
}

impl TranslateConfig {
    /// Base URL to send requests to: the configured endpoint or the provider's usual one
    pub fn endpoint_url(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(match self.provider {
            TranslationProvider::Google => "https://translate.googleapis.com",
            TranslationProvider::Ollama => "http://localhost:11434",
        })
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_suffix: ".mp3".to_string(),
            user_agent: concat!("audio-to-srt/", env!("CARGO_PKG_VERSION")).to_string(),
            temp_dir: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SrtError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SrtError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SrtError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SrtError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
