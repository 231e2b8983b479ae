use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing dependency {0}. Ensure it is installed and on PATH.")]
    MissingDependency(String),

    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Language detection error: {0}")]
    Detection(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted before the transcription finished")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, SrtError>;
