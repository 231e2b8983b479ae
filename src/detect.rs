use async_trait::async_trait;
use tracing::debug;
use whatlang::Lang;

use crate::error::{Result, SrtError};

/// Identifies the language of a piece of text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Return an ISO 639-1 code such as `ja` or `en`
    async fn detect(&self, text: &str) -> Result<String>;
}

/// Trigram/script based detector backed by whatlang.
///
/// Detection is deterministic for a given input.
#[derive(Debug, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageDetector for WhatlangDetector {
    async fn detect(&self, text: &str) -> Result<String> {
        let info = whatlang::detect(text)
            .ok_or_else(|| SrtError::Detection(format!("No features in text: {:?}", text)))?;

        let code = iso_639_1(info.lang());
        debug!("Detected {} (confidence {:.2}) for {:?}", code, info.confidence(), text);
        Ok(code.to_string())
    }
}

/// Map whatlang's ISO 639-3 languages to the two-letter codes whisper reports
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Jpn => "ja",
        Lang::Eng => "en",
        Lang::Cmn => "zh",
        Lang::Kor => "ko",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Rus => "ru",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Pol => "pl",
        Lang::Nld => "nl",
        Lang::Tur => "tr",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Heb => "he",
        Lang::Hun => "hu",
        Lang::Ces => "cs",
        Lang::Ukr => "uk",
        Lang::Ind => "id",
        other => other.code(),
    }
}
