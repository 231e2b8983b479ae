// Modular translation architecture
//
// Providers implement `Translator` and are picked by `TranslatorFactory`:
// - Google: the public translate endpoint, no API key
// - Ollama: a local LLM prompted for a JSON translation

pub mod google;
pub mod ollama;

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::config::{TranslateConfig, TranslationProvider};
use crate::error::{Result, SrtError};

/// Main trait for translation operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` language codes
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator for the configured provider
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SrtError::Http)?;

        info!("Translating with {:?} at {}", config.provider, config.endpoint_url());
        Ok(match config.provider {
            TranslationProvider::Google => Box::new(google::GoogleTranslator::new(client, config)),
            TranslationProvider::Ollama => Box::new(ollama::OllamaTranslator::new(client, config)),
        })
    }
}

/// Convert language code to full language name for clearer prompts
pub fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "ja" => "Japanese".to_string(),
        "en" => "English".to_string(),
        "ko" => "Korean".to_string(),
        "zh" => "Chinese".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "es" => "Spanish".to_string(),
        "ru" => "Russian".to_string(),
        "it" => "Italian".to_string(),
        "pt" => "Portuguese".to_string(),
        "nl" => "Dutch".to_string(),
        "pl" => "Polish".to_string(),
        "tr" => "Turkish".to_string(),
        "ar" => "Arabic".to_string(),
        "hi" => "Hindi".to_string(),
        "th" => "Thai".to_string(),
        "vi" => "Vietnamese".to_string(),
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code_to_name() {
        assert_eq!(language_code_to_name("ja"), "Japanese");
        assert_eq!(language_code_to_name("EN"), "English");
        assert_eq!(language_code_to_name("xx"), "xx");
    }

    #[test]
    fn test_factory_builds_each_provider() {
        let mut config = TranslateConfig::default();
        assert!(TranslatorFactory::create_translator(config.clone()).is_ok());

        config.provider = TranslationProvider::Ollama;
        assert!(TranslatorFactory::create_translator(config).is_ok());
    }
}
