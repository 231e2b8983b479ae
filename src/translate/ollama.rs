use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, SrtError};
use super::{Translator, language_code_to_name};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translator prompting a local Ollama model for `{"text": ...}` JSON
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
}

impl OllamaTranslator {
    pub fn new(client: Client, config: TranslateConfig) -> Self {
        Self { client, config }
    }

    fn build_translation_prompt(&self, text: &str, source: &str, target: &str) -> String {
        let source_name = language_code_to_name(source);
        let target_name = language_code_to_name(target);

        format!(
            "You are a professional subtitle translator.\n\
             \n\
             Translate the following {} subtitle line to {} ONLY.\n\
             The target language is: {} (language code: {})\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             Text to translate: \"{}\"\n",
            source_name, target_name, target_name, target, target_name, text
        )
    }
}

/// Extract the translation from a raw model reply
pub fn clean_translation_response(response: &str) -> String {
    if let Ok(result) = serde_json::from_str::<TranslationResult>(response) {
        return result.text.trim().to_string();
    }

    for line in response.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty()
            || trimmed.starts_with("Here is")
            || trimmed.starts_with("Here's")
            || trimmed.starts_with("Translation:")
            || (trimmed.starts_with("**") && trimmed.ends_with("**"))
        {
            continue;
        }

        return trimmed.trim_matches('"').to_string();
    }

    response.trim().to_string()
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let request = TranslationRequest {
            model: self.config.model.clone(),
            prompt: self.build_translation_prompt(text, source, target),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint_url().trim_end_matches('/'));
        debug!("Sending translation request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SrtError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SrtError::Translation(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let translation_response: TranslationResponse = response.json().await
            .map_err(|e| SrtError::Translation(format!("Failed to parse response: {}", e)))?;

        let raw_response = translation_response.response.trim();
        debug!("Raw Ollama response: {}", raw_response);

        let cleaned = clean_translation_response(raw_response);
        if cleaned.is_empty() {
            return Err(SrtError::Translation("Empty translation received".to_string()));
        }
        Ok(cleaned)
    }
}
