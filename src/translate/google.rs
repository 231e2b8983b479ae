use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, SrtError};
use super::Translator;

/// Translator using the public `translate_a/single` endpoint
pub struct GoogleTranslator {
    client: Client,
    config: TranslateConfig,
}

impl GoogleTranslator {
    pub fn new(client: Client, config: TranslateConfig) -> Self {
        Self { client, config }
    }
}

/// Join the translated sentence chunks of a `translate_a/single` response.
///
/// The response is a nested array whose first element lists
/// `[translated, original, ...]` pairs, one per sentence.
pub fn parse_translation(body: &Value) -> Result<String> {
    let sentences = body.get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| SrtError::Translation("Unexpected response shape".to_string()))?;

    let text: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(SrtError::Translation("Empty translation received".to_string()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.config.endpoint_url().trim_end_matches('/'));
        debug!("Sending translation request to: {}", url);

        let response = self.client
            .get(&url)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t"), ("q", text)])
            .send()
            .await
            .map_err(|e| SrtError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SrtError::Translation(format!(
                "Translate API error {}: {}", status, error_text
            )));
        }

        let body: Value = response.json().await
            .map_err(|e| SrtError::Translation(format!("Failed to parse response: {}", e)))?;

        parse_translation(&body)
    }
}
