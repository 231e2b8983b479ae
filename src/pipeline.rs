use std::future::Future;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::detect::{LanguageDetector, WhatlangDetector};
use crate::error::{Result, SrtError};
use crate::fetch::{AudioResolver, HttpClient, ReqwestHttpClient};
use crate::subtitle::{SubtitleEntry, render_srt};
use crate::transcribe::{ModelLoader, TranscriberFactory, Transcription};
use crate::translate::{Translator, TranslatorFactory};

/// Model size used when the caller does not pick one
pub const DEFAULT_MODEL_SIZE: &str = "base";

/// Audio in, SRT text out.
///
/// Every collaborator call is awaited in sequence; segments are processed
/// one at a time in transcription order.
pub struct Pipeline {
    config: Config,
    resolver: AudioResolver,
    loader: Box<dyn ModelLoader>,
    detector: Box<dyn LanguageDetector>,
    translator: Box<dyn Translator>,
}

impl Pipeline {
    /// Build a pipeline with the production collaborators named in `config`
    pub fn new(config: Config) -> Result<Self> {
        let http = ReqwestHttpClient::new(&config.fetch)?;
        let loader = TranscriberFactory::create_loader(config.transcriber.clone());
        let translator = TranslatorFactory::create_translator(config.translate.clone())?;

        Ok(Self::with_collaborators(
            config,
            Box::new(http),
            loader,
            Box::new(WhatlangDetector::new()),
            translator,
        ))
    }

    pub fn with_collaborators(
        config: Config,
        http: Box<dyn HttpClient>,
        loader: Box<dyn ModelLoader>,
        detector: Box<dyn LanguageDetector>,
        translator: Box<dyn Translator>,
    ) -> Self {
        let resolver = AudioResolver::new(http, config.fetch.clone());
        Self { config, resolver, loader, detector, translator }
    }

    /// Transcribe `audio` (URL or local path) into SRT text.
    ///
    /// A downloaded file is removed before returning, whether or not
    /// transcription succeeded.
    pub async fn predict(&self, audio: &str, model_size: &str) -> Result<String> {
        let resolved = self.resolver.resolve(audio).await?;

        let result = self.transcribe_and_translate(resolved.path(), model_size).await;
        resolved.release();
        result
    }

    /// Run `predict` until `shutdown` completes, whichever comes first.
    ///
    /// An abandoned run is dropped, which removes its downloaded file and
    /// kills a running transcriber process.
    pub async fn predict_until<S>(&self, audio: &str, model_size: &str, shutdown: S) -> Result<String>
    where
        S: Future,
    {
        tokio::select! {
            result = self.predict(audio, model_size) => result,
            _ = shutdown => {
                warn!("Interrupted, abandoning {}", audio);
                Err(SrtError::Interrupted)
            }
        }
    }

    /// Run the model over `input_path` and annotate each segment
    pub async fn transcribe_and_translate(&self, input_path: &Path, model_size: &str) -> Result<String> {
        let model = self.loader.load(model_size).await?;
        let transcription = model.transcribe(input_path).await?;

        let entries = self.annotate(&transcription).await;
        info!("Generated {} subtitle entries from {} segments",
              entries.len(), transcription.segments.len());

        Ok(render_srt(&entries))
    }

    /// Detect, translate and number segments.
    ///
    /// The index is the segment's 1-based position among all segments, so
    /// skipped empty segments leave gaps in the numbering.
    async fn annotate(&self, transcription: &Transcription) -> Vec<SubtitleEntry> {
        let overall_language = transcription.language_or(&self.config.detect.fallback_language);
        let source_language = self.config.translate.source_language.as_str();
        let target_language = self.config.translate.target_language.as_str();
        let total_segments = transcription.segments.len();

        let mut entries = Vec::new();
        for (idx, segment) in transcription.segments.iter().enumerate() {
            let index = idx + 1;
            let text = segment.text.trim();
            if text.is_empty() {
                debug!("Skipping empty segment {}/{}", index, total_segments);
                continue;
            }

            let lang = match self.detector.detect(text).await {
                Ok(lang) => reconcile_language(lang, overall_language),
                Err(e) => {
                    warn!("Language detection failed for segment {}: {}; using {}", index, e, overall_language);
                    overall_language.to_string()
                }
            };

            let output_text = if lang == source_language {
                info!("┌─ Translating segment {}/{} ────────", index, total_segments);
                info!("│ Source: {}", text);
                match self.translator.translate(text, source_language, target_language).await {
                    Ok(translation) => {
                        info!("│ Target: {}", translation);
                        info!("└─────────────────────────────────────");
                        translation
                    }
                    Err(e) => {
                        warn!("│ Failed: {}", e);
                        warn!("└─────────────────────────────────────");
                        text.to_string()
                    }
                }
            } else {
                text.to_string()
            };

            entries.push(SubtitleEntry::new(index, segment.start, segment.end, output_text));
        }

        entries
    }
}

/// Kanji-only Japanese is indistinguishable from Chinese by script, so a
/// `zh` segment in a Japanese transcription is taken as Japanese.
fn reconcile_language(detected: String, overall_language: &str) -> String {
    if detected == "zh" && overall_language == "ja" {
        debug!("Treating kanji-only segment as {}", overall_language);
        return overall_language.to_string();
    }
    detected
}
