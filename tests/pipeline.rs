use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use assert_fs::prelude::*;
use async_trait::async_trait;

use audio_to_srt::config::Config;
use audio_to_srt::detect::LanguageDetector;
use audio_to_srt::error::{Result, SrtError};
use audio_to_srt::fetch::{HttpClient, HttpResponse};
use audio_to_srt::pipeline::{DEFAULT_MODEL_SIZE, Pipeline};
use audio_to_srt::transcribe::{ModelLoader, Segment, SpeechModel, Transcription};
use audio_to_srt::translate::Translator;

struct StubLoader {
    transcription: Transcription,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
    seen_sizes: Arc<Mutex<Vec<String>>>,
}

struct StubModel {
    transcription: Transcription,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl ModelLoader for StubLoader {
    async fn load(&self, model_size: &str) -> Result<Box<dyn SpeechModel>> {
        self.seen_sizes.lock().unwrap().push(model_size.to_string());
        Ok(Box::new(StubModel {
            transcription: self.transcription.clone(),
            seen_paths: self.seen_paths.clone(),
        }))
    }
}

#[async_trait]
impl SpeechModel for StubModel {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        assert!(audio_path.exists(), "audio missing during transcription");
        self.seen_paths.lock().unwrap().push(audio_path.to_path_buf());
        Ok(self.transcription.clone())
    }
}

/// Kana means Japanese, anything else English
struct KanaDetector;

#[async_trait]
impl LanguageDetector for KanaDetector {
    async fn detect(&self, text: &str) -> Result<String> {
        let is_kana = text.chars().any(|c| ('\u{3040}'..='\u{30ff}').contains(&c));
        Ok(if is_kana { "ja" } else { "en" }.to_string())
    }
}

struct DictionaryTranslator {
    entries: HashMap<&'static str, &'static str>,
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        assert_eq!((source, target), ("ja", "en"));
        self.entries
            .get(text)
            .map(|t| t.to_string())
            .ok_or_else(|| SrtError::Translation(format!("no entry for {}", text)))
    }
}

struct StubHttp {
    status: u16,
    body: Vec<u8>,
}

#[async_trait]
impl HttpClient for StubHttp {
    async fn get(&self, _url: &str) -> Result<HttpResponse> {
        Ok(HttpResponse { status: self.status, body: self.body.clone() })
    }
}

struct Harness {
    pipeline: Pipeline,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
    seen_sizes: Arc<Mutex<Vec<String>>>,
}

fn harness(config: Config, http: StubHttp, segments: Vec<Segment>) -> Harness {
    let seen_paths = Arc::new(Mutex::new(Vec::new()));
    let seen_sizes = Arc::new(Mutex::new(Vec::new()));
    let loader = StubLoader {
        transcription: Transcription::new(segments, Some("ja".to_string())),
        seen_paths: seen_paths.clone(),
        seen_sizes: seen_sizes.clone(),
    };
    let translator = DictionaryTranslator {
        entries: HashMap::from([("こんにちは", "Hello")]),
    };

    let pipeline = Pipeline::with_collaborators(
        config,
        Box::new(http),
        Box::new(loader),
        Box::new(KanaDetector),
        Box::new(translator),
    );

    Harness { pipeline, seen_paths, seen_sizes }
}

fn hello_world() -> Vec<Segment> {
    vec![
        Segment::new(0.0, 2.0, " こんにちは"),
        Segment::new(2.0, 4.0, " World"),
    ]
}

fn unused_http() -> StubHttp {
    StubHttp { status: 500, body: Vec::new() }
}

const HELLO_WORLD_SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,000 --> 00:00:04,000\nWorld\n";

#[tokio::test]
async fn translates_japanese_and_keeps_english() {
    let temp = assert_fs::TempDir::new().unwrap();
    let audio = temp.child("talk.wav");
    audio.write_binary(b"RIFF").unwrap();

    let h = harness(Config::default(), unused_http(), hello_world());
    let srt = h.pipeline
        .predict(audio.path().to_str().unwrap(), DEFAULT_MODEL_SIZE)
        .await
        .unwrap();

    assert_eq!(srt, HELLO_WORLD_SRT);
    assert_eq!(*h.seen_sizes.lock().unwrap(), vec!["base".to_string()]);
}

#[tokio::test]
async fn untranslatable_japanese_keeps_original_text() {
    let temp = assert_fs::TempDir::new().unwrap();
    let audio = temp.child("talk.wav");
    audio.write_binary(b"RIFF").unwrap();

    let segments = vec![Segment::new(0.0, 1.0, "さようなら ")];
    let h = harness(Config::default(), unused_http(), segments);
    let srt = h.pipeline
        .predict(audio.path().to_str().unwrap(), "small")
        .await
        .unwrap();

    assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,000\nさようなら\n");
    assert_eq!(*h.seen_sizes.lock().unwrap(), vec!["small".to_string()]);
}

#[tokio::test]
async fn local_path_is_used_in_place_and_kept() {
    let temp = assert_fs::TempDir::new().unwrap();
    let audio = temp.child("talk.wav");
    audio.write_binary(b"RIFF").unwrap();

    let h = harness(Config::default(), unused_http(), hello_world());
    h.pipeline
        .predict(audio.path().to_str().unwrap(), "base")
        .await
        .unwrap();

    assert_eq!(*h.seen_paths.lock().unwrap(), vec![audio.path().to_path_buf()]);
    assert_eq!(std::fs::read(audio.path()).unwrap(), b"RIFF");
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn downloaded_audio_is_removed_after_success() {
    let downloads = assert_fs::TempDir::new().unwrap();
    let mut config = Config::default();
    config.fetch.temp_dir = Some(downloads.path().to_path_buf());

    let http = StubHttp { status: 200, body: b"ID3".to_vec() };
    let h = harness(config, http, hello_world());
    let srt = h.pipeline
        .predict("https://cdn.example.com/episodes/42.m4a?token=abc", "base")
        .await
        .unwrap();

    assert_eq!(srt, HELLO_WORLD_SRT);
    let seen = h.seen_paths.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].extension().and_then(|e| e.to_str()), Some("m4a"));
    assert!(!seen[0].exists());
    assert_eq!(std::fs::read_dir(downloads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn not_found_url_fails_without_leftovers() {
    let downloads = assert_fs::TempDir::new().unwrap();
    let mut config = Config::default();
    config.fetch.temp_dir = Some(downloads.path().to_path_buf());

    let http = StubHttp { status: 404, body: b"Not Found".to_vec() };
    let h = harness(config, http, hello_world());
    let err = h.pipeline
        .predict("https://cdn.example.com/missing.mp3", "base")
        .await
        .unwrap_err();

    assert!(matches!(err, SrtError::Fetch { status: 404, .. }));
    assert!(err.to_string().contains("404"));
    assert!(h.seen_sizes.lock().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(downloads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn no_segments_yields_empty_output() {
    let temp = assert_fs::TempDir::new().unwrap();
    let audio = temp.child("silence.wav");
    audio.write_binary(b"RIFF").unwrap();

    let h = harness(Config::default(), unused_http(), Vec::new());
    let srt = h.pipeline
        .predict(audio.path().to_str().unwrap(), "base")
        .await
        .unwrap();

    assert_eq!(srt, "");
}
