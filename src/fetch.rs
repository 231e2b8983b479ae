use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::{Result, SrtError};

/// Status and body of a completed GET request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP capability used to download remote audio
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// reqwest-backed client with a download progress bar
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(SrtError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        let pb = match response.content_length() {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            pb.set_position(body.len() as u64);
        }
        pb.finish_and_clear();

        Ok(HttpResponse { status, body })
    }
}

/// Audio ready for transcription; downloaded files are removed on release or drop
#[derive(Debug)]
pub struct ResolvedAudio {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ResolvedAudio {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), temp: None }
    }

    fn temporary(temp: TempPath) -> Self {
        Self { path: temp.to_path_buf(), temp: Some(temp) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this pipeline owns the file and must delete it
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Delete the downloaded file now. Local paths are left alone.
    pub fn release(self) {
        if let Some(temp) = self.temp {
            match temp.close() {
                Ok(()) => debug!("Removed temporary audio: {}", self.path.display()),
                Err(e) => warn!("Failed to remove temporary audio {}: {}", self.path.display(), e),
            }
        }
    }
}

pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Suffix taken from the URL path extension, e.g. `.wav`
fn url_suffix(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let ext = Path::new(parsed.path()).extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext))
}

pub struct AudioResolver {
    http: Box<dyn HttpClient>,
    config: FetchConfig,
}

impl AudioResolver {
    pub fn new(http: Box<dyn HttpClient>, config: FetchConfig) -> Self {
        Self { http, config }
    }

    /// Turn a URL or local path into a file the transcriber can read
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedAudio> {
        if !is_remote(reference) {
            debug!("Using local audio: {}", reference);
            return Ok(ResolvedAudio::local(reference));
        }

        info!("Downloading audio: {}", reference);
        let response = self.http.get(reference).await?;
        if !response.is_success() {
            return Err(SrtError::Fetch {
                url: reference.to_string(),
                status: response.status,
            });
        }

        let suffix = url_suffix(reference).unwrap_or_else(|| self.config.default_suffix.clone());
        let mut builder = tempfile::Builder::new();
        builder.prefix("audio-").suffix(&suffix);
        let mut file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(&response.body)?;
        file.flush()?;

        let temp = file.into_temp_path();
        info!("Downloaded {} bytes to {}", response.body.len(), temp.display());
        Ok(ResolvedAudio::temporary(temp))
    }
}
