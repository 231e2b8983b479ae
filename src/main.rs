//! audio-to-srt command-line entry point
//!
//! Prints the SRT for one audio file or URL to standard output. Logs go to
//! standard error and to `.audio-to-srt/log`.

use anyhow::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use audio_to_srt::cli::Args;
use audio_to_srt::config::Config;
use audio_to_srt::pipeline::Pipeline;
use audio_to_srt::subtitle::write_srt;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_or_exit();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    info!("Transcribing {} with model {}", args.audio, args.model_size);
    let pipeline = Pipeline::new(config)?;
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let srt = pipeline
        .predict_until(&args.audio, &args.model_size, interrupted)
        .await?;

    if let Some(output) = &args.output {
        write_srt(&srt, output).await?;
    }
    println!("{}", srt);

    Ok(())
}

/// Setup logging to stderr and a daily rotated file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".audio-to-srt").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "audio-to-srt.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries the SRT output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("audio-to-srt.log").display());

    Ok(())
}
