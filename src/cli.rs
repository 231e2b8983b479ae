use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;

use crate::pipeline::DEFAULT_MODEL_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Audio file path or http(s) URL
    pub audio: String,

    /// Whisper model size (tiny, base, small, medium, large, ...)
    #[arg(default_value = DEFAULT_MODEL_SIZE)]
    pub model_size: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write the SRT text to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Parse the command line, exiting with status 1 and a usage message on
    /// bad input. `--help` and `--version` keep clap's behavior.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => {
                let _ = e.print();
                std::process::exit(1);
            }
        }
    }
}
