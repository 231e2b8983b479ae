//! audio-to-srt - Audio transcription to SRT subtitles
//!
//! Fetches audio from a URL or local path, transcribes it with Whisper,
//! detects the language of each segment and translates Japanese segments to
//! English before formatting everything as SRT.

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
