//! FFmpeg log level configuration.
//!
//! FFmpeg has its own internal logging, separate from the Rust
//! [`log`](https://crates.io/crates/log) crate, and by default it prints
//! decoder warnings to stderr, which gets noisy during a long scan over imperfect
//! footage. This wrapper lets `scenesplit` users tune that output without
//! importing `ffmpeg-next` directly.
//!
//! # Example
//!
//! ```no_run
//! use scenesplit::FfmpegLogLevel;
//!
//! // Only show decoder errors and worse while scanning.
//! scenesplit::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, from most quiet to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// No output at all.
    Quiet,
    /// Only conditions that abort the process.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable decode errors.
    Error,
    /// Warnings, FFmpeg's default.
    Warning,
    /// Informational messages.
    Info,
    /// Chatty informational messages.
    Verbose,
    /// Debugging output.
    Debug,
    /// Everything, including per-packet noise.
    Trace,
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

/// Set FFmpeg's internal log verbosity.
///
/// Controls what FFmpeg itself prints to stderr; Rust-side diagnostics go
/// through the `log` crate and are configured by whatever logger the
/// application installs.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into());
}
