//! Error types for the `scenesplit` crate.
//!
//! This module defines [`SceneSplitError`], the unified error type returned by
//! all fallible operations in the crate. Only source-level failures propagate
//! as errors: histogram extraction and distance computation are total
//! functions over well-formed frame buffers.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `scenesplit` operations.
///
/// Every public method that can fail returns `Result<T, SceneSplitError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SceneSplitError {
    /// The video file could not be opened.
    ///
    /// This is fatal: no partial scene list is produced.
    #[error("Failed to open video at {path}: {reason}")]
    VideoOpen {
        /// Path that was passed to [`crate::VideoFrameSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The detection threshold is outside the valid `[0, 1]` range.
    #[error("Threshold {value} is outside the valid range [0, 1]")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },

    /// A scene length bound is negative.
    #[error("Scene length bound {value} must not be negative")]
    InvalidLength {
        /// The rejected length value in seconds.
        value: f64,
    },

    /// Demuxing or decoding failed mid-stream.
    ///
    /// [`detect_boundaries`](crate::detect_boundaries) treats this as end of
    /// stream and returns the boundaries gathered so far; it only surfaces as
    /// an error from [`FrameSource::read_next`](crate::FrameSource::read_next).
    #[error("Decoding interrupted mid-stream: {0}")]
    DecodeInterrupted(String),

    /// An I/O error occurred while writing a scene list to disk.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Scene list serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
