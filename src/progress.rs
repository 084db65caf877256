//! Progress reporting for long-running scans.
//!
//! [`ProgressCallback`] lets callers observe a detection pass without
//! polluting the detector's signature. Callbacks are infallible: they
//! observe but cannot halt the scan; bounded-time runs use the
//! `max_samples` knob on [`DetectionOptions`](crate::DetectionOptions)
//! instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of detection progress.
///
/// Delivered to [`ProgressCallback::on_progress`] once per sampled frame.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Sampled frames processed so far.
    pub current: u64,
    /// Expected total number of sampled frames, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the scan started.
    pub elapsed: Duration,
    /// Ordinal index of the frame just sampled.
    pub current_frame: Option<u64>,
    /// Timestamp in seconds of the frame just sampled.
    pub current_timestamp_seconds: Option<f64>,
}

/// Trait for receiving progress updates during a detection scan.
///
/// Implementations must be [`Send`] and [`Sync`] so a single callback can be
/// shared across option clones.
pub trait ProgressCallback: Send + Sync {
    /// Called once per sampled frame, plus a final report at scan end.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks scan timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: Option<u64>) -> Self {
        Self {
            callback,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one sampled frame and fire the callback.
    pub(crate) fn advance(&mut self, frame_index: u64, timestamp_seconds: f64) {
        self.current += 1;
        self.report(Some(frame_index), Some(timestamp_seconds));
    }

    /// Emit a final report at scan end.
    pub(crate) fn finish(&self) {
        self.report(None, None);
    }

    fn report(&self, frame_index: Option<u64>, timestamp_seconds: Option<f64>) {
        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let info = ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            current_frame: frame_index,
            current_timestamp_seconds: timestamp_seconds,
        };

        self.callback.on_progress(&info);
    }
}
