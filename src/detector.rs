//! Scene-boundary detection.
//!
//! [`detect_boundaries`] drives a sampled, strictly sequential walk over a
//! [`FrameSource`], reduces each sampled frame to a hue/saturation
//! [`Descriptor`](crate::Descriptor), and compares it to the immediately
//! preceding sample with the Bhattacharyya distance. Whenever the distance
//! reaches the configured threshold, the sampled frame's timestamp is
//! recorded as a boundary.
//!
//! # Example
//!
//! ```no_run
//! use scenesplit::{DetectionOptions, VideoFrameSource, detect_boundaries};
//!
//! let mut source = VideoFrameSource::open("input.mp4")?;
//! let options = DetectionOptions::new().threshold(0.5).sampling_rate(2.0);
//! let detection = detect_boundaries(&mut source, &options)?;
//! for boundary in &detection.boundaries {
//!     println!("cut at {boundary:.3}s");
//! }
//! # Ok::<(), scenesplit::SceneSplitError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::distance::bhattacharyya;
use crate::error::SceneSplitError;
use crate::histogram::{Descriptor, HistogramExtractor};
use crate::progress::{NoOpProgress, ProgressCallback, ProgressTracker};
use crate::source::FrameSource;

/// Boundary detection settings.
///
/// Defaults match the common case: one sampled frame per second of video and
/// a threshold of 0.6 (higher thresholds declare fewer cuts).
#[derive(Clone)]
pub struct DetectionOptions {
    /// Frames sampled per second of video. Values `<= 0` mean "sample every
    /// decoded frame", the degraded no-op sampling case, not an error.
    pub sampling_rate: f64,
    /// Histogram distance in `[0, 1]` at or above which a boundary is
    /// declared.
    pub threshold: f64,
    /// Optional cap on the number of sampled frames, for bounded-time runs.
    pub max_samples: Option<u64>,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for DetectionOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DetectionOptions")
            .field("sampling_rate", &self.sampling_rate)
            .field("threshold", &self.threshold)
            .field("max_samples", &self.max_samples)
            .finish_non_exhaustive()
    }
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            sampling_rate: 1.0,
            threshold: 0.6,
            max_samples: None,
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl DetectionOptions {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many frames are sampled per second of video.
    #[must_use]
    pub fn sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Set the boundary-declaration threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Stop after sampling at most `max_samples` frames.
    #[must_use]
    pub fn max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Attach a progress callback, invoked once per sampled frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }
}

/// The outcome of a detection pass.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Detection {
    /// Boundary timestamps in seconds, monotonically non-decreasing.
    pub boundaries: Vec<f64>,
    /// Total video duration in seconds; 0.0 when unknown, in which case the
    /// scene builder falls back to the last boundary as the end.
    pub duration_seconds: f64,
}

/// Scan a frame source and detect scene boundaries.
///
/// Walks the stream sequentially, sampling every `stride`-th frame where
/// `stride = max(1, round(native_fps / sampling_rate))`. Each sampled frame
/// is compared to the immediately preceding sample: strictly adjacent-pair
/// comparison, never a running average. The source is released when it goes
/// out of scope at the caller, on every exit path.
///
/// A mid-stream [`DecodeInterrupted`](SceneSplitError::DecodeInterrupted) is
/// treated as end of stream: the boundaries gathered so far are returned,
/// since partial detection is more useful than none.
///
/// # Errors
///
/// Returns [`SceneSplitError::InvalidThreshold`] when the threshold lies
/// outside `[0, 1]`; the check runs before any frame is decoded.
pub fn detect_boundaries<S: FrameSource>(
    source: &mut S,
    options: &DetectionOptions,
) -> Result<Detection, SceneSplitError> {
    if !(0.0..=1.0).contains(&options.threshold) {
        return Err(SceneSplitError::InvalidThreshold {
            value: options.threshold,
        });
    }

    let frames_per_second = source.frame_rate();
    let frame_count = source.frame_count();

    let duration_seconds = if frames_per_second > 0.0 && frame_count > 0 {
        frame_count as f64 / frames_per_second
    } else {
        0.0
    };

    let stride = sample_stride(frames_per_second, options.sampling_rate);

    log::debug!(
        "Detecting boundaries (threshold={}, stride={}, ~{} frames)",
        options.threshold,
        stride,
        frame_count,
    );

    let expected_samples = if frame_count > 0 {
        Some(frame_count.div_ceil(stride))
    } else {
        None
    };
    let mut tracker = ProgressTracker::new(options.progress.clone(), expected_samples);

    let extractor = HistogramExtractor::new();
    let mut previous: Option<Descriptor> = None;
    let mut boundaries = Vec::new();
    let mut sampled_frames: u64 = 0;

    loop {
        let frame = match source.read_next() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(error) => {
                log::warn!(
                    "Frame stream interrupted after {sampled_frames} samples, \
                     keeping {} boundaries: {error}",
                    boundaries.len(),
                );
                break;
            }
        };

        if frame.index % stride != 0 {
            continue;
        }
        sampled_frames += 1;

        let descriptor = extractor.extract(&frame);
        let timestamp = frame_timestamp(frame.index, frames_per_second);

        if let Some(previous) = &previous {
            let distance = bhattacharyya(previous, &descriptor);
            if distance >= options.threshold {
                log::debug!("Boundary at {timestamp:.3}s (distance {distance:.3})");
                boundaries.push(timestamp);
            }
        }
        previous = Some(descriptor);
        tracker.advance(frame.index, timestamp);

        if let Some(max_samples) = options.max_samples
            && sampled_frames >= max_samples
        {
            log::debug!("Stopping after {sampled_frames} sampled frames");
            break;
        }
    }

    tracker.finish();

    log::info!(
        "Detected {} scene boundaries over {:.2}s",
        boundaries.len(),
        duration_seconds,
    );

    Ok(Detection {
        boundaries,
        duration_seconds,
    })
}

/// Number of native frames between consecutive samples.
///
/// 1 whenever the sampling rate or native rate is unknown or non-positive,
/// i.e. every decoded frame is analyzed.
fn sample_stride(frames_per_second: f64, sampling_rate: f64) -> u64 {
    if sampling_rate > 0.0 && frames_per_second > 0.0 {
        ((frames_per_second / sampling_rate).round() as u64).max(1)
    } else {
        1
    }
}

/// Timestamp in seconds of a frame index, or 0.0 when the frame rate is
/// unknown.
fn frame_timestamp(frame_index: u64, frames_per_second: f64) -> f64 {
    if frames_per_second > 0.0 {
        frame_index as f64 / frames_per_second
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_from_native_and_sampling_rate() {
        assert_eq!(sample_stride(30.0, 1.0), 30);
        assert_eq!(sample_stride(25.0, 5.0), 5);
        assert_eq!(sample_stride(29.97, 1.0), 30);
    }

    #[test]
    fn stride_degrades_to_every_frame() {
        // Sampling faster than the native rate still analyzes every frame.
        assert_eq!(sample_stride(30.0, 120.0), 1);
        // Unknown native rate or disabled sampling: every frame.
        assert_eq!(sample_stride(0.0, 1.0), 1);
        assert_eq!(sample_stride(30.0, 0.0), 1);
        assert_eq!(sample_stride(30.0, -1.0), 1);
    }

    #[test]
    fn timestamp_zero_when_rate_unknown() {
        assert_eq!(frame_timestamp(90, 30.0), 3.0);
        assert_eq!(frame_timestamp(90, 0.0), 0.0);
    }
}
