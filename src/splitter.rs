//! High-level scene splitting.
//!
//! [`split_scenes`] composes the whole pipeline (open a video, detect
//! boundaries, build contiguous scenes, filter by length) and returns the
//! serializable [`SceneList`]. [`split_scenes_with_source`] runs the same
//! pipeline over any [`FrameSource`], which is how the tests drive it with
//! synthetic streams.

use std::path::Path;
use std::sync::Arc;

use crate::detector::{DetectionOptions, detect_boundaries};
use crate::error::SceneSplitError;
use crate::filter::filter_scenes;
use crate::progress::ProgressCallback;
use crate::scene::{SceneList, build_scenes};
use crate::source::{FrameSource, VideoFrameSource};

/// Settings for a full scene-splitting run: detection knobs plus scene
/// length constraints.
///
/// Defaults mirror the standalone tool: sample 1 frame per second, threshold
/// 0.6, keep scenes between 10 and 60 seconds.
///
/// # Example
///
/// ```no_run
/// use scenesplit::{SplitOptions, split_scenes};
///
/// let options = SplitOptions::new()
///     .threshold(0.5)
///     .min_length(3.0)
///     .no_max_length();
/// let scenes = split_scenes("input.mp4", &options)?;
/// println!("{}", scenes.to_json_pretty()?);
/// # Ok::<(), scenesplit::SceneSplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Boundary detection settings.
    pub detection: DetectionOptions,
    /// Minimum scene length in seconds; shorter scenes are dropped.
    pub min_length: f64,
    /// Maximum scene length in seconds; `None` means no upper bound.
    pub max_length: Option<f64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            detection: DetectionOptions::default(),
            min_length: 10.0,
            max_length: Some(60.0),
        }
    }
}

impl SplitOptions {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many frames are sampled per second of video.
    #[must_use]
    pub fn sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.detection.sampling_rate = sampling_rate;
        self
    }

    /// Set the boundary-declaration threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.detection.threshold = threshold;
        self
    }

    /// Stop after sampling at most `max_samples` frames.
    #[must_use]
    pub fn max_samples(mut self, max_samples: u64) -> Self {
        self.detection.max_samples = Some(max_samples);
        self
    }

    /// Set the minimum scene length in seconds.
    #[must_use]
    pub fn min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    /// Set the maximum scene length in seconds.
    #[must_use]
    pub fn max_length(mut self, max_length: f64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Remove the upper bound on scene length.
    #[must_use]
    pub fn no_max_length(mut self) -> Self {
        self.max_length = None;
        self
    }

    /// Attach a progress callback, invoked once per sampled frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.detection.progress = callback;
        self
    }

    fn validate(&self) -> Result<(), SceneSplitError> {
        if self.min_length < 0.0 {
            return Err(SceneSplitError::InvalidLength {
                value: self.min_length,
            });
        }
        if let Some(max_length) = self.max_length
            && max_length < 0.0
        {
            return Err(SceneSplitError::InvalidLength { value: max_length });
        }
        Ok(())
    }
}

/// Detect, build, and filter scenes for a video file.
///
/// # Errors
///
/// Returns [`SceneSplitError::VideoOpen`] or
/// [`SceneSplitError::NoVideoStream`] when the file cannot be opened (fatal,
/// no partial output), and [`SceneSplitError::InvalidThreshold`] /
/// [`SceneSplitError::InvalidLength`] for contract-violating options.
/// Mid-stream decode interruptions are non-fatal and produce scenes from the
/// boundaries gathered before the failure.
pub fn split_scenes<P: AsRef<Path>>(
    path: P,
    options: &SplitOptions,
) -> Result<SceneList, SceneSplitError> {
    options.validate()?;
    let mut source = VideoFrameSource::open(path)?;
    split_scenes_with_source(&mut source, options)
}

/// Run the scene-splitting pipeline over an already-open frame source.
pub fn split_scenes_with_source<S: FrameSource>(
    source: &mut S,
    options: &SplitOptions,
) -> Result<SceneList, SceneSplitError> {
    options.validate()?;

    let detection = detect_boundaries(source, &options.detection)?;
    let scenes = build_scenes(&detection.boundaries, detection.duration_seconds);
    let scenes = filter_scenes(scenes, options.min_length, options.max_length);

    Ok(SceneList::new(scenes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_mirror_the_tool_defaults() {
        let options = SplitOptions::default();
        assert_eq!(options.detection.sampling_rate, 1.0);
        assert_eq!(options.detection.threshold, 0.6);
        assert_eq!(options.min_length, 10.0);
        assert_eq!(options.max_length, Some(60.0));
    }

    #[test]
    fn negative_lengths_are_rejected() {
        assert!(matches!(
            SplitOptions::new().min_length(-1.0).validate(),
            Err(SceneSplitError::InvalidLength { .. })
        ));
        assert!(matches!(
            SplitOptions::new().max_length(-5.0).validate(),
            Err(SceneSplitError::InvalidLength { .. })
        ));
        assert!(SplitOptions::new().no_max_length().validate().is_ok());
    }
}
