//! # scenesplit
//!
//! Detect scene boundaries in video files via perceptual color-histogram
//! comparison.
//!
//! `scenesplit` scans a decoded frame stream (powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), measures the
//! Bhattacharyya distance between hue/saturation histograms of sampled
//! frames, and emits a set of non-overlapping time intervals ("scenes")
//! covering the video, serialized as a stable JSON contract:
//!
//! ```json
//! {"scenes": [{"start": 0.0, "end": 12.5}, {"start": 12.5, "end": 48.2}]}
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use scenesplit::{SplitOptions, split_scenes};
//!
//! let scenes = split_scenes("input.mp4", &SplitOptions::new())?;
//! println!("{}", scenes.to_json_pretty()?);
//! # Ok::<(), scenesplit::SceneSplitError>(())
//! ```
//!
//! ### Tuning detection
//!
//! ```no_run
//! use scenesplit::{SplitOptions, split_scenes};
//!
//! let options = SplitOptions::new()
//!     .sampling_rate(2.0)   // analyze 2 frames per second of video
//!     .threshold(0.5)       // lower -> more cuts declared
//!     .min_length(3.0)
//!     .no_max_length();
//! let scenes = split_scenes("input.mp4", &options)?;
//! # Ok::<(), scenesplit::SceneSplitError>(())
//! ```
//!
//! ### Driving the detector directly
//!
//! ```no_run
//! use scenesplit::{DetectionOptions, VideoFrameSource, build_scenes, detect_boundaries};
//!
//! let mut source = VideoFrameSource::open("input.mp4")?;
//! let detection = detect_boundaries(&mut source, &DetectionOptions::new())?;
//! let scenes = build_scenes(&detection.boundaries, detection.duration_seconds);
//! # Ok::<(), scenesplit::SceneSplitError>(())
//! ```
//!
//! ## Design
//!
//! - Decoding stays behind the narrow [`FrameSource`] trait; the detection
//!   algorithm never touches FFmpeg types and can be tested with synthetic
//!   frame streams.
//! - Comparison is strictly adjacent-sample: frame *N* against frame *N−1*
//!   in decode order, never a running average.
//! - Open failures are fatal and produce no output; mid-stream decode
//!   interruptions are treated as end of stream and yield the scenes found
//!   so far.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod detector;
pub mod distance;
pub mod error;
pub mod ffmpeg;
pub mod filter;
pub mod histogram;
pub mod progress;
pub mod scene;
pub mod source;
pub mod splitter;

pub use detector::{Detection, DetectionOptions, detect_boundaries};
pub use distance::bhattacharyya;
pub use error::SceneSplitError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use filter::filter_scenes;
pub use histogram::{DESCRIPTOR_LEN, Descriptor, HUE_BINS, HistogramExtractor, SAT_BINS};
pub use progress::{ProgressCallback, ProgressInfo};
pub use scene::{Scene, SceneList, build_scenes};
pub use source::{Frame, FrameSource, VideoFrameSource, VideoInfo};
pub use splitter::{SplitOptions, split_scenes, split_scenes_with_source};
