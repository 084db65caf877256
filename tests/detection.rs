//! Boundary detection tests over synthetic frame streams.
//!
//! A scripted in-memory [`FrameSource`] stands in for a real video, so these
//! tests exercise sampling, thresholding, early stop, and interruption
//! handling without any fixture files.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use scenesplit::{
    DetectionOptions, Frame, FrameSource, ProgressCallback, ProgressInfo, Scene, SceneSplitError,
    SplitOptions, detect_boundaries, split_scenes_with_source,
};

const WIDTH: u32 = 32;
const HEIGHT: u32 = 18;

const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const BLUE: [u8; 3] = [0, 0, 255];

fn solid_frame(index: u64, color: [u8; 3]) -> Frame {
    let pixels = (WIDTH * HEIGHT) as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    for _ in 0..pixels {
        rgb.extend_from_slice(&color);
    }
    Frame {
        index,
        width: WIDTH,
        height: HEIGHT,
        rgb,
    }
}

/// A frame whose left half is one color and right half another, giving a
/// Bhattacharyya distance of `sqrt(1 - sqrt(0.5)) ≈ 0.54` against either
/// solid color.
fn half_frame(index: u64, left: [u8; 3], right: [u8; 3]) -> Frame {
    let mut rgb = Vec::with_capacity((WIDTH * HEIGHT) as usize * 3);
    for _ in 0..HEIGHT {
        for x in 0..WIDTH {
            rgb.extend_from_slice(if x < WIDTH / 2 { &left } else { &right });
        }
    }
    Frame {
        index,
        width: WIDTH,
        height: HEIGHT,
        rgb,
    }
}

/// Scripted frame source: a fixed frame list, optionally failing mid-stream.
struct ScriptedSource {
    frames: Vec<Frame>,
    cursor: usize,
    frames_per_second: f64,
    /// Reported frame count; usually `frames.len()`, but scripted
    /// independently so truncated streams can still advertise full metadata.
    reported_count: u64,
    /// When set, `read_next` fails once this many frames have been read.
    fail_after: Option<usize>,
}

impl ScriptedSource {
    fn new(frames: Vec<Frame>, frames_per_second: f64) -> Self {
        let reported_count = frames.len() as u64;
        Self {
            frames,
            cursor: 0,
            frames_per_second,
            reported_count,
            fail_after: None,
        }
    }

    fn failing_after(mut self, read_limit: usize) -> Self {
        self.fail_after = Some(read_limit);
        self
    }
}

impl FrameSource for ScriptedSource {
    fn frame_rate(&self) -> f64 {
        self.frames_per_second
    }

    fn frame_count(&self) -> u64 {
        self.reported_count
    }

    fn read_next(&mut self) -> Result<Option<Frame>, SceneSplitError> {
        if let Some(limit) = self.fail_after
            && self.cursor >= limit
        {
            return Err(SceneSplitError::DecodeInterrupted(
                "scripted stream truncated".to_string(),
            ));
        }
        let Some(frame) = self.frames.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        Ok(Some(frame.clone()))
    }
}

/// Red for `frames[..cut]`, blue for the rest.
fn cut_stream(total: usize, cut: usize, frames_per_second: f64) -> ScriptedSource {
    let frames = (0..total)
        .map(|index| {
            let color = if index < cut { RED } else { BLUE };
            solid_frame(index as u64, color)
        })
        .collect();
    ScriptedSource::new(frames, frames_per_second)
}

// ── sampling ───────────────────────────────────────────────────────

#[test]
fn stride_samples_every_thirtieth_frame_at_30fps() {
    // 91 frames at 30 fps, sampled at 1 fps: indices 0, 30, 60, 90. The cut
    // at frame 45 is first seen at sample 60, so the boundary lands there.
    let mut source = cut_stream(91, 45, 30.0);
    let options = DetectionOptions::new().sampling_rate(1.0).threshold(0.6);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert_eq!(detection.boundaries, vec![2.0]);
}

#[test]
fn non_positive_sampling_rate_samples_every_frame() {
    let mut source = cut_stream(20, 5, 10.0);
    let options = DetectionOptions::new().sampling_rate(0.0).threshold(0.6);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert_eq!(detection.boundaries, vec![0.5]);
}

#[test]
fn duration_comes_from_rate_and_count() {
    let mut source = cut_stream(90, 45, 30.0);
    let detection = detect_boundaries(&mut source, &DetectionOptions::new()).unwrap();
    assert!((detection.duration_seconds - 3.0).abs() < 1e-9);
}

// ── thresholding ───────────────────────────────────────────────────

#[test]
fn raising_threshold_never_increases_boundary_count() {
    // Two soft transitions (distance ≈ 0.54 each): red → half red/blue →
    // blue, every frame analyzed.
    let build = || {
        let mut frames = Vec::new();
        for index in 0..10 {
            frames.push(solid_frame(index, RED));
        }
        for index in 10..20 {
            frames.push(half_frame(index, RED, BLUE));
        }
        for index in 20..30 {
            frames.push(solid_frame(index, BLUE));
        }
        ScriptedSource::new(frames, 10.0)
    };

    let mut previous_count = usize::MAX;
    for threshold in [0.1, 0.5, 0.8, 1.0] {
        let options = DetectionOptions::new().sampling_rate(0.0).threshold(threshold);
        let detection = detect_boundaries(&mut build(), &options).unwrap();
        assert!(
            detection.boundaries.len() <= previous_count,
            "threshold {threshold} produced more boundaries than a lower one"
        );
        previous_count = detection.boundaries.len();
    }
}

#[test]
fn identical_stream_yields_no_boundaries() {
    let frames = (0..30).map(|index| solid_frame(index, GREEN)).collect();
    let mut source = ScriptedSource::new(frames, 10.0);
    let options = DetectionOptions::new().sampling_rate(0.0).threshold(0.2);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert!(detection.boundaries.is_empty());
}

#[test]
fn detection_is_deterministic() {
    let options = DetectionOptions::new().sampling_rate(0.0).threshold(0.4);

    let first = detect_boundaries(&mut cut_stream(50, 20, 25.0), &options).unwrap();
    let second = detect_boundaries(&mut cut_stream(50, 20, 25.0), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn threshold_outside_unit_range_is_rejected() {
    for value in [-0.1, 1.5] {
        let options = DetectionOptions::new().threshold(value);
        let result = detect_boundaries(&mut cut_stream(10, 5, 10.0), &options);
        assert!(matches!(
            result,
            Err(SceneSplitError::InvalidThreshold { .. })
        ));
    }
}

// ── early stop and interruption ────────────────────────────────────

#[test]
fn max_samples_stops_the_scan_early() {
    // Cuts at frames 3 and 50; sampling every frame but capped at 5 samples
    // only the first cut is seen.
    let mut frames = Vec::new();
    for index in 0..3 {
        frames.push(solid_frame(index, RED));
    }
    for index in 3..50 {
        frames.push(solid_frame(index, GREEN));
    }
    for index in 50..100 {
        frames.push(solid_frame(index, BLUE));
    }
    let mut source = ScriptedSource::new(frames, 10.0);
    let options = DetectionOptions::new()
        .sampling_rate(0.0)
        .threshold(0.6)
        .max_samples(5);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert_eq!(detection.boundaries, vec![0.3]);
}

#[test]
fn interrupted_stream_yields_partial_boundaries() {
    // Cut at frame 5, stream dies after 10 reads: the boundary gathered
    // before the failure survives, and the call still succeeds.
    let mut source = cut_stream(20, 5, 10.0).failing_after(10);
    let options = DetectionOptions::new().sampling_rate(0.0).threshold(0.6);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert_eq!(detection.boundaries, vec![0.5]);
}

#[test]
fn unknown_frame_rate_reports_zero_timestamps() {
    let mut source = cut_stream(10, 5, 0.0);
    let options = DetectionOptions::new().threshold(0.6);

    let detection = detect_boundaries(&mut source, &options).unwrap();
    assert_eq!(detection.boundaries, vec![0.0]);
    assert_eq!(detection.duration_seconds, 0.0);
}

// ── progress ───────────────────────────────────────────────────────

struct CountingProgress {
    calls: AtomicU64,
    last_current: AtomicU64,
}

impl ProgressCallback for CountingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.last_current.store(info.current, Ordering::Relaxed);
    }
}

#[test]
fn progress_reports_once_per_sample_plus_final() {
    let progress = Arc::new(CountingProgress {
        calls: AtomicU64::new(0),
        last_current: AtomicU64::new(0),
    });
    let mut source = cut_stream(120, 60, 10.0);
    let options = DetectionOptions::new()
        .sampling_rate(1.0)
        .with_progress(progress.clone());

    detect_boundaries(&mut source, &options).unwrap();

    // 120 frames, stride 10 -> 12 samples, plus the final report.
    assert_eq!(progress.calls.load(Ordering::Relaxed), 13);
    assert_eq!(progress.last_current.load(Ordering::Relaxed), 12);
}

// ── full pipeline over a synthetic source ──────────────────────────

#[test]
fn pipeline_builds_and_filters_scenes() {
    // Cut at frame 60 of 120 at 10 fps, sampled at 1 fps: boundary at 6.0s,
    // two 6-second scenes.
    let mut source = cut_stream(120, 60, 10.0);
    let options = SplitOptions::new().threshold(0.6).min_length(1.0).no_max_length();

    let scenes = split_scenes_with_source(&mut source, &options).unwrap();
    assert_eq!(
        scenes.scenes,
        vec![
            Scene { start: 0.0, end: 6.0 },
            Scene { start: 6.0, end: 12.0 },
        ]
    );
}

#[test]
fn pipeline_drops_scenes_outside_length_bounds() {
    let mut source = cut_stream(120, 60, 10.0);
    let options = SplitOptions::new().threshold(0.6).min_length(10.0);

    let scenes = split_scenes_with_source(&mut source, &options).unwrap();
    assert!(scenes.is_empty(), "Both 6-second scenes violate min_length");
}

#[test]
fn pipeline_rejects_negative_length_bounds() {
    let mut source = cut_stream(10, 5, 10.0);
    let options = SplitOptions::new().min_length(-1.0);
    assert!(matches!(
        split_scenes_with_source(&mut source, &options),
        Err(SceneSplitError::InvalidLength { .. })
    ));
}
