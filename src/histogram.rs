//! Perceptual color descriptors.
//!
//! [`HistogramExtractor`] reduces a decoded RGB frame to a fixed-dimension
//! hue/saturation histogram ([`Descriptor`]). Binning runs over hue and
//! saturation rather than raw color channels because luminance-sensitive
//! comparison is unstable under lighting flicker within a single shot.
//!
//! The same bin configuration is used for every frame in a run, and every
//! descriptor is L1-normalized so that histograms from frames of different
//! content area remain comparable.

use crate::source::Frame;

/// Number of hue bins, covering the full 0–360° hue circle.
pub const HUE_BINS: usize = 50;

/// Number of saturation bins, covering the 0–1 saturation range.
pub const SAT_BINS: usize = 60;

/// Total descriptor dimension.
pub const DESCRIPTOR_LEN: usize = HUE_BINS * SAT_BINS;

/// A normalized hue/saturation histogram summarizing one frame's color
/// distribution.
///
/// Stored as a flat, statically-dimensioned buffer (`HUE_BINS * SAT_BINS`
/// entries in hue-major order). All bins are non-negative and sum to 1,
/// except for the degenerate empty-frame case where every bin is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    bins: Box<[f32; DESCRIPTOR_LEN]>,
}

impl Descriptor {
    /// The normalized bin values, in hue-major order.
    pub fn bins(&self) -> &[f32] {
        &self.bins[..]
    }

    /// Total histogram mass. 1.0 for any non-empty frame, 0.0 for the
    /// degenerate empty-frame descriptor.
    pub fn mass(&self) -> f32 {
        self.bins.iter().sum()
    }

    fn from_counts(counts: Box<[u32; DESCRIPTOR_LEN]>, total_pixels: u64) -> Self {
        let mut bins = Box::new([0.0f32; DESCRIPTOR_LEN]);
        if total_pixels > 0 {
            let scale = 1.0 / total_pixels as f32;
            for (bin, &count) in bins.iter_mut().zip(counts.iter()) {
                *bin = count as f32 * scale;
            }
        }
        Self { bins }
    }
}

/// Converts frames into hue/saturation [`Descriptor`]s.
///
/// The bin layout is a fixed configuration constant; one extractor is shared
/// across all frames of a detection run.
///
/// # Example
///
/// ```
/// use scenesplit::{Frame, HistogramExtractor};
///
/// let frame = Frame {
///     index: 0,
///     width: 2,
///     height: 1,
///     rgb: vec![255, 0, 0, 255, 0, 0],
/// };
/// let descriptor = HistogramExtractor::new().extract(&frame);
/// assert!((descriptor.mass() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramExtractor;

impl HistogramExtractor {
    /// Create an extractor with the fixed bin configuration.
    pub fn new() -> Self {
        Self
    }

    /// Compute the normalized hue/saturation histogram of a frame.
    ///
    /// Never fails: a frame with no pixels produces the zero-mass
    /// descriptor, which the distance metric treats as maximally distant.
    pub fn extract(&self, frame: &Frame) -> Descriptor {
        let mut counts = Box::new([0u32; DESCRIPTOR_LEN]);
        let mut total_pixels = 0u64;

        for pixel in frame.rgb.chunks_exact(3) {
            let (hue, saturation) = rgb_to_hue_sat(pixel[0], pixel[1], pixel[2]);
            let hue_bin = ((hue / 360.0) * HUE_BINS as f32) as usize;
            let sat_bin = (saturation * SAT_BINS as f32) as usize;
            let index =
                hue_bin.min(HUE_BINS - 1) * SAT_BINS + sat_bin.min(SAT_BINS - 1);
            counts[index] += 1;
            total_pixels += 1;
        }

        Descriptor::from_counts(counts, total_pixels)
    }
}

/// Convert an RGB pixel to its hue (degrees, `[0, 360)`) and saturation
/// (`[0, 1]`) components.
fn rgb_to_hue_sat(r: u8, g: u8, b: u8) -> (f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g.max(b));
    let min = r.min(g.min(b));
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation)
}
