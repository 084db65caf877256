//! Histogram dissimilarity metric.
//!
//! Implements the Bhattacharyya distance between two [`Descriptor`]s: a
//! bounded, symmetric bin-overlap measure where 0 means identical
//! distributions and 1 means maximally dissimilar. This is the score the
//! boundary detector compares against its threshold.

use crate::histogram::Descriptor;

/// Bhattacharyya distance between two descriptors, in `[0, 1]`.
///
/// Computed as `sqrt(1 - Σ√(aᵢ·bᵢ) / √(Σaᵢ · Σbᵢ))`. The metric is symmetric
/// and defined for every pair of descriptors: when either distribution has
/// zero total mass the overlap is degenerate and the distance is 1.0, not an
/// error.
///
/// # Example
///
/// ```
/// use scenesplit::{Frame, HistogramExtractor, bhattacharyya};
///
/// let frame = Frame { index: 0, width: 1, height: 1, rgb: vec![0, 128, 255] };
/// let descriptor = HistogramExtractor::new().extract(&frame);
/// assert!(bhattacharyya(&descriptor, &descriptor) < 1e-6);
/// ```
pub fn bhattacharyya(a: &Descriptor, b: &Descriptor) -> f64 {
    let mut mass_a = 0.0f64;
    let mut mass_b = 0.0f64;
    let mut overlap = 0.0f64;

    for (&bin_a, &bin_b) in a.bins().iter().zip(b.bins()) {
        let bin_a = bin_a as f64;
        let bin_b = bin_b as f64;
        mass_a += bin_a;
        mass_b += bin_b;
        overlap += (bin_a * bin_b).sqrt();
    }

    if mass_a <= 0.0 || mass_b <= 0.0 {
        return 1.0;
    }

    // Floating-point accumulation can push the coefficient a hair past 1.
    let coefficient = (overlap / (mass_a * mass_b).sqrt()).clamp(0.0, 1.0);
    (1.0 - coefficient).sqrt()
}
