//! Scene length filtering.
//!
//! Drops intervals that violate the configured length constraints and rounds
//! survivor timestamps to millisecond precision for stable serialization.
//! Surviving scenes keep their absolute timestamps; filtering never merges,
//! splits, or re-times; dropped scenes simply leave a gap in the timeline.

use crate::scene::Scene;

/// Filter scenes by length.
///
/// Drops any scene whose length is zero or negative, shorter than
/// `min_length`, or (when `max_length` is set) longer than `max_length`.
/// Relative order is preserved. Output timestamps are rounded to 3 decimal
/// places.
///
/// The operation is idempotent: filtering an already-filtered list with the
/// same bounds returns it unchanged.
///
/// # Example
///
/// ```
/// use scenesplit::{Scene, filter_scenes};
///
/// let scenes = vec![
///     Scene { start: 0.0, end: 5.0 },
///     Scene { start: 5.0, end: 20.0 },
///     Scene { start: 20.0, end: 30.0 },
/// ];
/// let kept = filter_scenes(scenes, 10.0, None);
/// assert_eq!(kept.len(), 2);
/// assert_eq!(kept[0].start, 5.0);
/// ```
pub fn filter_scenes(scenes: Vec<Scene>, min_length: f64, max_length: Option<f64>) -> Vec<Scene> {
    scenes
        .into_iter()
        .filter_map(|scene| {
            let length = scene.length();
            if length <= 0.0 || length < min_length {
                return None;
            }
            if let Some(max_length) = max_length
                && length > max_length
            {
                return None;
            }
            Some(Scene {
                start: round_millis(scene.start),
                end: round_millis(scene.end),
            })
        })
        .collect()
}

/// Round a timestamp to millisecond precision.
fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_zero_and_negative_length_scenes() {
        let scenes = vec![
            Scene { start: 5.0, end: 5.0 },
            Scene { start: 9.0, end: 7.0 },
            Scene { start: 10.0, end: 15.0 },
        ];
        let kept = filter_scenes(scenes, 0.0, None);
        assert_eq!(kept, vec![Scene { start: 10.0, end: 15.0 }]);
    }

    #[test]
    fn keeps_only_scenes_within_bounds() {
        let scenes = vec![
            Scene { start: 0.0, end: 1.0 },
            Scene { start: 1.0, end: 16.0 },
            Scene { start: 16.0, end: 106.0 },
        ];
        let kept = filter_scenes(scenes, 3.0, Some(60.0));
        assert_eq!(kept, vec![Scene { start: 1.0, end: 16.0 }]);
    }

    #[test]
    fn no_upper_bound_keeps_long_scenes() {
        let scenes = vec![Scene { start: 0.0, end: 1000.0 }];
        let kept = filter_scenes(scenes, 1.0, None);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn rounds_to_millisecond_precision() {
        let scenes = vec![Scene {
            start: 0.123_456,
            end: 10.987_654,
        }];
        let kept = filter_scenes(scenes, 0.0, None);
        assert_eq!(kept, vec![Scene { start: 0.123, end: 10.988 }]);
    }

    #[test]
    fn round_millis_behavior() {
        assert_eq!(round_millis(1.2344), 1.234);
        assert_eq!(round_millis(1.2346), 1.235);
        assert_eq!(round_millis(0.0), 0.0);
    }
}
