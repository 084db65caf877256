//! Scene intervals and the serialized scene-list contract.
//!
//! [`build_scenes`] converts an ordered boundary list plus total duration
//! into contiguous [`Scene`] intervals. [`SceneList`] is the stable output
//! shape, `{"scenes": [{"start": s, "end": e}, ...]}`, consumed downstream
//! by the scene-extraction and transcription tools.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::SceneSplitError;

/// A contiguous time interval between two boundaries (or stream edges),
/// in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Interval start in seconds.
    pub start: f64,
    /// Interval end in seconds.
    pub end: f64,
}

impl Scene {
    /// Interval length in seconds.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// An ordered collection of scenes with the stable JSON shape
/// `{"scenes": [...]}`.
///
/// # Example
///
/// ```
/// use scenesplit::{Scene, SceneList};
///
/// let list = SceneList::new(vec![Scene { start: 0.0, end: 12.5 }]);
/// assert_eq!(list.to_json().unwrap(), r#"{"scenes":[{"start":0.0,"end":12.5}]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct SceneList {
    /// Scenes ordered by start time.
    pub scenes: Vec<Scene>,
}

impl SceneList {
    /// Wrap an ordered scene vector.
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    /// Number of scenes in the list.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the list holds no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, SceneSplitError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SceneSplitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON scene list to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SceneSplitError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSplitError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Build contiguous scenes from ordered boundary timestamps.
///
/// Walks boundaries in increasing order starting from 0: each boundary ends
/// the current scene and starts the next one at the same timestamp. After
/// the last boundary a final scene runs to `duration_seconds`, or, when the
/// duration is unknown (0), to the last boundary itself, producing a
/// zero-length tail that [`filter_scenes`](crate::filter_scenes) discards.
///
/// Pure function. A negative duration is a caller contract violation and is
/// not handled defensively.
///
/// # Example
///
/// ```
/// use scenesplit::build_scenes;
///
/// let scenes = build_scenes(&[5.0, 20.0], 30.0);
/// assert_eq!(scenes.len(), 3);
/// assert_eq!((scenes[1].start, scenes[1].end), (5.0, 20.0));
/// ```
pub fn build_scenes(boundaries: &[f64], duration_seconds: f64) -> Vec<Scene> {
    debug_assert!(duration_seconds >= 0.0, "negative duration");

    let mut scenes = Vec::with_capacity(boundaries.len() + 1);
    let mut scene_start = 0.0;

    for &boundary in boundaries {
        // The boundary is where the new scene starts, so the previous one
        // ends at exactly the same timestamp.
        scenes.push(Scene {
            start: scene_start,
            end: boundary,
        });
        scene_start = boundary;
    }

    let final_end = if duration_seconds > 0.0 {
        duration_seconds
    } else {
        scene_start
    };
    scenes.push(Scene {
        start: scene_start,
        end: final_end,
    });

    scenes
}
