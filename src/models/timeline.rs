//! Audio feature timeline consumed by the chart generator.
//!
//! Times are in seconds, as delivered by the audio-analysis provider.

use crate::error::TimelineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A beat or a bar: a timed interval with a detection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub confidence: f64,
}

/// Timbral/loudness segments carry the same timing fields.
pub type Segment = TimeInterval;

/// Track-level metadata reported alongside the features.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Beats per minute, if the provider detected one.
    #[serde(default)]
    pub tempo: Option<f64>,
    /// Track length in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl TrackInfo {
    pub fn duration_ms(&self) -> f64 {
        self.duration * 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureTimeline {
    #[serde(default)]
    pub beats: Vec<TimeInterval>,
    #[serde(default)]
    pub bars: Vec<TimeInterval>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub track: TrackInfo,
}

impl FeatureTimeline {
    pub fn load(path: &Path) -> Result<Self, TimelineError> {
        let content = fs::read_to_string(path).map_err(|source| TimelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let timeline = Self::from_json(&content)?;
        log::info!(
            "TIMELINE: Loaded {:?} ({} beats, {} bars, {} segments)",
            path,
            timeline.beats.len(),
            timeline.bars.len(),
            timeline.segments.len()
        );
        Ok(timeline)
    }

    /// Parses the provider's JSON layout; unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty() && self.bars.is_empty() && self.segments.is_empty()
    }

    /// Tempo if the provider reported a usable one.
    pub fn tempo(&self) -> Option<f64> {
        self.track.tempo.filter(|t| *t > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_audio_analysis_layout() {
        let json = r#"{
            "meta": { "analyzer_version": "4.0.0" },
            "track": { "tempo": 120.0, "duration": 180.5, "key": 5 },
            "bars": [ { "start": 0.5, "duration": 2.0, "confidence": 0.8 } ],
            "beats": [ { "start": 0.5, "duration": 0.5, "confidence": 0.9 } ],
            "segments": [
                { "start": 0.4, "duration": 0.2, "confidence": 0.7, "loudness_max": -5.0 }
            ]
        }"#;

        let timeline = FeatureTimeline::from_json(json).unwrap();
        assert_eq!(timeline.beats.len(), 1);
        assert_eq!(timeline.bars[0].duration, 2.0);
        assert_eq!(timeline.segments[0].confidence, 0.7);
        assert_eq!(timeline.tempo(), Some(120.0));
        assert_eq!(timeline.track.duration_ms(), 180_500.0);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let timeline = FeatureTimeline::from_json("{}").unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.tempo(), None);
    }

    #[test]
    fn zero_tempo_counts_as_absent() {
        let timeline = FeatureTimeline::from_json(r#"{ "track": { "tempo": 0.0 } }"#).unwrap();
        assert_eq!(timeline.tempo(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            FeatureTimeline::from_json("{ beats: nope"),
            Err(TimelineError::Parse(_))
        ));
    }
}
