//! # Exercise Configuration
//!
//! Settings shared by every exercise block. The nested groups are only
//! meaningful for some categories: `speakingConfig` for speaking blocks,
//! `listeningConfig` for listening blocks. Pure content blocks carry no
//! config at all; `schema::validate_block` enforces both rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    /// Time limit in seconds; `None` means untimed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_seconds: Option<u32>,

    /// Maximum number of submissions; `None` means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Shuffle options/items before presenting them
    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub hints: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking_config: Option<SpeakingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening_config: Option<ListeningConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub points: u32,

    /// Minimum score to pass, at most `points`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u32>,

    #[serde(default)]
    pub partial_credit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingConfig {
    /// BCP-47 tag of the language the learner speaks, e.g. `es-MX`
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_recording_seconds: Option<u32>,

    /// Pronunciation accuracy (0-100) required to pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_accuracy: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_plays: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f32>,

    #[serde(default)]
    pub show_transcript: bool,
}

impl ExerciseConfig {
    pub fn with_scoring(mut self, points: u32, passing_score: Option<u32>) -> Self {
        self.scoring = Some(ScoringConfig {
            points,
            passing_score,
            partial_credit: false,
        });
        self
    }

    pub fn with_speaking(mut self, language: impl Into<String>) -> Self {
        self.speaking_config = Some(SpeakingConfig {
            language: language.into(),
            max_recording_seconds: None,
            min_accuracy: None,
        });
        self
    }

    pub fn with_listening(mut self, config: ListeningConfig) -> Self {
        self.listening_config = Some(config);
        self
    }
}
