//! Sequence configuration
//!
//! Every tunable the core reads. Defaults reproduce the shipped game; a page can
//! override any subset through an inline JSON block.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Anchor;

/// Configuration problems detected while loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("total_pulls must be at least 1")]
    NoPulls,
    #[error("opacity_table must not be empty")]
    EmptyOpacityTable,
    #[error("shake_duration_ms must be positive")]
    ZeroShake,
    #[error("rope_thickness must be positive, got {0}")]
    RopeThickness(f32),
    #[error("highlight video at pull {pull} is outside 1..={total}")]
    HighlightOutOfRange { pull: u32, total: u32 },
}

/// Which actor a shake strength applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Puller,
    Rope,
    Target,
}

impl Actor {
    pub const ALL: [Actor; 3] = [Actor::Puller, Actor::Rope, Actor::Target];

    pub fn index(self) -> usize {
        match self {
            Actor::Puller => 0,
            Actor::Rope => 1,
            Actor::Target => 2,
        }
    }
}

/// Shake impulse per actor (pixels, applied leftward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeStrength {
    pub puller: f32,
    pub rope: f32,
    pub target: f32,
}

impl Default for ShakeStrength {
    fn default() -> Self {
        Self {
            puller: SHAKE_PULLER,
            rope: SHAKE_ROPE,
            target: SHAKE_TARGET,
        }
    }
}

impl ShakeStrength {
    pub fn for_actor(&self, actor: Actor) -> f32 {
        match actor {
            Actor::Puller => self.puller,
            Actor::Rope => self.rope,
            Actor::Target => self.target,
        }
    }
}

/// Victory particle bursts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    /// Particles in the immediate burst
    pub main_particles: u32,
    /// Particles in the delayed echo burst
    pub echo_particles: u32,
    pub echo_delay_ms: u32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            main_particles: CONFETTI_MAIN,
            echo_particles: CONFETTI_ECHO,
            echo_delay_ms: CONFETTI_ECHO_DELAY_MS,
        }
    }
}

/// Sound files per cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundFiles {
    /// Ordinary pull
    pub pull: String,
    /// Every fifth pull
    pub milestone_5: String,
    /// Every tenth pull and the final pull
    pub milestone_10: String,
    /// One-shot victory sound
    pub victory: String,
}

impl Default for SoundFiles {
    fn default() -> Self {
        Self {
            pull: "sounds/pull.mp3".into(),
            milestone_5: "sounds/milestone-5.mp3".into(),
            milestone_10: "sounds/milestone-10.mp3".into(),
            victory: "sounds/victory.mp3".into(),
        }
    }
}

/// Asset locations the scene needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    /// Images that must be decoded before the scene is shown
    pub images: Vec<String>,
    /// Rope tile texture (also listed in `images`)
    pub rope_texture: String,
    pub sounds: SoundFiles,
    /// Where the back control navigates to
    pub entry_url: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let rope_texture = "images/rope.png".to_string();
        Self {
            images: vec![
                "images/background.png".into(),
                "images/puller.png".into(),
                "images/target.png".into(),
                rope_texture.clone(),
            ],
            rope_texture,
            sounds: SoundFiles::default(),
            entry_url: "./".into(),
        }
    }
}

/// All tunables of the sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Pulls needed to reach completion
    pub total_pulls: u32,
    /// Counter value -> highlight clip
    pub highlight_videos: BTreeMap<u32, String>,
    /// Target opacity indexed by counter, clamped to the last entry
    pub opacity_table: Vec<f32>,
    pub initial_rope_end: Anchor,
    pub final_rope_end: Anchor,
    /// Target actor height in percent of the container height
    pub initial_actor_height: f32,
    pub final_actor_height: f32,
    pub shake_duration_ms: u32,
    pub shake_strength: ShakeStrength,
    pub min_loading_ms: u32,
    pub overlay_volume: f32,
    /// Rope thickness in pixels
    pub rope_thickness: f32,
    /// Grip point on the puller box, percent of the box
    pub rope_grip: Anchor,
    pub rope_start_default: Anchor,
    pub confetti: ConfettiConfig,
    pub assets: AssetManifest,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            total_pulls: TOTAL_PULLS,
            highlight_videos: HIGHLIGHT_VIDEOS
                .iter()
                .map(|(pull, clip)| (*pull, clip.to_string()))
                .collect(),
            opacity_table: OPACITY_TABLE.to_vec(),
            initial_rope_end: Anchor::from(INITIAL_ROPE_END),
            final_rope_end: Anchor::from(FINAL_ROPE_END),
            initial_actor_height: INITIAL_ACTOR_HEIGHT,
            final_actor_height: FINAL_ACTOR_HEIGHT,
            shake_duration_ms: SHAKE_DURATION_MS,
            shake_strength: ShakeStrength::default(),
            min_loading_ms: MIN_LOADING_MS,
            overlay_volume: OVERLAY_VOLUME,
            rope_thickness: ROPE_THICKNESS,
            rope_grip: Anchor::from(ROPE_GRIP),
            rope_start_default: Anchor::from(ROPE_START_DEFAULT),
            confetti: ConfettiConfig::default(),
            assets: AssetManifest::default(),
        }
    }
}

impl SequenceConfig {
    /// Parse and validate a config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the sequence relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_pulls == 0 {
            return Err(ConfigError::NoPulls);
        }
        if self.opacity_table.is_empty() {
            return Err(ConfigError::EmptyOpacityTable);
        }
        if self.shake_duration_ms == 0 {
            return Err(ConfigError::ZeroShake);
        }
        if !(self.rope_thickness > 0.0) {
            return Err(ConfigError::RopeThickness(self.rope_thickness));
        }
        if let Some(&pull) = self
            .highlight_videos
            .keys()
            .find(|&&pull| pull == 0 || pull > self.total_pulls)
        {
            return Err(ConfigError::HighlightOutOfRange {
                pull,
                total: self.total_pulls,
            });
        }
        Ok(())
    }

    /// Highlight clip for an exact counter value
    pub fn highlight_for(&self, counter: u32) -> Option<&str> {
        self.highlight_videos.get(&counter).map(String::as_str)
    }

    /// DOM id of the inline config block
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "sequence-config";

    /// Load from the page's inline JSON block, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded sequence config from #{}", Self::ELEMENT_ID);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring sequence config: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default sequence config");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SequenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_pulls, 30);
        assert_eq!(config.highlight_for(10), Some("videos/highlight-10.mp4"));
        assert_eq!(config.highlight_for(11), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SequenceConfig::from_json(
            r#"{ "total_pulls": 12, "highlight_videos": { "6": "a.mp4", "12": "b.mp4" } }"#,
        )
        .unwrap();
        assert_eq!(config.total_pulls, 12);
        assert_eq!(config.highlight_for(6), Some("a.mp4"));
        assert_eq!(config.shake_duration_ms, SHAKE_DURATION_MS);
        assert_eq!(config.opacity_table, OPACITY_TABLE.to_vec());
    }

    #[test]
    fn test_rejects_highlight_past_end() {
        let err = SequenceConfig::from_json(
            r#"{ "total_pulls": 5, "highlight_videos": { "6": "late.mp4" } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::HighlightOutOfRange { pull: 6, total: 5 }
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            r#"{ "total_pulls": 0 }"#,
            r#"{ "opacity_table": [] }"#,
            r#"{ "shake_duration_ms": 0 }"#,
            r#"{ "rope_thickness": -1.0 }"#,
            r#"{ "total_pulls": "many" }"#,
        ];
        for json in cases {
            assert!(SequenceConfig::from_json(json).is_err(), "accepted {json}");
        }
    }

    #[test]
    fn test_shake_strength_per_actor() {
        let strength = ShakeStrength {
            puller: 1.0,
            rope: 2.0,
            target: 3.0,
        };
        let values: Vec<f32> = Actor::ALL.iter().map(|a| strength.for_actor(*a)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
