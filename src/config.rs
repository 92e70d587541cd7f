// Controller configuration passed from JS as JSON. Every field has a default.

use serde::{Deserialize, Serialize};

use crate::error::ScreenError;
use crate::types::*;

/// Intro screen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub ids: ElementIds,
    #[serde(default = "default_screen_fade_in")]
    pub screen_fade_in_ms: u64,
    #[serde(default = "default_screen_fade_out")]
    pub screen_fade_out_ms: u64,
    #[serde(default = "default_tooltip_fade")]
    pub tooltip_fade_ms: u64,
    #[serde(default = "default_tooltip_duration")]
    pub tooltip_duration_ms: u64,
    #[serde(default = "default_cursor_hide_delay")]
    pub cursor_hide_delay_ms: u64,
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
    #[serde(default = "default_volume_step")]
    pub volume_step: f64,
    /// ArrowUp/ArrowDown volume and `m` mute shortcuts.
    #[serde(default = "default_true")]
    pub extended_keys: bool,
    /// Start playback at initialize.
    #[serde(default = "default_true")]
    pub autoplay: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            ids: ElementIds::default(),
            screen_fade_in_ms: SCREEN_FADE_IN_MS,
            screen_fade_out_ms: SCREEN_FADE_OUT_MS,
            tooltip_fade_ms: TOOLTIP_FADE_MS,
            tooltip_duration_ms: TOOLTIP_DURATION_MS,
            cursor_hide_delay_ms: CURSOR_HIDE_DELAY_MS,
            seek_step_secs: SEEK_STEP_SECS,
            volume_step: VOLUME_STEP,
            extended_keys: true,
            autoplay: true,
        }
    }
}

impl ScreenConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<ScreenConfig, ScreenError> {
        let config: ScreenConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScreenError> {
        for element in Element::ALL {
            if self.ids.id_of(element).trim().is_empty() {
                return Err(ScreenError::InvalidConfig(format!(
                    "empty element id for {:?}",
                    element
                )));
            }
        }
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            return Err(ScreenError::InvalidConfig(format!(
                "seek_step_secs must be positive, got {}",
                self.seek_step_secs
            )));
        }
        if !(self.volume_step > 0.0 && self.volume_step <= 1.0) {
            return Err(ScreenError::InvalidConfig(format!(
                "volume_step must be in (0, 1], got {}",
                self.volume_step
            )));
        }
        Ok(())
    }
}

/// DOM ids of the five page elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementIds {
    #[serde(default = "default_video_screen_id")]
    pub video_screen: String,
    #[serde(default = "default_main_content_id")]
    pub main_content: String,
    #[serde(default = "default_video_id")]
    pub video: String,
    #[serde(default = "default_skip_button_id")]
    pub skip_button: String,
    #[serde(default = "default_tooltip_id")]
    pub tooltip: String,
}

impl ElementIds {
    pub fn id_of(&self, element: Element) -> &str {
        match element {
            Element::VideoScreen => &self.video_screen,
            Element::MainContent => &self.main_content,
            Element::Video => &self.video,
            Element::SkipButton => &self.skip_button,
            Element::Tooltip => &self.tooltip,
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            video_screen: default_video_screen_id(),
            main_content: default_main_content_id(),
            video: default_video_id(),
            skip_button: default_skip_button_id(),
            tooltip: default_tooltip_id(),
        }
    }
}

fn default_video_screen_id() -> String {
    "video-screen".to_string()
}

fn default_main_content_id() -> String {
    "mainContent".to_string()
}

fn default_video_id() -> String {
    "introVideo".to_string()
}

fn default_skip_button_id() -> String {
    "skipBtn".to_string()
}

fn default_tooltip_id() -> String {
    "tooltip".to_string()
}

fn default_screen_fade_in() -> u64 {
    SCREEN_FADE_IN_MS
}

fn default_screen_fade_out() -> u64 {
    SCREEN_FADE_OUT_MS
}

fn default_tooltip_fade() -> u64 {
    TOOLTIP_FADE_MS
}

fn default_tooltip_duration() -> u64 {
    TOOLTIP_DURATION_MS
}

fn default_cursor_hide_delay() -> u64 {
    CURSOR_HIDE_DELAY_MS
}

fn default_seek_step() -> f64 {
    SEEK_STEP_SECS
}

fn default_volume_step() -> f64 {
    VOLUME_STEP
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = ScreenConfig::from_json("{}").unwrap();
        assert_eq!(config, ScreenConfig::default());
        assert_eq!(config.ids.id_of(Element::Video), "introVideo");
        assert_eq!(config.screen_fade_out_ms, 450);
    }

    #[test]
    fn partial_ids_keep_other_defaults() {
        let config =
            ScreenConfig::from_json(r#"{"ids":{"video":"hero"},"extended_keys":false}"#).unwrap();
        assert_eq!(config.ids.video, "hero");
        assert_eq!(config.ids.skip_button, "skipBtn");
        assert!(!config.extended_keys);
        assert!(config.autoplay);
    }

    #[test]
    fn rejects_bad_steps() {
        assert!(matches!(
            ScreenConfig::from_json(r#"{"volume_step":1.5}"#),
            Err(ScreenError::InvalidConfig(_))
        ));
        assert!(matches!(
            ScreenConfig::from_json(r#"{"seek_step_secs":0}"#),
            Err(ScreenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_empty_id() {
        let err = ScreenConfig::from_json(r#"{"ids":{"tooltip":"  "}}"#).unwrap_err();
        assert!(err.to_string().contains("Tooltip"));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            ScreenConfig::from_json("{"),
            Err(ScreenError::Serialization(_))
        ));
    }
}
