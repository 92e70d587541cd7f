// Strong typing over strings. Newtypes for clock time, enums for elements, keys and events.

use serde::{Deserialize, Serialize};

/// Fade-in of the video screen at initialize.
pub const SCREEN_FADE_IN_MS: u64 = 500;
/// Fade-out of the video screen during the handoff.
pub const SCREEN_FADE_OUT_MS: u64 = 450;
/// Tooltip fade in/out.
pub const TOOLTIP_FADE_MS: u64 = 200;
/// Default time a tooltip stays on screen.
pub const TOOLTIP_DURATION_MS: u64 = 2000;
/// Mouse inactivity before the cursor is hidden over the video.
pub const CURSOR_HIDE_DELAY_MS: u64 = 2500;
/// Arrow-key seek step.
pub const SEEK_STEP_SECS: f64 = 5.0;
/// Arrow-key volume step.
pub const VOLUME_STEP: f64 = 0.1;

/// Class that marks the main content as shown.
pub const VISIBLE_CLASS: &str = "visible";

pub const MSG_SKIPPED: &str = "Video skipped";
pub const MSG_SKIPPED_ESC: &str = "Video skipped via ESC";
pub const MSG_FAILED: &str = "Video failed to load, skipping";

/// Clock time in milliseconds since the host started the controller. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Millis(u64);

impl Millis {
    pub fn new(ms: u64) -> Self {
        Millis(ms)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, ms: u64) -> Self {
        Millis(self.0.saturating_add(ms))
    }

    pub fn saturating_sub(self, other: Millis) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

/// The five page elements the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    VideoScreen,
    MainContent,
    Video,
    SkipButton,
    Tooltip,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::VideoScreen,
        Element::MainContent,
        Element::Video,
        Element::SkipButton,
        Element::Tooltip,
    ];
}

/// Inline style properties the controller writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StyleProp {
    Display,
    Opacity,
    Transition,
    Transform,
    Cursor,
}

impl StyleProp {
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProp::Display => "display",
            StyleProp::Opacity => "opacity",
            StyleProp::Transition => "transition",
            StyleProp::Transform => "transform",
            StyleProp::Cursor => "cursor",
        }
    }
}

/// Keyboard shortcuts understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Mute,
}

impl Key {
    /// Map a `KeyboardEvent.key` value. Unknown keys yield `None`.
    pub fn from_key_value(key: &str) -> Option<Key> {
        match key {
            "Escape" | "Esc" => Some(Key::Escape),
            " " | "Spacebar" | "Space" => Some(Key::Space),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "m" | "M" => Some(Key::Mute),
            _ => None,
        }
    }
}

/// Why the intro ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandoffTrigger {
    /// Video reached its natural end.
    Ended,
    /// Skip button or `skip()`.
    Skipped,
    /// Escape key.
    Escape,
    /// Media `error` event.
    Error,
    /// Direct `end_video()` call from the host.
    Requested,
}

/// Input event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScreenEvent {
    VideoEnded,
    VideoError {
        #[serde(default)]
        detail: Option<String>,
    },
    VideoPlay,
    VideoPause,
    VolumeChange,
    TimeUpdate,
    Seeking,
    Seeked,
    SkipClick,
    KeyDown { key: String },
    MouseMove,
    Resize { width: u32, height: u32 },
}

/// What the host should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn prevent_default() -> Self {
        EventOutcome {
            prevent_default: true,
        }
    }
}

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Created,
    Initialized,
    Disposed,
}

/// Serializable view of controller state, returned to JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub phase: Phase,
    pub now_ms: u64,
    pub handoff: Option<HandoffTrigger>,
    pub main_revealed: bool,
    pub tooltip_text: Option<String>,
    pub tooltip_visible: bool,
    pub cursor_hidden: bool,
    pub queued_videos: usize,
    pub pending_timers: usize,
}
