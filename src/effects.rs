// Fade primitives: CSS opacity transitions whose completion is a timer, not an animation frame.
// The caller schedules the completion task for `duration_ms`.

use crate::page::Page;
use crate::types::{Element, StyleProp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// One opacity transition on one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    pub element: Element,
    pub direction: FadeDirection,
    pub duration_ms: u64,
}

impl Fade {
    pub fn fade_in(element: Element, duration_ms: u64) -> Self {
        Fade {
            element,
            direction: FadeDirection::In,
            duration_ms,
        }
    }

    pub fn fade_out(element: Element, duration_ms: u64) -> Self {
        Fade {
            element,
            direction: FadeDirection::Out,
            duration_ms,
        }
    }

    pub fn target_opacity(&self) -> &'static str {
        match self.direction {
            FadeDirection::In => "1",
            FadeDirection::Out => "0",
        }
    }

    /// Write the transition and target opacity. A fade-in starts from 0.
    pub fn apply<P: Page>(&self, page: &mut P) {
        if self.direction == FadeDirection::In {
            page.set_style(self.element, StyleProp::Opacity, "0");
        }
        page.set_style(
            self.element,
            StyleProp::Transition,
            &opacity_transition(self.duration_ms),
        );
        page.set_style(self.element, StyleProp::Opacity, self.target_opacity());
    }
}

/// `transition` value for an opacity fade.
pub fn opacity_transition(duration_ms: u64) -> String {
    format!("opacity {}ms ease", duration_ms)
}

/// Tooltip slide offsets paired with its fades.
pub const TOOLTIP_SHOWN_TRANSFORM: &str = "translateY(0)";
pub const TOOLTIP_HIDDEN_TRANSFORM: &str = "translateY(8px)";
