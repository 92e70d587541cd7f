// Transient feedback tooltip. No queue: a new message replaces the old one and
// cancels its pending fade-out and hide.

use crate::effects::{Fade, TOOLTIP_HIDDEN_TRANSFORM, TOOLTIP_SHOWN_TRANSFORM};
use crate::page::Page;
use crate::screen::Task;
use crate::timers::{TimerId, TimerQueue};
use crate::types::{Element, StyleProp};

pub struct Tooltip {
    fade_ms: u64,
    text: Option<String>,
    visible: bool,
    fade_out_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
}

impl Tooltip {
    pub fn new(fade_ms: u64) -> Self {
        Tooltip {
            fade_ms,
            text: None,
            visible: false,
            fade_out_timer: None,
            hide_timer: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show `text` and arrange for the tooltip to be `display:none` exactly
    /// `duration_ms` from now, fading out over the last `fade_ms` of it.
    pub fn show<P: Page>(
        &mut self,
        page: &mut P,
        timers: &mut TimerQueue<Task>,
        text: &str,
        duration_ms: u64,
    ) {
        self.cancel_pending(timers);

        page.set_text(Element::Tooltip, text);
        page.set_style(Element::Tooltip, StyleProp::Display, "block");
        page.set_style(Element::Tooltip, StyleProp::Transform, TOOLTIP_SHOWN_TRANSFORM);
        Fade::fade_in(Element::Tooltip, self.fade_ms).apply(page);

        self.text = Some(text.to_string());
        self.visible = page.has_element(Element::Tooltip);

        let fade_at = duration_ms.saturating_sub(self.fade_ms);
        self.fade_out_timer = Some(timers.schedule(fade_at, Task::TooltipFadeOut));
        self.hide_timer = Some(timers.schedule(duration_ms, Task::TooltipHide));
    }

    /// Fade out now, then hide.
    pub fn hide<P: Page>(&mut self, page: &mut P, timers: &mut TimerQueue<Task>) {
        self.cancel_pending(timers);
        self.begin_fade_out(page);
        self.hide_timer = Some(timers.schedule(self.fade_ms, Task::TooltipHide));
    }

    pub fn hide_immediate<P: Page>(&mut self, page: &mut P, timers: &mut TimerQueue<Task>) {
        self.cancel_pending(timers);
        page.set_style(Element::Tooltip, StyleProp::Opacity, "0");
        page.set_style(Element::Tooltip, StyleProp::Transform, TOOLTIP_HIDDEN_TRANSFORM);
        page.set_style(Element::Tooltip, StyleProp::Display, "none");
        self.visible = false;
    }

    pub fn on_fade_out<P: Page>(&mut self, page: &mut P) {
        self.fade_out_timer = None;
        self.begin_fade_out(page);
    }

    pub fn on_hide<P: Page>(&mut self, page: &mut P) {
        self.hide_timer = None;
        page.set_style(Element::Tooltip, StyleProp::Display, "none");
        self.visible = false;
    }

    fn begin_fade_out<P: Page>(&mut self, page: &mut P) {
        page.set_style(Element::Tooltip, StyleProp::Transform, TOOLTIP_HIDDEN_TRANSFORM);
        Fade::fade_out(Element::Tooltip, self.fade_ms).apply(page);
    }

    fn cancel_pending(&mut self, timers: &mut TimerQueue<Task>) {
        if let Some(id) = self.fade_out_timer.take() {
            timers.cancel(id);
        }
        if let Some(id) = self.hide_timer.take() {
            timers.cancel(id);
        }
    }
}
