// Cursor auto-hide over the video screen.
// Any mouse move shows the cursor and re-arms a single inactivity timer.

use crate::page::Page;
use crate::screen::Task;
use crate::timers::{TimerId, TimerQueue};
use crate::types::{Element, StyleProp};

/// Hides the system cursor after a period without mouse movement.
pub struct CursorHider {
    delay_ms: u64,
    timer: Option<TimerId>,
    hidden: bool,
}

impl CursorHider {
    pub fn new(delay_ms: u64) -> Self {
        CursorHider {
            delay_ms,
            timer: None,
            hidden: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Show the cursor now and restart the inactivity window.
    pub fn on_mouse_move<P: Page>(&mut self, page: &mut P, timers: &mut TimerQueue<Task>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        page.set_style(Element::VideoScreen, StyleProp::Cursor, "default");
        self.hidden = false;
        self.timer = Some(timers.schedule(self.delay_ms, Task::HideCursor));
    }

    /// The inactivity window elapsed.
    pub fn on_timer<P: Page>(&mut self, page: &mut P) {
        self.timer = None;
        page.set_style(Element::VideoScreen, StyleProp::Cursor, "none");
        self.hidden = true;
    }

    /// Stop tracking and leave the default cursor in place.
    pub fn release<P: Page>(&mut self, page: &mut P, timers: &mut TimerQueue<Task>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        if self.hidden {
            page.set_style(Element::VideoScreen, StyleProp::Cursor, "default");
            self.hidden = false;
        }
    }
}
