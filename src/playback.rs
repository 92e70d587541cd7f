// Video playback controls. Every operation is a no-op when the video element is absent.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::page::Page;
use crate::types::Element;

/// Clamp a requested volume to [0, 1]. NaN has no meaningful level and is rejected.
pub fn clamp_volume(level: f64) -> Option<f64> {
    if level.is_nan() {
        None
    } else {
        Some(level.clamp(0.0, 1.0))
    }
}

/// Playback controls plus the queue of videos chained after the current one.
pub struct Playback {
    queue: VecDeque<String>,
}

impl Playback {
    pub fn new() -> Self {
        Playback {
            queue: VecDeque::new(),
        }
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn play<P: Page>(&self, page: &mut P) {
        if page.has_element(Element::Video) {
            page.play();
        }
    }

    pub fn pause<P: Page>(&self, page: &mut P) {
        if page.has_element(Element::Video) {
            page.pause();
        }
    }

    pub fn toggle_play<P: Page>(&self, page: &mut P) {
        if !page.has_element(Element::Video) {
            return;
        }
        if page.is_paused() {
            page.play();
        } else {
            page.pause();
        }
    }

    /// Pause, rewind and drop the source. Unloading rather than writing an empty
    /// `src` keeps the browser from reporting a media error.
    pub fn stop<P: Page>(&self, page: &mut P) {
        if !page.has_element(Element::Video) {
            return;
        }
        page.pause();
        page.set_current_time(0.0);
        page.unload();
    }

    /// Move the playhead by `delta_secs`. Not clamped to the media duration, but a
    /// non-finite position is dropped: `currentTime` throws on it.
    pub fn seek_by<P: Page>(&self, page: &mut P, delta_secs: f64) {
        if !page.has_element(Element::Video) {
            return;
        }
        let position = page.current_time() + delta_secs;
        if !position.is_finite() {
            debug!(delta_secs, "ignoring non-finite seek");
            return;
        }
        page.set_current_time(position);
        debug!(position, "seek");
    }

    pub fn set_volume<P: Page>(&self, page: &mut P, level: f64) {
        if !page.has_element(Element::Video) {
            return;
        }
        match clamp_volume(level) {
            Some(volume) => page.set_volume(volume),
            None => debug!("ignoring NaN volume"),
        }
    }

    pub fn nudge_volume<P: Page>(&self, page: &mut P, delta: f64) {
        if page.has_element(Element::Video) {
            let level = page.volume() + delta;
            self.set_volume(page, level);
        }
    }

    pub fn set_muted<P: Page>(&self, page: &mut P, muted: bool) {
        if page.has_element(Element::Video) {
            page.set_muted(muted);
        }
    }

    pub fn toggle_mute<P: Page>(&self, page: &mut P) {
        if page.has_element(Element::Video) {
            let muted = page.is_muted();
            page.set_muted(!muted);
        }
    }

    /// Swap the source, reload and play.
    pub fn load<P: Page>(&self, page: &mut P, src: &str) {
        if !page.has_element(Element::Video) {
            return;
        }
        info!(src, "loading video");
        page.set_src(src);
        page.load();
        page.play();
    }

    /// Replace the chain: play the first source now, queue the rest.
    pub fn chain<P: Page>(&mut self, page: &mut P, sources: Vec<String>) {
        let mut sources: VecDeque<String> = sources.into();
        let Some(first) = sources.pop_front() else {
            debug!("empty video chain");
            return;
        };
        self.queue = sources;
        self.load(page, &first);
    }

    /// Load the next chained source. Returns `false` when the chain is exhausted.
    pub fn advance_chain<P: Page>(&mut self, page: &mut P) -> bool {
        match self.queue.pop_front() {
            Some(next) => {
                self.load(page, &next);
                true
            }
            None => false,
        }
    }

    pub fn preload<P: Page>(&self, page: &mut P, src: &str) {
        debug!(src, "preloading video");
        page.preload(src);
    }

    pub fn clear_chain(&mut self) {
        self.queue.clear();
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}
