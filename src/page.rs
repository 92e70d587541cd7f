// The DOM surface the controller drives. The browser host implements it over web-sys;
// MemoryPage implements it in memory for headless hosts and tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Element, StyleProp};

/// Preloaded sources kept alive at once. A source is released as soon as the
/// visible video loads it.
pub const MAX_PRELOADED: usize = 4;

/// Page operations used by the intro screen. Implementations ignore writes to
/// elements that are not present.
pub trait Page {
    fn has_element(&self, element: Element) -> bool;

    fn set_style(&mut self, element: Element, prop: StyleProp, value: &str);
    fn add_class(&mut self, element: Element, class: &str);
    fn set_text(&mut self, element: Element, text: &str);

    /// Start playback. Failures are reported asynchronously by the implementation.
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    fn volume(&self) -> f64;
    fn set_volume(&mut self, level: f64);
    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn set_src(&mut self, src: &str);
    fn load(&mut self);
    /// Drop the current source and reset the element without raising a media error.
    fn unload(&mut self);
    /// Detach the video element from the document.
    fn remove_video(&mut self);
    fn set_video_size(&mut self, width: u32, height: u32);
    /// Fetch a source ahead of time without touching the visible video. At most
    /// [`MAX_PRELOADED`] sources are held; the oldest is released first.
    fn preload(&mut self, src: &str);

    /// Current viewport size in CSS pixels.
    fn viewport(&self) -> (u32, u32);
}

/// Recorded state of one element in a [`MemoryPage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub styles: BTreeMap<StyleProp, String>,
    pub classes: BTreeSet<String>,
    pub text: String,
}

impl ElementState {
    pub fn style(&self, prop: StyleProp) -> Option<&str> {
        self.styles.get(&prop).map(String::as_str)
    }
}

/// Recorded state of the video element in a [`MemoryPage`].
#[derive(Debug, Clone, PartialEq)]
pub struct VideoState {
    pub paused: bool,
    pub current_time: f64,
    pub volume: f64,
    pub muted: bool,
    pub src: String,
    /// Empty `src` writes. A browser answers each with a media `error` event.
    pub empty_src_writes: u32,
    pub load_count: u32,
    pub play_count: u32,
    pub removed: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for VideoState {
    fn default() -> Self {
        VideoState {
            paused: true,
            current_time: 0.0,
            volume: 1.0,
            muted: false,
            src: String::new(),
            empty_src_writes: 0,
            load_count: 0,
            play_count: 0,
            removed: false,
            width: 0,
            height: 0,
        }
    }
}

/// In-memory page. Starts with every element present.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    elements: BTreeMap<Element, ElementState>,
    pub video: VideoState,
    pub viewport: (u32, u32),
    pub preloaded: Vec<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        MemoryPage {
            elements: Element::ALL
                .iter()
                .map(|el| (*el, ElementState::default()))
                .collect(),
            video: VideoState::default(),
            viewport: (1280, 720),
            preloaded: Vec::new(),
        }
    }

    /// A page missing the given elements.
    pub fn without(missing: &[Element]) -> Self {
        let mut page = MemoryPage::new();
        for el in missing {
            page.elements.remove(el);
        }
        page
    }

    pub fn element(&self, element: Element) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    pub fn style(&self, element: Element, prop: StyleProp) -> Option<&str> {
        self.element(element).and_then(|e| e.style(prop))
    }

    pub fn has_class(&self, element: Element, class: &str) -> bool {
        self.element(element)
            .map(|e| e.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.element(element).map(|e| e.text.as_str())
    }

    fn element_mut(&mut self, element: Element) -> Option<&mut ElementState> {
        self.elements.get_mut(&element)
    }

    fn video_live(&self) -> bool {
        self.elements.contains_key(&Element::Video) && !self.video.removed
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MemoryPage {
    fn has_element(&self, element: Element) -> bool {
        if element == Element::Video {
            return self.video_live();
        }
        self.elements.contains_key(&element)
    }

    fn set_style(&mut self, element: Element, prop: StyleProp, value: &str) {
        if let Some(state) = self.element_mut(element) {
            state.styles.insert(prop, value.to_string());
        }
    }

    fn add_class(&mut self, element: Element, class: &str) {
        if let Some(state) = self.element_mut(element) {
            state.classes.insert(class.to_string());
        }
    }

    fn set_text(&mut self, element: Element, text: &str) {
        if let Some(state) = self.element_mut(element) {
            state.text = text.to_string();
        }
    }

    fn play(&mut self) {
        if self.video_live() {
            self.video.paused = false;
            self.video.play_count += 1;
        }
    }

    fn pause(&mut self) {
        if self.video_live() {
            self.video.paused = true;
        }
    }

    fn is_paused(&self) -> bool {
        self.video.paused
    }

    fn current_time(&self) -> f64 {
        self.video.current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        if self.video_live() {
            self.video.current_time = secs;
        }
    }

    fn volume(&self) -> f64 {
        self.video.volume
    }

    fn set_volume(&mut self, level: f64) {
        if self.video_live() {
            self.video.volume = level;
        }
    }

    fn is_muted(&self) -> bool {
        self.video.muted
    }

    fn set_muted(&mut self, muted: bool) {
        if self.video_live() {
            self.video.muted = muted;
        }
    }

    fn set_src(&mut self, src: &str) {
        if self.video_live() {
            if src.is_empty() {
                self.video.empty_src_writes += 1;
            }
            self.video.src = src.to_string();
            self.preloaded.retain(|held| held != src);
        }
    }

    fn load(&mut self) {
        if self.video_live() {
            self.video.load_count += 1;
            self.video.current_time = 0.0;
            self.video.paused = true;
        }
    }

    fn unload(&mut self) {
        if self.video_live() {
            self.video.src.clear();
            self.load();
        }
    }

    fn remove_video(&mut self) {
        self.video.removed = true;
    }

    fn set_video_size(&mut self, width: u32, height: u32) {
        if self.video_live() {
            self.video.width = width;
            self.video.height = height;
        }
    }

    fn preload(&mut self, src: &str) {
        if self.preloaded.len() == MAX_PRELOADED {
            self.preloaded.remove(0);
        }
        self.preloaded.push(src.to_string());
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_to_missing_elements_are_ignored() {
        let mut page = MemoryPage::without(&[Element::Tooltip]);
        page.set_text(Element::Tooltip, "hello");
        page.add_class(Element::Tooltip, "visible");
        assert!(!page.has_element(Element::Tooltip));
        assert_eq!(page.text(Element::Tooltip), None);
    }

    #[test]
    fn removed_video_stops_accepting_writes() {
        let mut page = MemoryPage::new();
        page.set_current_time(3.0);
        page.remove_video();
        page.set_current_time(9.0);
        assert!(!page.has_element(Element::Video));
        assert_eq!(page.video.current_time, 3.0);
    }

    #[test]
    fn load_rewinds_and_pauses() {
        let mut page = MemoryPage::new();
        page.play();
        page.set_current_time(4.0);
        page.load();
        assert!(page.is_paused());
        assert_eq!(page.current_time(), 0.0);
        assert_eq!(page.video.load_count, 1);
    }

    #[test]
    fn unload_clears_source_without_an_empty_write() {
        let mut page = MemoryPage::new();
        page.set_src("intro.mp4");
        page.unload();
        assert_eq!(page.video.src, "");
        assert_eq!(page.video.empty_src_writes, 0);
        assert_eq!(page.video.load_count, 1);
    }

    #[test]
    fn preloads_are_capped_and_released_on_load() {
        let mut page = MemoryPage::new();
        for i in 0..MAX_PRELOADED + 2 {
            page.preload(&format!("clip-{i}.mp4"));
        }
        assert_eq!(page.preloaded.len(), MAX_PRELOADED);
        assert_eq!(page.preloaded[0], "clip-2.mp4");

        page.set_src("clip-3.mp4");
        assert_eq!(page.preloaded.len(), MAX_PRELOADED - 1);
        assert!(!page.preloaded.iter().any(|src| src == "clip-3.mp4"));
    }
}
