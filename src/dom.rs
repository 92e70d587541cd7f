// web-sys implementation of Page. Element lookups happen once; an element that is
// missing stays None and every write to it is dropped.

use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlElement, HtmlVideoElement, Window};

use crate::config::ElementIds;
use crate::error::ScreenError;
use crate::page::{Page, MAX_PRELOADED};
use crate::types::{Element, StyleProp};

pub(crate) fn js_error(err: JsValue) -> ScreenError {
    ScreenError::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Viewport size in CSS pixels, 0 when the window cannot report it.
pub(crate) fn viewport_of(window: &Window) -> (u32, u32) {
    let dimension = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };
    (dimension(window.inner_width()), dimension(window.inner_height()))
}

/// Media error code to a name for the logs. Every code is handled the same way.
pub(crate) fn media_error_name(code: u16) -> &'static str {
    match code {
        1 => "MEDIA_ERR_ABORTED",
        2 => "MEDIA_ERR_NETWORK",
        3 => "MEDIA_ERR_DECODE",
        4 => "MEDIA_ERR_SRC_NOT_SUPPORTED",
        _ => "MEDIA_ERR_UNKNOWN",
    }
}

fn as_html(video: &HtmlVideoElement) -> &HtmlElement {
    video
}

/// Elements the browser host attaches listeners to.
pub(crate) struct ListenerTargets {
    pub window: Window,
    pub document: Document,
    pub video: Option<HtmlVideoElement>,
    pub skip_button: Option<HtmlElement>,
}

pub(crate) struct DomPage {
    window: Window,
    document: Document,
    video_screen: Option<HtmlElement>,
    main_content: Option<HtmlElement>,
    video: Option<HtmlVideoElement>,
    skip_button: Option<HtmlElement>,
    tooltip: Option<HtmlElement>,
    video_removed: bool,
    /// Requested source and the detached element buffering it, oldest first.
    preloaded: Vec<(String, HtmlVideoElement)>,
}

impl DomPage {
    /// Look up the five elements by id.
    pub fn resolve(ids: &ElementIds) -> Result<DomPage, ScreenError> {
        let window = web_sys::window().ok_or_else(|| ScreenError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ScreenError::Dom("no document".to_string()))?;

        let html = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        let video = document
            .get_element_by_id(&ids.video)
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok());

        Ok(DomPage {
            video_screen: html(&ids.video_screen),
            main_content: html(&ids.main_content),
            skip_button: html(&ids.skip_button),
            tooltip: html(&ids.tooltip),
            video,
            window,
            document,
            video_removed: false,
            preloaded: Vec::new(),
        })
    }

    /// Milliseconds from the page's high resolution clock.
    pub fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn listener_targets(&self) -> ListenerTargets {
        ListenerTargets {
            window: self.window.clone(),
            document: self.document.clone(),
            video: self.video.clone(),
            skip_button: self.skip_button.clone(),
        }
    }

    fn html(&self, element: Element) -> Option<&HtmlElement> {
        match element {
            Element::VideoScreen => self.video_screen.as_ref(),
            Element::MainContent => self.main_content.as_ref(),
            Element::Video => self.live_video().map(as_html),
            Element::SkipButton => self.skip_button.as_ref(),
            Element::Tooltip => self.tooltip.as_ref(),
        }
    }

    fn live_video(&self) -> Option<&HtmlVideoElement> {
        if self.video_removed {
            None
        } else {
            self.video.as_ref()
        }
    }

    fn create_preload(&self, src: &str) -> Result<HtmlVideoElement, ScreenError> {
        let video = self
            .document
            .create_element("video")
            .map_err(js_error)?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| ScreenError::Dom("created element is not a video".to_string()))?;
        video.set_preload("auto");
        video.set_muted(true);
        video.set_src(src);
        video.load();
        Ok(video)
    }
}

/// Drop a media element's source. `load()` with no `src` empties the element
/// instead of failing resource selection, so no `error` event is queued.
fn release(video: &HtmlVideoElement) {
    if let Err(err) = video.remove_attribute("src") {
        warn!(error = ?err, "src removal failed");
    }
    video.load();
}

impl Page for DomPage {
    fn has_element(&self, element: Element) -> bool {
        self.html(element).is_some()
    }

    fn set_style(&mut self, element: Element, prop: StyleProp, value: &str) {
        let Some(el) = self.html(element) else {
            return;
        };
        if let Err(err) = el.style().set_property(prop.css_name(), value) {
            warn!(?element, property = prop.css_name(), error = ?err, "style write failed");
            return;
        }
        if prop == StyleProp::Transition {
            // Flush styles so the following opacity write animates.
            let _ = el.offset_width();
        }
    }

    fn add_class(&mut self, element: Element, class: &str) {
        if let Some(el) = self.html(element) {
            if let Err(err) = el.class_list().add_1(class) {
                warn!(?element, class, error = ?err, "class write failed");
            }
        }
    }

    fn set_text(&mut self, element: Element, text: &str) {
        if let Some(el) = self.html(element) {
            el.set_text_content(Some(text));
        }
    }

    fn play(&mut self) {
        let Some(video) = self.live_video() else {
            return;
        };
        match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    // Autoplay policy rejections land here; the intro stays up.
                    warn!(error = ?err, "video play() rejected");
                }
            }),
            Err(err) => warn!(error = ?err, "video play() failed"),
        }
    }

    fn pause(&mut self) {
        if let Some(video) = self.live_video() {
            if let Err(err) = video.pause() {
                warn!(error = ?err, "video pause() failed");
            }
        }
    }

    fn is_paused(&self) -> bool {
        self.live_video().map(|v| v.paused()).unwrap_or(true)
    }

    fn current_time(&self) -> f64 {
        self.live_video().map(|v| v.current_time()).unwrap_or(0.0)
    }

    fn set_current_time(&mut self, secs: f64) {
        if let Some(video) = self.live_video() {
            video.set_current_time(secs);
        }
    }

    fn volume(&self) -> f64 {
        self.live_video().map(|v| v.volume()).unwrap_or(0.0)
    }

    fn set_volume(&mut self, level: f64) {
        if let Some(video) = self.live_video() {
            video.set_volume(level);
        }
    }

    fn is_muted(&self) -> bool {
        self.live_video().map(|v| v.muted()).unwrap_or(false)
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(video) = self.live_video() {
            video.set_muted(muted);
        }
    }

    fn set_src(&mut self, src: &str) {
        if src.is_empty() {
            self.unload();
            return;
        }
        let Some(video) = self.live_video() else {
            return;
        };
        video.set_src(src);
        self.preloaded.retain(|(held, buffer)| {
            let keep = held != src;
            if !keep {
                release(buffer);
            }
            keep
        });
    }

    fn load(&mut self) {
        if let Some(video) = self.live_video() {
            video.load();
        }
    }

    fn unload(&mut self) {
        if let Some(video) = self.live_video() {
            release(video);
        }
    }

    fn remove_video(&mut self) {
        if let Some(video) = self.live_video() {
            video.remove();
        }
        self.video_removed = true;
    }

    fn set_video_size(&mut self, width: u32, height: u32) {
        if let Some(video) = self.live_video() {
            video.set_width(width);
            video.set_height(height);
        }
    }

    fn preload(&mut self, src: &str) {
        let video = match self.create_preload(src) {
            Ok(video) => video,
            Err(err) => {
                warn!(src, %err, "preload failed");
                return;
            }
        };
        if self.preloaded.len() == MAX_PRELOADED {
            let (evicted, buffer) = self.preloaded.remove(0);
            debug!(src = %evicted, "releasing oldest preload");
            release(&buffer);
        }
        self.preloaded.push((src.to_string(), video));
    }

    fn viewport(&self) -> (u32, u32) {
        viewport_of(&self.window)
    }
}
