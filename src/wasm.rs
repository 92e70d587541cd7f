// `wasm-bindgen` exports for the intro screen.
// Wraps IntroScreen<DomPage> with JS-friendly types, binds DOM listeners and drives the
// controller clock from the page's timers. Only compiled on wasm32 targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, KeyboardEvent};

use crate::config::ScreenConfig;
use crate::dom::{media_error_name, viewport_of, DomPage};
use crate::error::ScreenError;
use crate::screen::IntroScreen;
use crate::types::{Millis, Phase, ScreenEvent};

struct Host {
    screen: IntroScreen<DomPage>,
    origin_ms: f64,
    /// Single pending wake-up for the next controller deadline. Replacing or
    /// clearing it cancels the underlying `setTimeout`.
    wake: Option<Timeout>,
    listeners: Vec<EventListener>,
}

impl Host {
    fn clock(&self) -> Millis {
        let elapsed = self.screen.page().now_ms() - self.origin_ms;
        Millis::new(elapsed.max(0.0) as u64)
    }
}

type Shared = Rc<RefCell<Host>>;

/// Catch the controller up to the page clock, run `f`, then re-arm the wake-up timer.
/// Returns `None` if the controller is already borrowed further up the stack.
fn with_screen<R>(shared: &Shared, f: impl FnOnce(&mut IntroScreen<DomPage>) -> R) -> Option<R> {
    let result = {
        let Ok(mut host) = shared.try_borrow_mut() else {
            warn!("intro screen busy; dropping call");
            return None;
        };
        let now = host.clock();
        host.screen.advance_to(now);
        f(&mut host.screen)
    };
    rearm(shared);
    Some(result)
}

fn rearm(shared: &Shared) {
    let Ok(mut host) = shared.try_borrow_mut() else {
        return;
    };
    let deadline = match host.screen.phase() {
        Phase::Disposed => None,
        _ => host.screen.next_deadline(),
    };
    let Some(deadline) = deadline else {
        host.wake = None;
        return;
    };

    let delay_ms = deadline.saturating_sub(host.clock());
    let weak = Rc::downgrade(shared);
    host.wake = Some(Timeout::new(
        u32::try_from(delay_ms).unwrap_or(u32::MAX),
        move || {
            if let Some(shared) = weak.upgrade() {
                with_screen(&shared, |_| ());
            }
        },
    ));
}

fn listen<F>(
    weak: &Weak<RefCell<Host>>,
    target: &EventTarget,
    event_type: &'static str,
    options: EventListenerOptions,
    to_screen_event: F,
) -> EventListener
where
    F: Fn(&Event) -> Option<ScreenEvent> + 'static,
{
    let weak = weak.clone();
    EventListener::new_with_options(target, event_type, options, move |event| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Some(screen_event) = to_screen_event(event) else {
            return;
        };
        let outcome = with_screen(&shared, |screen| screen.handle_event(screen_event));
        if outcome.map(|o| o.prevent_default).unwrap_or(false) {
            event.prevent_default();
        }
    })
}

fn bind_listeners(shared: &Shared) -> Vec<EventListener> {
    let targets = shared.borrow().screen.page().listener_targets();
    let weak = Rc::downgrade(shared);
    let passive = EventListenerOptions::default;
    let mut listeners = Vec::new();

    if let Some(video) = targets.video {
        let simple: [(&'static str, ScreenEvent); 7] = [
            ("ended", ScreenEvent::VideoEnded),
            ("play", ScreenEvent::VideoPlay),
            ("pause", ScreenEvent::VideoPause),
            ("volumechange", ScreenEvent::VolumeChange),
            ("timeupdate", ScreenEvent::TimeUpdate),
            ("seeking", ScreenEvent::Seeking),
            ("seeked", ScreenEvent::Seeked),
        ];
        for (event_type, screen_event) in simple {
            listeners.push(listen(&weak, &video, event_type, passive(), move |_| {
                Some(screen_event.clone())
            }));
        }

        let failed = video.clone();
        listeners.push(listen(&weak, &video, "error", passive(), move |_| {
            let detail = failed
                .error()
                .map(|err| media_error_name(err.code()).to_string());
            Some(ScreenEvent::VideoError { detail })
        }));
    }

    if let Some(skip_button) = targets.skip_button {
        listeners.push(listen(&weak, &skip_button, "click", passive(), |_| {
            Some(ScreenEvent::SkipClick)
        }));
    }

    listeners.push(listen(
        &weak,
        &targets.document,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        |event| {
            event
                .dyn_ref::<KeyboardEvent>()
                .map(|key| ScreenEvent::KeyDown { key: key.key() })
        },
    ));

    listeners.push(listen(&weak, &targets.document, "mousemove", passive(), |_| {
        Some(ScreenEvent::MouseMove)
    }));

    let window = targets.window.clone();
    listeners.push(listen(&weak, &targets.window, "resize", passive(), move |_| {
        let (width, height) = viewport_of(&window);
        Some(ScreenEvent::Resize { width, height })
    }));

    listeners
}

/// Intro video screen for the current page.
///
/// Looks up its elements at construction, binds listeners at `initialize()`, and releases
/// them at `dispose()`.
#[wasm_bindgen(js_name = IntroScreen)]
pub struct WasmIntroScreen {
    host: Shared,
}

#[wasm_bindgen(js_class = IntroScreen)]
impl WasmIntroScreen {
    /// Create a controller from a JSON config (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmIntroScreen, JsValue> {
        let config = ScreenConfig::from_json(config_json)?;
        let page = DomPage::resolve(&config.ids)?;
        let origin_ms = page.now_ms();

        Ok(WasmIntroScreen {
            host: Rc::new(RefCell::new(Host {
                screen: IntroScreen::new(config, page),
                origin_ms,
                wake: None,
                listeners: Vec::new(),
            })),
        })
    }

    /// Show the video screen, start playback and attach listeners. Call once.
    pub fn initialize(&self) -> Result<(), JsValue> {
        let already_bound = !self.host.borrow().listeners.is_empty();
        with_screen(&self.host, |screen| screen.initialize())
            .ok_or_else(|| ScreenError::Dom("intro screen busy".to_string()))??;

        if !already_bound {
            let listeners = bind_listeners(&self.host);
            info!(count = listeners.len(), "listeners attached");
            self.host.borrow_mut().listeners = listeners;
        }
        Ok(())
    }

    /// Cancel pending work and detach every listener.
    pub fn dispose(&self) {
        with_screen(&self.host, |screen| screen.dispose());
        if let Ok(mut host) = self.host.try_borrow_mut() {
            host.listeners.clear();
            host.wake = None;
        }
    }

    pub fn play(&self) {
        with_screen(&self.host, |screen| screen.play());
    }

    pub fn pause(&self) {
        with_screen(&self.host, |screen| screen.pause());
    }

    pub fn stop(&self) {
        with_screen(&self.host, |screen| screen.stop());
    }

    pub fn skip(&self) {
        with_screen(&self.host, |screen| screen.skip());
    }

    /// Seek forward by `secs` (default from config).
    #[wasm_bindgen(js_name = seekForward)]
    pub fn seek_forward(&self, secs: Option<f64>) {
        with_screen(&self.host, |screen| screen.seek_forward(secs));
    }

    /// Seek backward by `secs` (default from config).
    #[wasm_bindgen(js_name = seekBackward)]
    pub fn seek_backward(&self, secs: Option<f64>) {
        with_screen(&self.host, |screen| screen.seek_backward(secs));
    }

    /// Set the volume, clamped to [0, 1].
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, level: f64) {
        with_screen(&self.host, |screen| screen.set_volume(level));
    }

    #[wasm_bindgen(js_name = muteVideo)]
    pub fn mute_video(&self) {
        with_screen(&self.host, |screen| screen.mute_video());
    }

    #[wasm_bindgen(js_name = unmuteVideo)]
    pub fn unmute_video(&self) {
        with_screen(&self.host, |screen| screen.unmute_video());
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        with_screen(&self.host, |screen| screen.toggle_mute());
    }

    #[wasm_bindgen(js_name = loadVideo)]
    pub fn load_video(&self, src: &str) {
        with_screen(&self.host, |screen| screen.load_video(src));
    }

    /// Play the given sources back to back before handing off.
    #[wasm_bindgen(js_name = chainVideos)]
    pub fn chain_videos(&self, sources: Vec<String>) {
        with_screen(&self.host, |screen| screen.chain_videos(sources));
    }

    #[wasm_bindgen(js_name = preloadVideo)]
    pub fn preload_video(&self, src: &str) {
        with_screen(&self.host, |screen| screen.preload_video(src));
    }

    /// Show a tooltip for `duration_ms` (default from config).
    #[wasm_bindgen(js_name = showTooltip)]
    pub fn show_tooltip(&self, text: &str, duration_ms: Option<u32>) {
        with_screen(&self.host, |screen| {
            screen.show_tooltip(text, duration_ms.map(u64::from))
        });
    }

    #[wasm_bindgen(js_name = hideTooltip)]
    pub fn hide_tooltip(&self) {
        with_screen(&self.host, |screen| screen.hide_tooltip());
    }

    #[wasm_bindgen(js_name = hideTooltipImmediate)]
    pub fn hide_tooltip_immediate(&self) {
        with_screen(&self.host, |screen| screen.hide_tooltip_immediate());
    }

    /// Hand off to the main content now.
    #[wasm_bindgen(js_name = endVideo)]
    pub fn end_video(&self) {
        with_screen(&self.host, |screen| screen.end_video());
    }

    /// Feed a JSON-encoded `ScreenEvent`. Returns `true` if the caller should
    /// prevent the originating event's default action.
    #[wasm_bindgen(js_name = pushEvent)]
    pub fn push_event(&self, event_json: &str) -> Result<bool, JsValue> {
        let event: ScreenEvent =
            serde_json::from_str(event_json).map_err(ScreenError::from)?;
        let outcome = with_screen(&self.host, |screen| screen.handle_event(event));
        Ok(outcome.map(|o| o.prevent_default).unwrap_or(false))
    }

    /// Controller state as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let snapshot = self.host.borrow().screen.snapshot();
        serde_json::to_string(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
