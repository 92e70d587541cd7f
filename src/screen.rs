// Intro screen controller: intro video first, then a one-time handoff to the main content.
// Platform independent. The host feeds events and clock time; DOM writes go through Page.

use tracing::{debug, error, info, trace, warn};

use crate::config::ScreenConfig;
use crate::cursor::CursorHider;
use crate::effects::Fade;
use crate::error::ScreenError;
use crate::page::Page;
use crate::playback::Playback;
use crate::timers::TimerQueue;
use crate::tooltip::Tooltip;
use crate::types::*;

/// Deferred work scheduled on the controller's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ScreenFadedIn,
    RevealMain,
    TooltipFadeOut,
    TooltipHide,
    HideCursor,
}

/// The video screen controller.
pub struct IntroScreen<P: Page> {
    config: ScreenConfig,
    page: P,
    timers: TimerQueue<Task>,
    phase: Phase,
    handoff: Option<HandoffTrigger>,
    main_revealed: bool,
    tooltip: Tooltip,
    cursor: CursorHider,
    playback: Playback,
}

impl<P: Page> IntroScreen<P> {
    pub fn new(config: ScreenConfig, page: P) -> Self {
        IntroScreen {
            tooltip: Tooltip::new(config.tooltip_fade_ms),
            cursor: CursorHider::new(config.cursor_hide_delay_ms),
            playback: Playback::new(),
            timers: TimerQueue::new(),
            phase: Phase::Created,
            handoff: None,
            main_revealed: false,
            config,
            page,
        }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    /// The event that started the handoff, if any.
    pub fn handoff_trigger(&self) -> Option<HandoffTrigger> {
        self.handoff
    }

    /// True once the main content has been revealed.
    pub fn handoff_completed(&self) -> bool {
        self.main_revealed
    }

    /// Earliest pending timer, for the host to arm its real clock.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Show the video screen, fade it in, size the video and start playback. Run once.
    pub fn initialize(&mut self) -> Result<(), ScreenError> {
        match self.phase {
            Phase::Disposed => return Err(ScreenError::Disposed),
            Phase::Initialized => {
                warn!("intro screen already initialized");
                return Ok(());
            }
            Phase::Created => {}
        }

        for element in Element::ALL {
            if !self.page.has_element(element) {
                let err = ScreenError::MissingElement(self.config.ids.id_of(element).to_string());
                warn!(%err, "dependent behaviour disabled");
            }
        }

        self.phase = Phase::Initialized;
        self.page
            .set_style(Element::MainContent, StyleProp::Display, "none");
        self.page
            .set_style(Element::VideoScreen, StyleProp::Display, "block");
        self.start_fade(
            Fade::fade_in(Element::VideoScreen, self.config.screen_fade_in_ms),
            Task::ScreenFadedIn,
        );
        let (width, height) = self.page.viewport();
        self.resize_video(width, height);
        if self.config.autoplay {
            self.playback.play(&mut self.page);
        }

        info!("intro screen initialized");
        Ok(())
    }

    /// Cancel all pending work. Later events and operations are ignored.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.timers.clear();
        self.playback.clear_chain();
        self.phase = Phase::Disposed;
        info!("intro screen disposed");
    }

    /// Run every task due at or before `now`, then move the clock to `now`.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some((_, task)) = self.timers.pop_due(now) {
            self.run_task(task);
        }
        self.timers.set_now(now);
    }

    pub fn advance_by(&mut self, ms: u64) {
        let now = self.timers.now().saturating_add(ms);
        self.advance_to(now);
    }

    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: ScreenEvent) -> EventOutcome {
        if self.phase == Phase::Disposed {
            debug!(?event, "ignoring event after dispose");
            return EventOutcome::default();
        }

        match event {
            ScreenEvent::VideoEnded => self.on_video_ended(),
            ScreenEvent::VideoError { detail } => self.on_video_error(detail.as_deref()),
            ScreenEvent::VideoPlay => debug!("video playing"),
            ScreenEvent::VideoPause => debug!("video paused"),
            ScreenEvent::VolumeChange => debug!(
                volume = self.page.volume(),
                muted = self.page.is_muted(),
                "volume changed"
            ),
            ScreenEvent::TimeUpdate => trace!(time = self.page.current_time(), "time update"),
            ScreenEvent::Seeking => debug!("seeking"),
            ScreenEvent::Seeked => debug!(time = self.page.current_time(), "seeked"),
            ScreenEvent::SkipClick => self.skip(),
            ScreenEvent::KeyDown { key } => match Key::from_key_value(&key) {
                Some(key) => return self.handle_key(key),
                None => trace!(key = %key, "unbound key"),
            },
            ScreenEvent::MouseMove => self.on_mouse_move(),
            ScreenEvent::Resize { width, height } => self.resize_video(width, height),
        }
        EventOutcome::default()
    }

    /// Keyboard shortcuts. Ignored once the handoff has started.
    pub fn handle_key(&mut self, key: Key) -> EventOutcome {
        if !self.is_live() || self.handoff.is_some() {
            return EventOutcome::default();
        }

        let extended = self.config.extended_keys;
        match key {
            Key::Escape => self.terminate(HandoffTrigger::Escape, MSG_SKIPPED_ESC),
            Key::Space => {
                self.playback.toggle_play(&mut self.page);
                return EventOutcome::prevent_default();
            }
            Key::ArrowRight => self.seek_forward(None),
            Key::ArrowLeft => self.seek_backward(None),
            Key::ArrowUp if extended => {
                self.playback
                    .nudge_volume(&mut self.page, self.config.volume_step)
            }
            Key::ArrowDown if extended => {
                self.playback
                    .nudge_volume(&mut self.page, -self.config.volume_step)
            }
            Key::Mute if extended => self.playback.toggle_mute(&mut self.page),
            Key::ArrowUp | Key::ArrowDown | Key::Mute => {}
        }
        EventOutcome::default()
    }

    pub fn play(&mut self) {
        if self.is_live() {
            self.playback.play(&mut self.page);
        }
    }

    pub fn pause(&mut self) {
        if self.is_live() {
            self.playback.pause(&mut self.page);
        }
    }

    pub fn stop(&mut self) {
        if self.is_live() {
            self.playback.stop(&mut self.page);
        }
    }

    /// Skip the intro: tooltip, then handoff.
    pub fn skip(&mut self) {
        self.terminate(HandoffTrigger::Skipped, MSG_SKIPPED);
    }

    pub fn seek_forward(&mut self, secs: Option<f64>) {
        if self.is_live() {
            let step = secs.unwrap_or(self.config.seek_step_secs);
            self.playback.seek_by(&mut self.page, step);
        }
    }

    pub fn seek_backward(&mut self, secs: Option<f64>) {
        if self.is_live() {
            let step = secs.unwrap_or(self.config.seek_step_secs);
            self.playback.seek_by(&mut self.page, -step);
        }
    }

    pub fn set_volume(&mut self, level: f64) {
        if self.is_live() {
            self.playback.set_volume(&mut self.page, level);
        }
    }

    pub fn mute_video(&mut self) {
        if self.is_live() {
            self.playback.set_muted(&mut self.page, true);
        }
    }

    pub fn unmute_video(&mut self) {
        if self.is_live() {
            self.playback.set_muted(&mut self.page, false);
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.is_live() {
            self.playback.toggle_mute(&mut self.page);
        }
    }

    pub fn load_video(&mut self, src: &str) {
        if self.is_live() {
            self.playback.load(&mut self.page, src);
        }
    }

    /// Play `sources` back to back; the handoff waits for the last one to end.
    pub fn chain_videos(&mut self, sources: Vec<String>) {
        if self.is_live() && self.handoff.is_none() {
            self.playback.chain(&mut self.page, sources);
        }
    }

    pub fn preload_video(&mut self, src: &str) {
        if self.is_live() {
            self.playback.preload(&mut self.page, src);
        }
    }

    /// Show `text` for `duration_ms` (default from config).
    pub fn show_tooltip(&mut self, text: &str, duration_ms: Option<u64>) {
        if !self.is_live() {
            return;
        }
        let duration = duration_ms.unwrap_or(self.config.tooltip_duration_ms);
        self.tooltip
            .show(&mut self.page, &mut self.timers, text, duration);
    }

    pub fn hide_tooltip(&mut self) {
        if self.is_live() {
            self.tooltip.hide(&mut self.page, &mut self.timers);
        }
    }

    pub fn hide_tooltip_immediate(&mut self) {
        if self.is_live() {
            self.tooltip.hide_immediate(&mut self.page, &mut self.timers);
        }
    }

    /// Hand off to the main content. Runs at most once; later calls are logged and ignored.
    pub fn end_video(&mut self) {
        self.begin_handoff(HandoffTrigger::Requested);
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            phase: self.phase,
            now_ms: self.timers.now().as_u64(),
            handoff: self.handoff,
            main_revealed: self.main_revealed,
            tooltip_text: self.tooltip.text().map(str::to_string),
            tooltip_visible: self.tooltip.is_visible(),
            cursor_hidden: self.cursor.is_hidden(),
            queued_videos: self.playback.queued(),
            pending_timers: self.timers.len(),
        }
    }

    fn is_live(&self) -> bool {
        self.phase != Phase::Disposed
    }

    fn on_video_ended(&mut self) {
        if self.handoff.is_some() {
            debug!("ended after handoff; ignoring");
            return;
        }
        if self.playback.advance_chain(&mut self.page) {
            info!(remaining = self.playback.queued(), "playing next chained video");
            return;
        }
        self.begin_handoff(HandoffTrigger::Ended);
    }

    fn on_video_error(&mut self, detail: Option<&str>) {
        if self.handoff.is_some() {
            // Clearing the source during the handoff raises a media error of its own.
            debug!(detail, "media error after handoff; ignoring");
            return;
        }
        error!(detail, "intro video failed");
        self.terminate(HandoffTrigger::Error, MSG_FAILED);
    }

    fn on_mouse_move(&mut self) {
        if self.handoff.is_none() {
            self.cursor.on_mouse_move(&mut self.page, &mut self.timers);
        }
    }

    fn resize_video(&mut self, width: u32, height: u32) {
        if self.page.has_element(Element::Video) {
            self.page.set_video_size(width, height);
        }
    }

    /// Tooltip then handoff, unless the handoff is already under way.
    fn terminate(&mut self, trigger: HandoffTrigger, message: &str) {
        if !self.is_live() {
            return;
        }
        if let Some(first) = self.handoff {
            debug!(?trigger, ?first, "intro already ending; ignoring");
            return;
        }
        self.show_tooltip(message, None);
        self.begin_handoff(trigger);
    }

    fn begin_handoff(&mut self, trigger: HandoffTrigger) {
        if !self.is_live() {
            return;
        }
        if let Some(first) = self.handoff {
            warn!(?trigger, ?first, "handoff already started; ignoring");
            return;
        }

        info!(?trigger, "handing off to main content");
        self.handoff = Some(trigger);
        self.playback.clear_chain();
        self.playback.stop(&mut self.page);
        self.page.remove_video();
        self.cursor.release(&mut self.page, &mut self.timers);
        self.start_fade(
            Fade::fade_out(Element::VideoScreen, self.config.screen_fade_out_ms),
            Task::RevealMain,
        );
    }

    fn reveal_main(&mut self) {
        self.page
            .set_style(Element::VideoScreen, StyleProp::Display, "none");
        self.page
            .set_style(Element::MainContent, StyleProp::Display, "");
        self.page.add_class(Element::MainContent, VISIBLE_CLASS);
        self.main_revealed = true;
        info!("main content revealed");
    }

    fn start_fade(&mut self, fade: Fade, on_done: Task) {
        fade.apply(&mut self.page);
        self.timers.schedule(fade.duration_ms, on_done);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ScreenFadedIn => debug!("video screen faded in"),
            Task::RevealMain => self.reveal_main(),
            Task::TooltipFadeOut => self.tooltip.on_fade_out(&mut self.page),
            Task::TooltipHide => self.tooltip.on_hide(&mut self.page),
            Task::HideCursor => {
                if self.handoff.is_none() {
                    self.cursor.on_timer(&mut self.page);
                }
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn screen() -> IntroScreen<MemoryPage> {
        let mut screen = IntroScreen::new(ScreenConfig::default(), MemoryPage::new());
        screen.page_mut().video.src = "intro.mp4".to_string();
        screen.initialize().unwrap();
        screen
    }

    fn key(screen: &mut IntroScreen<MemoryPage>, value: &str) -> EventOutcome {
        screen.handle_event(ScreenEvent::KeyDown {
            key: value.to_string(),
        })
    }

    fn assert_handed_off(screen: &IntroScreen<MemoryPage>) {
        let page = screen.page();
        assert_eq!(page.style(Element::VideoScreen, StyleProp::Display), Some("none"));
        assert!(page.has_class(Element::MainContent, VISIBLE_CLASS));
        assert_eq!(page.style(Element::MainContent, StyleProp::Display), Some(""));
        assert!(page.video.paused);
        assert_eq!(page.video.current_time, 0.0);
        assert_eq!(page.video.src, "");
        assert!(page.video.removed);
        assert!(screen.handoff_completed());
    }

    #[test]
    fn initialize_shows_screen_and_hides_main() {
        let screen = screen();
        let page = screen.page();
        assert_eq!(page.style(Element::MainContent, StyleProp::Display), Some("none"));
        assert_eq!(page.style(Element::VideoScreen, StyleProp::Display), Some("block"));
        assert_eq!(page.style(Element::VideoScreen, StyleProp::Opacity), Some("1"));
        assert_eq!(
            page.style(Element::VideoScreen, StyleProp::Transition),
            Some("opacity 500ms ease")
        );
        assert!(!page.video.paused);
        assert_eq!((page.video.width, page.video.height), (1280, 720));
        assert_eq!(screen.phase(), Phase::Initialized);
    }

    #[test]
    fn initialize_without_autoplay_leaves_video_paused() {
        let config = ScreenConfig {
            autoplay: false,
            ..Default::default()
        };
        let mut screen = IntroScreen::new(config, MemoryPage::new());
        screen.initialize().unwrap();
        assert!(screen.page().video.paused);
    }

    #[test]
    fn initialize_after_dispose_fails() {
        let mut screen = IntroScreen::new(ScreenConfig::default(), MemoryPage::new());
        screen.dispose();
        assert_eq!(screen.initialize(), Err(ScreenError::Disposed));
    }

    #[test]
    #[traced_test]
    fn missing_elements_are_logged_not_fatal() {
        let page = MemoryPage::without(&[Element::SkipButton, Element::Tooltip]);
        let mut screen = IntroScreen::new(ScreenConfig::default(), page);
        assert!(screen.initialize().is_ok());
        assert!(logs_contain("Element #skipBtn not found"));
        assert!(logs_contain("Element #tooltip not found"));

        screen.skip();
        screen.advance_by(450);
        assert_handed_off(&screen);
    }

    #[test]
    fn natural_end_hands_off() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::VideoEnded);
        assert!(!screen.handoff_completed());
        assert_eq!(screen.page().style(Element::VideoScreen, StyleProp::Opacity), Some("0"));

        screen.advance_by(449);
        assert!(!screen.handoff_completed());
        screen.advance_by(1);
        assert_handed_off(&screen);
        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Ended));
        assert_eq!(screen.page().text(Element::Tooltip), Some(""));
    }

    #[test]
    fn skip_click_hands_off_with_tooltip() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::SkipClick);
        assert_eq!(screen.page().text(Element::Tooltip), Some(MSG_SKIPPED));
        screen.advance_by(450);
        assert_handed_off(&screen);
        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Skipped));
    }

    #[test]
    fn escape_hands_off_with_tooltip() {
        let mut screen = screen();
        key(&mut screen, "Escape");
        assert_eq!(screen.page().text(Element::Tooltip), Some(MSG_SKIPPED_ESC));
        screen.advance_by(450);
        assert_handed_off(&screen);
        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Escape));
    }

    #[test]
    #[traced_test]
    fn media_error_hands_off_with_tooltip() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::VideoError {
            detail: Some("MEDIA_ERR_NETWORK".to_string()),
        });
        assert!(logs_contain("intro video failed"));
        assert_eq!(screen.page().text(Element::Tooltip), Some(MSG_FAILED));
        screen.advance_by(450);
        assert_handed_off(&screen);
        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Error));
    }

    #[test]
    #[traced_test]
    fn second_terminal_event_is_ignored() {
        let mut screen = screen();
        screen.skip();
        screen.handle_event(ScreenEvent::VideoError { detail: None });
        key(&mut screen, "Escape");
        screen.end_video();
        assert!(logs_contain("handoff already started"));

        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Skipped));
        assert_eq!(screen.page().text(Element::Tooltip), Some(MSG_SKIPPED));
        // fade-in completion, one reveal, tooltip fade-out and hide
        assert_eq!(screen.snapshot().pending_timers, 4);

        screen.advance_by(450);
        let once = screen.page().clone();
        screen.end_video();
        screen.advance_by(450);
        assert_handed_off(&screen);
        assert_eq!(
            screen.page().element(Element::MainContent),
            once.element(Element::MainContent)
        );
    }

    #[test]
    fn space_toggles_playback_without_handoff() {
        let mut screen = screen();
        assert!(!screen.page().video.paused);

        let outcome = key(&mut screen, " ");
        assert!(outcome.prevent_default);
        assert!(screen.page().video.paused);

        key(&mut screen, " ");
        assert!(!screen.page().video.paused);

        screen.advance_by(5_000);
        assert_eq!(screen.handoff_trigger(), None);
        assert!(!screen.handoff_completed());
    }

    #[test]
    fn arrows_seek_and_change_volume() {
        let mut screen = screen();
        screen.page_mut().video.current_time = 12.0;
        screen.page_mut().video.volume = 0.5;

        key(&mut screen, "ArrowRight");
        assert_eq!(screen.page().video.current_time, 17.0);
        key(&mut screen, "ArrowLeft");
        key(&mut screen, "ArrowLeft");
        assert_eq!(screen.page().video.current_time, 7.0);

        key(&mut screen, "ArrowUp");
        assert!((screen.page().video.volume - 0.6).abs() < 1e-9);
        key(&mut screen, "ArrowDown");
        key(&mut screen, "ArrowDown");
        assert!((screen.page().video.volume - 0.4).abs() < 1e-9);

        key(&mut screen, "m");
        assert!(screen.page().video.muted);
    }

    #[test]
    fn extended_keys_can_be_disabled() {
        let config = ScreenConfig {
            extended_keys: false,
            ..Default::default()
        };
        let mut screen = IntroScreen::new(config, MemoryPage::new());
        screen.initialize().unwrap();
        screen.page_mut().video.volume = 0.5;

        key(&mut screen, "ArrowUp");
        key(&mut screen, "m");
        assert_eq!(screen.page().video.volume, 0.5);
        assert!(!screen.page().video.muted);
    }

    #[test]
    fn seek_defaults_and_explicit_steps() {
        let mut screen = screen();
        screen.seek_forward(None);
        assert_eq!(screen.page().video.current_time, 5.0);
        screen.seek_backward(Some(8.0));
        assert_eq!(screen.page().video.current_time, -3.0);
    }

    #[test]
    fn tooltip_hides_after_duration() {
        let mut screen = screen();
        screen.show_tooltip("x", Some(100));
        screen.advance_by(99);
        assert_eq!(screen.page().style(Element::Tooltip, StyleProp::Display), Some("block"));
        screen.advance_by(1);
        assert_eq!(screen.page().style(Element::Tooltip, StyleProp::Display), Some("none"));
    }

    #[test]
    fn last_tooltip_timer_wins() {
        let mut screen = screen();
        screen.show_tooltip("a", Some(100));
        screen.advance_by(60);
        screen.show_tooltip("b", Some(100));
        screen.advance_by(60);
        assert!(screen.snapshot().tooltip_visible);
        screen.advance_by(40);
        assert!(!screen.snapshot().tooltip_visible);
        assert_eq!(screen.page().style(Element::Tooltip, StyleProp::Display), Some("none"));
    }

    #[test]
    fn cursor_hides_after_inactivity() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::MouseMove);
        screen.advance_by(2_000);
        screen.handle_event(ScreenEvent::MouseMove);
        screen.advance_by(2_499);
        assert!(!screen.snapshot().cursor_hidden);
        screen.advance_by(1);
        assert!(screen.snapshot().cursor_hidden);
        assert_eq!(
            screen.page().style(Element::VideoScreen, StyleProp::Cursor),
            Some("none")
        );

        screen.handle_event(ScreenEvent::MouseMove);
        assert_eq!(
            screen.page().style(Element::VideoScreen, StyleProp::Cursor),
            Some("default")
        );
    }

    #[test]
    fn handoff_restores_cursor() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::MouseMove);
        screen.advance_by(2_500);
        assert!(screen.snapshot().cursor_hidden);

        screen.skip();
        assert!(!screen.snapshot().cursor_hidden);
        screen.handle_event(ScreenEvent::MouseMove);
        screen.advance_by(3_000);
        assert!(!screen.snapshot().cursor_hidden);
    }

    #[test]
    fn resize_stretches_video() {
        let mut screen = screen();
        screen.handle_event(ScreenEvent::Resize {
            width: 800,
            height: 600,
        });
        assert_eq!((screen.page().video.width, screen.page().video.height), (800, 600));
    }

    #[test]
    fn chained_videos_play_before_handoff() {
        let mut screen = screen();
        screen.chain_videos(vec!["a.mp4".into(), "b.mp4".into()]);
        assert_eq!(screen.page().video.src, "a.mp4");

        screen.handle_event(ScreenEvent::VideoEnded);
        assert_eq!(screen.page().video.src, "b.mp4");
        assert_eq!(screen.handoff_trigger(), None);

        screen.handle_event(ScreenEvent::VideoEnded);
        assert_eq!(screen.handoff_trigger(), Some(HandoffTrigger::Ended));
        screen.advance_by(450);
        assert_handed_off(&screen);
    }

    #[test]
    fn skip_drops_remaining_chain() {
        let mut screen = screen();
        screen.chain_videos(vec!["a.mp4".into(), "b.mp4".into(), "c.mp4".into()]);
        screen.skip();
        assert_eq!(screen.snapshot().queued_videos, 0);
    }

    #[test]
    fn load_and_preload() {
        let mut screen = screen();
        screen.preload_video("next.mp4");
        screen.load_video("other.mp4");
        assert_eq!(screen.page().preloaded, vec!["next.mp4".to_string()]);
        assert_eq!(screen.page().video.src, "other.mp4");
        assert!(!screen.page().video.paused);
    }

    #[test]
    fn stop_does_not_hand_off() {
        let mut screen = screen();
        screen.page_mut().video.current_time = 3.0;
        screen.stop();
        screen.advance_by(1_000);
        assert_eq!(screen.page().video.current_time, 0.0);
        assert_eq!(screen.page().video.src, "");
        assert_eq!(screen.page().video.empty_src_writes, 0);
        assert!(!screen.handoff_completed());
        assert_eq!(screen.handoff_trigger(), None);
    }

    #[test]
    fn dispose_cancels_pending_work() {
        let mut screen = screen();
        screen.skip();
        screen.dispose();
        assert_eq!(screen.snapshot().pending_timers, 0);

        screen.advance_by(1_000);
        assert!(!screen.handoff_completed());
        screen.handle_event(ScreenEvent::MouseMove);
        screen.show_tooltip("late", None);
        assert_eq!(screen.snapshot().pending_timers, 0);
    }

    #[test]
    fn snapshot_serializes() {
        let mut screen = screen();
        screen.skip();
        let json = serde_json::to_string(&screen.snapshot()).unwrap();
        assert!(json.contains(r#""handoff":"Skipped""#));
        assert!(json.contains(r#""phase":"Initialized""#));
    }

    fn event_strategy() -> impl Strategy<Value = ScreenEvent> {
        prop_oneof![
            Just(ScreenEvent::VideoEnded),
            Just(ScreenEvent::VideoError { detail: None }),
            Just(ScreenEvent::SkipClick),
            Just(ScreenEvent::MouseMove),
            Just(ScreenEvent::VideoPlay),
            Just(ScreenEvent::TimeUpdate),
            prop::sample::select(vec!["Escape", " ", "ArrowLeft", "ArrowUp", "m", "x"]).prop_map(
                |k| ScreenEvent::KeyDown { key: k.to_string() }
            ),
        ]
    }

    fn is_terminal(event: &ScreenEvent) -> Option<HandoffTrigger> {
        match event {
            ScreenEvent::VideoEnded => Some(HandoffTrigger::Ended),
            ScreenEvent::VideoError { .. } => Some(HandoffTrigger::Error),
            ScreenEvent::SkipClick => Some(HandoffTrigger::Skipped),
            ScreenEvent::KeyDown { key } if key == "Escape" => Some(HandoffTrigger::Escape),
            _ => None,
        }
    }

    proptest! {
        #[test]
        fn first_terminal_event_wins(
            steps in prop::collection::vec((event_strategy(), 0u64..600), 1..40)
        ) {
            let mut screen = screen();
            let mut first = None;

            for (event, wait) in &steps {
                if first.is_none() {
                    first = is_terminal(event);
                }
                screen.handle_event(event.clone());
                screen.advance_by(*wait);
                prop_assert_eq!(screen.handoff_trigger(), first);
            }

            screen.advance_by(SCREEN_FADE_OUT_MS);
            prop_assert_eq!(screen.handoff_completed(), first.is_some());
            prop_assert_eq!(
                screen.page().has_class(Element::MainContent, VISIBLE_CLASS),
                first.is_some()
            );
            if first.is_some() {
                assert_handed_off(&screen);
            }
        }
    }
}
