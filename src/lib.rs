// intro_screen: Rust/WASM intro video screen.
// Plays an intro clip over the page, then hands off to the main content exactly once.
// The controller core is platform independent; the browser host lives in dom.rs and wasm.rs.

mod config;
mod cursor;
mod effects;
mod error;
mod page;
mod playback;
mod screen;
mod timers;
mod tooltip;
mod types;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod wasm;

use wasm_bindgen::prelude::*;

pub use config::{ElementIds, ScreenConfig};
pub use effects::{Fade, FadeDirection};
pub use error::ScreenError;
pub use page::{ElementState, MemoryPage, Page, VideoState, MAX_PRELOADED};
pub use playback::clamp_volume;
pub use screen::IntroScreen;
pub use timers::{TimerId, TimerQueue};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use wasm::WasmIntroScreen;

/// Initialize panic hook and console logging for the browser.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    logging::init();
}
