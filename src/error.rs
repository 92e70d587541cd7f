// Typed errors with thiserror. Surface meaningful messages to JS.
// Media failures are not errors here: they are events that end the intro.

use thiserror::Error;

/// Intro screen error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Element #{0} not found")]
    MissingElement(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Intro screen was disposed")]
    Disposed,
}

impl From<serde_json::Error> for ScreenError {
    fn from(err: serde_json::Error) -> Self {
        ScreenError::Serialization(err.to_string())
    }
}

impl From<ScreenError> for wasm_bindgen::JsValue {
    fn from(err: ScreenError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
