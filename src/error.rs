//! Errors raised while attaching a network to the page.
//!
//! None of these reach JavaScript as exceptions: `init` logs them and hands
//! back `undefined`.

use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum InitError {
    /// No global `window`, e.g. running in a worker.
    NoWindow,
    NoDocument,
    /// Nothing on the page has the requested id.
    MountNotFound(String),
    /// Creating or attaching the canvas element failed.
    CanvasCreation(String),
    /// The canvas would not hand out a 2D context.
    ContextUnavailable,
    /// An event listener could not be registered.
    Listener(String),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoWindow => write!(f, "no global window available"),
            InitError::NoDocument => write!(f, "window has no document"),
            InitError::MountNotFound(id) => write!(f, "no element with id '{}'", id),
            InitError::CanvasCreation(msg) => write!(f, "failed to create canvas: {}", msg),
            InitError::ContextUnavailable => write!(f, "canvas has no 2d context"),
            InitError::Listener(msg) => write!(f, "failed to add event listener: {}", msg),
        }
    }
}

impl std::error::Error for InitError {}

impl From<InitError> for JsValue {
    fn from(e: InitError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

// Reads the message out of a thrown JS value where there is one
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
