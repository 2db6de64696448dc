//! Startup failures
//!
//! Gameplay itself has no recoverable errors; only bringing the page up can
//! fail.

use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupError {
    NoWindow,
    NoDocument,
    MissingElement { id: &'static str },
    NotACanvas { id: &'static str },
    Surface(String),
    NoAdapter,
    Device(String),
    NoSurfaceFormat,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::MissingElement { id } => write!(f, "missing element #{id}"),
            Self::NotACanvas { id } => write!(f, "element #{id} is not a canvas"),
            Self::Surface(e) => write!(f, "failed to create surface: {e}"),
            Self::NoAdapter => write!(f, "no compatible GPU adapter (WebGPU or WebGL2)"),
            Self::Device(e) => write!(f, "failed to request device: {e}"),
            Self::NoSurfaceFormat => write!(f, "surface reports no supported formats"),
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(target_arch = "wasm32")]
impl From<StartupError> for wasm_bindgen::JsValue {
    fn from(err: StartupError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
