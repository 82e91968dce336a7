use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Native 32-bit result code as reported by the windowing layer and the browser engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const OK: Self = Self(0);
    pub const FALSE: Self = Self(1);
    pub const FAIL: Self = Self(0x8000_4005_u32 as i32);
    pub const INVALID_ARG: Self = Self(0x8007_0057_u32 as i32);
    pub const NO_INTERFACE: Self = Self(0x8000_4002_u32 as i32);
    /// `HRESULT_FROM_WIN32(ERROR_NO_UNICODE_TRANSLATION)`.
    pub const NO_UNICODE_TRANSLATION: Self = Self(0x8007_0459_u32 as i32);

    /// Success codes are non-negative (`S_OK`, `S_FALSE`).
    pub fn is_success(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0 as u32)
    }
}

impl From<EngineError> for StatusCode {
    fn from(error: EngineError) -> Self {
        error.code
    }
}

/// A browser engine call that did not succeed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("engine call failed with {code}")]
pub struct EngineError {
    pub code: StatusCode,
}

impl EngineError {
    pub fn new(code: StatusCode) -> Self {
        Self { code }
    }

    pub fn fail() -> Self {
        Self::new(StatusCode::FAIL)
    }

    pub fn invalid_arg() -> Self {
        Self::new(StatusCode::INVALID_ARG)
    }

    pub fn no_interface() -> Self {
        Self::new(StatusCode::NO_INTERFACE)
    }

    pub fn is_invalid_arg(&self) -> bool {
        self.code == StatusCode::INVALID_ARG
    }
}

impl From<EncodingError> for EngineError {
    fn from(_: EncodingError) -> Self {
        Self::new(StatusCode::NO_UNICODE_TRANSLATION)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Error code used for every command failure reported to the host.
pub const GENERIC_ERROR_CODE: &str = "0";

/// Error answered to the host through a method result.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct MethodError {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

impl MethodError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Error with the generic `"0"` code.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(GENERIC_ERROR_CODE, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("invalid UTF-16 at unit {index}")]
    InvalidUtf16 { index: usize },
}

/// Errors that can occur when loading or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
