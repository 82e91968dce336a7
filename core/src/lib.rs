//! Platform-independent core of an embedded browser web view.
//!
//! The browser engine and the host method channel are both traits, so the
//! adapter logic runs the same against WebView2 and the in-memory fakes.

pub mod adapter;
pub mod channel;
pub mod config;
pub mod cookie;
pub mod dispatch;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod navigation;

#[cfg(test)]
pub(crate) mod fake;

pub use adapter::WebViewAdapter;
pub use channel::{MethodChannel, MethodResponse, MethodResult, Notification, ReplyHandler};
pub use config::{SessionSettings, WebViewConfig, WindowConfig};
pub use cookie::CookieRecord;
pub use dispatch::{Command, DispatchError};
pub use error::{ConfigError, EncodingError, EngineError, EngineResult, MethodError, StatusCode};
pub use navigation::{NavigationApproval, NavigationGate, StartingDecision};
