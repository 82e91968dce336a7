//! Browser engine seam.
//!
//! The adapter talks to the engine only through these traits. The chain is
//! `Backend` → `Environment` → `Controller` → `Session`, each step completing
//! asynchronously through a single-use callback on the caller's thread.

use crate::error::EngineResult;
use std::path::Path;
use std::rc::Rc;

/// Raw native window handle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct WindowHandle(pub isize);

/// Rectangle in window client coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The native child window hosting the browser.
pub trait ChildWindow {
    fn handle(&self) -> WindowHandle;
    fn client_rect(&self) -> Bounds;
}

pub type EnvironmentCompleted = Box<dyn FnOnce(EngineResult<Rc<dyn Environment>>)>;
pub type ControllerCompleted = Box<dyn FnOnce(EngineResult<Rc<dyn Controller>>)>;

/// Platform entry point.
pub trait Backend {
    /// Creates the message-only child window the controller is bound to.
    fn create_child_window(&self, class_name: &str) -> EngineResult<Box<dyn ChildWindow>>;

    /// Starts creating an engine environment rooted at `user_data_dir`.
    fn create_environment(
        &self,
        user_data_dir: &Path,
        on_completed: EnvironmentCompleted,
    ) -> EngineResult<()>;
}

pub trait Environment {
    fn create_controller(
        &self,
        parent: WindowHandle,
        on_completed: ControllerCompleted,
    ) -> EngineResult<()>;
}

pub trait Controller {
    /// The session hosted by this controller, if it can be obtained.
    fn session(&self) -> EngineResult<Rc<dyn Session>>;
    fn set_bounds(&self, bounds: Bounds) -> EngineResult<()>;
    fn close(&self) -> EngineResult<()>;
}

/// Session settings.
pub trait Settings {
    fn set_script_enabled(&self, enabled: bool) -> EngineResult<()>;
    fn set_zoom_control_enabled(&self, enabled: bool) -> EngineResult<()>;
    fn set_default_context_menus_enabled(&self, enabled: bool) -> EngineResult<()>;
    fn set_status_bar_enabled(&self, enabled: bool) -> EngineResult<()>;
    fn set_web_message_enabled(&self, enabled: bool) -> EngineResult<()>;

    /// Extended settings exposing the user agent; `None` on engines without it.
    fn user_agent_settings(&self) -> Option<&dyn UserAgentSettings>;
}

pub trait UserAgentSettings {
    fn user_agent(&self) -> EngineResult<String>;
    fn set_user_agent(&self, user_agent: &str) -> EngineResult<()>;
}

/// A cookie as held by the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Seconds since the UNIX epoch; negative for session cookies.
    pub expires: f64,
    pub is_secure: bool,
    pub is_http_only: bool,
    pub is_session: bool,
}

pub type CookiesCompleted = Box<dyn FnOnce(EngineResult<Vec<EngineCookie>>)>;

pub trait CookieManager {
    /// Enumerates cookies; `uri` of `None` returns every cookie in the store.
    fn get_cookies(&self, uri: Option<&str>, on_completed: CookiesCompleted) -> EngineResult<()>;
}

pub type ScriptCompleted = Box<dyn FnOnce(EngineResult<String>)>;

pub trait NewWindowRequest {
    fn uri(&self) -> EngineResult<String>;
    fn set_handled(&self, handled: bool) -> EngineResult<()>;
}

pub trait NavigationStarting {
    fn uri(&self) -> EngineResult<String>;
    fn set_cancel(&self, cancel: bool) -> EngineResult<()>;
}

pub trait WebMessage {
    /// Fails with `E_INVALIDARG` when the message was not posted as a string.
    fn try_get_as_string(&self) -> EngineResult<String>;
    fn as_json(&self) -> EngineResult<String>;
}

/// Event handlers return an error to report a failure back to the engine.
pub type NewWindowRequestedHandler = Box<dyn FnMut(&dyn NewWindowRequest) -> EngineResult<()>>;
pub type ContentLoadingHandler = Box<dyn FnMut() -> EngineResult<()>>;
pub type HistoryChangedHandler = Box<dyn FnMut() -> EngineResult<()>>;
pub type NavigationStartingHandler = Box<dyn FnMut(&dyn NavigationStarting) -> EngineResult<()>>;
pub type NavigationCompletedHandler = Box<dyn FnMut() -> EngineResult<()>>;
pub type WebMessageReceivedHandler = Box<dyn FnMut(&dyn WebMessage) -> EngineResult<()>>;

/// Registration token returned by the engine for an event subscription.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EventToken(pub i64);

/// The navigable browsing context.
pub trait Session {
    fn settings(&self) -> EngineResult<Box<dyn Settings>>;

    fn navigate(&self, url: &str) -> EngineResult<()>;
    fn add_script_to_execute_on_document_created(&self, script: &str) -> EngineResult<()>;
    fn go_back(&self) -> EngineResult<()>;
    fn go_forward(&self) -> EngineResult<()>;
    fn reload(&self) -> EngineResult<()>;
    fn stop(&self) -> EngineResult<()>;
    fn can_go_back(&self) -> EngineResult<bool>;
    fn can_go_forward(&self) -> EngineResult<bool>;
    fn open_dev_tools_window(&self) -> EngineResult<()>;

    /// Runs `script`; the result arrives as JSON text.
    fn execute_script(&self, script: &str, on_completed: ScriptCompleted) -> EngineResult<()>;
    fn post_web_message_as_string(&self, message: &str) -> EngineResult<()>;
    fn post_web_message_as_json(&self, message: &str) -> EngineResult<()>;

    /// `None` on engines without cookie management.
    fn cookie_manager(&self) -> Option<Rc<dyn CookieManager>>;

    fn add_new_window_requested(&self, handler: NewWindowRequestedHandler) -> EngineResult<EventToken>;
    fn add_content_loading(&self, handler: ContentLoadingHandler) -> EngineResult<EventToken>;
    fn add_history_changed(&self, handler: HistoryChangedHandler) -> EngineResult<EventToken>;
    fn add_navigation_starting(&self, handler: NavigationStartingHandler) -> EngineResult<EventToken>;
    fn add_navigation_completed(&self, handler: NavigationCompletedHandler) -> EngineResult<EventToken>;
    fn add_web_message_received(&self, handler: WebMessageReceivedHandler) -> EngineResult<EventToken>;
}
