//! In-memory engine and channel used by the unit tests.

use crate::adapter::WebViewAdapter;
use crate::channel::{MethodChannel, MethodResponse, MethodResult, ReplyHandler};
use crate::config::WebViewConfig;
use crate::engine::{
    Backend, Bounds, ChildWindow, ContentLoadingHandler, Controller, ControllerCompleted,
    CookieManager, CookiesCompleted, EngineCookie, Environment, EnvironmentCompleted,
    EventToken, HistoryChangedHandler, NavigationCompletedHandler, NavigationStarting,
    NavigationStartingHandler, NewWindowRequest, NewWindowRequestedHandler, ScriptCompleted,
    Session, Settings, UserAgentSettings, WebMessage, WebMessageReceivedHandler, WindowHandle,
};
use crate::error::{EngineError, EngineResult, StatusCode};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

/// Ordered record of engine calls, shared by every fake object.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0) Edg/120.0";

pub struct FakeWindow {
    calls: CallLog,
}

impl ChildWindow for FakeWindow {
    fn handle(&self) -> WindowHandle {
        WindowHandle(0x1234)
    }

    fn client_rect(&self) -> Bounds {
        Bounds {
            left: 0,
            top: 0,
            right: 800,
            bottom: 600,
        }
    }
}

impl Drop for FakeWindow {
    fn drop(&mut self) {
        self.calls.borrow_mut().push("destroy_window".to_string());
    }
}

#[derive(Default)]
struct Handlers {
    new_window_requested: Option<NewWindowRequestedHandler>,
    content_loading: Option<ContentLoadingHandler>,
    history_changed: Option<HistoryChangedHandler>,
    navigation_starting: Option<NavigationStartingHandler>,
    navigation_completed: Option<NavigationCompletedHandler>,
    web_message_received: Option<WebMessageReceivedHandler>,
}

pub struct FakeSession {
    pub calls: CallLog,
    pub can_go_back: Cell<bool>,
    pub can_go_forward: Cell<bool>,
    pub has_user_agent_settings: Cell<bool>,
    pub user_agent: RefCell<String>,
    /// `None` models an engine without a cookie manager.
    pub cookies: RefCell<Option<EngineResult<Vec<EngineCookie>>>>,
    pub script_outcome: RefCell<EngineResult<String>>,
    pub post_outcome: Cell<EngineResult<()>>,
    pub defer_scripts: Cell<bool>,
    pub navigate_outcome: Cell<EngineResult<()>>,
    pub cancel_outcome: Cell<EngineResult<()>>,
    pub pending_scripts: RefCell<Vec<ScriptCompleted>>,
    handlers: RefCell<Handlers>,
}

impl FakeSession {
    fn new(calls: CallLog) -> Self {
        Self {
            calls,
            can_go_back: Cell::new(false),
            can_go_forward: Cell::new(false),
            has_user_agent_settings: Cell::new(true),
            user_agent: RefCell::new(DEFAULT_USER_AGENT.to_string()),
            cookies: RefCell::new(Some(Ok(Vec::new()))),
            script_outcome: RefCell::new(Ok("null".to_string())),
            post_outcome: Cell::new(Ok(())),
            defer_scripts: Cell::new(false),
            navigate_outcome: Cell::new(Ok(())),
            cancel_outcome: Cell::new(Ok(())),
            pending_scripts: RefCell::new(Vec::new()),
            handlers: RefCell::new(Handlers::default()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    pub fn subscribed_events(&self) -> usize {
        let handlers = self.handlers.borrow();
        [
            handlers.new_window_requested.is_some(),
            handlers.content_loading.is_some(),
            handlers.history_changed.is_some(),
            handlers.navigation_starting.is_some(),
            handlers.navigation_completed.is_some(),
            handlers.web_message_received.is_some(),
        ]
        .into_iter()
        .filter(|subscribed| *subscribed)
        .count()
    }

    /// Raises NavigationStarting and reports whether the engine would cancel it.
    pub fn start_navigation(&self, uri: &str) -> EngineResult<bool> {
        let args = FakeNavigationStarting {
            uri: uri.to_string(),
            cancel: Cell::new(false),
            outcome: self.cancel_outcome.get(),
        };
        let handler = self.handlers.borrow_mut().navigation_starting.take();
        let Some(mut handler) = handler else {
            return Ok(false);
        };
        let outcome = handler(&args);
        self.handlers.borrow_mut().navigation_starting = Some(handler);
        outcome.map(|()| args.cancel.get())
    }

    /// Raises NewWindowRequested and reports whether it was marked handled.
    pub fn request_new_window(&self, uri: &str) -> EngineResult<bool> {
        let args = FakeNewWindowRequest {
            uri: uri.to_string(),
            handled: Cell::new(false),
        };
        let handler = self.handlers.borrow_mut().new_window_requested.take();
        let Some(mut handler) = handler else {
            return Ok(false);
        };
        let outcome = handler(&args);
        self.handlers.borrow_mut().new_window_requested = Some(handler);
        outcome.map(|()| args.handled.get())
    }

    pub fn receive_message(&self, message: FakeWebMessage) -> EngineResult<()> {
        let handler = self.handlers.borrow_mut().web_message_received.take();
        let Some(mut handler) = handler else {
            return Ok(());
        };
        let outcome = handler(&message);
        self.handlers.borrow_mut().web_message_received = Some(handler);
        outcome
    }

    pub fn change_history(&self) -> EngineResult<()> {
        let handler = self.handlers.borrow_mut().history_changed.take();
        let Some(mut handler) = handler else {
            return Ok(());
        };
        let outcome = handler();
        self.handlers.borrow_mut().history_changed = Some(handler);
        outcome
    }

    pub fn complete_navigation(&self) -> EngineResult<()> {
        let handler = self.handlers.borrow_mut().navigation_completed.take();
        let Some(mut handler) = handler else {
            return Ok(());
        };
        let outcome = handler();
        self.handlers.borrow_mut().navigation_completed = Some(handler);
        outcome
    }

    pub fn load_content(&self) -> EngineResult<()> {
        let handler = self.handlers.borrow_mut().content_loading.take();
        let Some(mut handler) = handler else {
            return Ok(());
        };
        let outcome = handler();
        self.handlers.borrow_mut().content_loading = Some(handler);
        outcome
    }
}

impl Session for FakeSession {
    fn settings(&self) -> EngineResult<Box<dyn Settings>> {
        Ok(Box::new(FakeSettings {
            calls: self.calls.clone(),
            user_agent: self
                .has_user_agent_settings
                .get()
                .then(|| FakeUserAgent {
                    calls: self.calls.clone(),
                    value: RefCell::new(self.user_agent.borrow().clone()),
                }),
        }))
    }

    fn navigate(&self, url: &str) -> EngineResult<()> {
        self.record(format!("navigate {url}"));
        self.navigate_outcome.get()
    }

    fn add_script_to_execute_on_document_created(&self, script: &str) -> EngineResult<()> {
        self.record(format!("add_script {script}"));
        Ok(())
    }

    fn go_back(&self) -> EngineResult<()> {
        self.record("go_back");
        Ok(())
    }

    fn go_forward(&self) -> EngineResult<()> {
        self.record("go_forward");
        Ok(())
    }

    fn reload(&self) -> EngineResult<()> {
        self.record("reload");
        Ok(())
    }

    fn stop(&self) -> EngineResult<()> {
        self.record("stop");
        Ok(())
    }

    fn can_go_back(&self) -> EngineResult<bool> {
        Ok(self.can_go_back.get())
    }

    fn can_go_forward(&self) -> EngineResult<bool> {
        Ok(self.can_go_forward.get())
    }

    fn open_dev_tools_window(&self) -> EngineResult<()> {
        self.record("open_dev_tools_window");
        Ok(())
    }

    fn execute_script(&self, script: &str, on_completed: ScriptCompleted) -> EngineResult<()> {
        self.record(format!("execute_script {script}"));
        if self.defer_scripts.get() {
            self.pending_scripts.borrow_mut().push(on_completed);
        } else {
            on_completed(self.script_outcome.borrow().clone());
        }
        Ok(())
    }

    fn post_web_message_as_string(&self, message: &str) -> EngineResult<()> {
        self.record(format!("post_string {message}"));
        self.post_outcome.get()
    }

    fn post_web_message_as_json(&self, message: &str) -> EngineResult<()> {
        self.record(format!("post_json {message}"));
        self.post_outcome.get()
    }

    fn cookie_manager(&self) -> Option<Rc<dyn CookieManager>> {
        let cookies = self.cookies.borrow().clone()?;
        Some(Rc::new(FakeCookieManager { cookies }))
    }

    fn add_new_window_requested(
        &self,
        handler: NewWindowRequestedHandler,
    ) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().new_window_requested = Some(handler);
        Ok(EventToken(1))
    }

    fn add_content_loading(&self, handler: ContentLoadingHandler) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().content_loading = Some(handler);
        Ok(EventToken(2))
    }

    fn add_history_changed(&self, handler: HistoryChangedHandler) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().history_changed = Some(handler);
        Ok(EventToken(3))
    }

    fn add_navigation_starting(
        &self,
        handler: NavigationStartingHandler,
    ) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().navigation_starting = Some(handler);
        Ok(EventToken(4))
    }

    fn add_navigation_completed(
        &self,
        handler: NavigationCompletedHandler,
    ) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().navigation_completed = Some(handler);
        Ok(EventToken(5))
    }

    fn add_web_message_received(
        &self,
        handler: WebMessageReceivedHandler,
    ) -> EngineResult<EventToken> {
        self.handlers.borrow_mut().web_message_received = Some(handler);
        Ok(EventToken(6))
    }
}

struct FakeSettings {
    calls: CallLog,
    user_agent: Option<FakeUserAgent>,
}

impl FakeSettings {
    fn record(&self, setting: &str, enabled: bool) -> EngineResult<()> {
        self.calls.borrow_mut().push(format!("{setting}={enabled}"));
        Ok(())
    }
}

impl Settings for FakeSettings {
    fn set_script_enabled(&self, enabled: bool) -> EngineResult<()> {
        self.record("script", enabled)
    }

    fn set_zoom_control_enabled(&self, enabled: bool) -> EngineResult<()> {
        self.record("zoom_control", enabled)
    }

    fn set_default_context_menus_enabled(&self, enabled: bool) -> EngineResult<()> {
        self.record("default_context_menus", enabled)
    }

    fn set_status_bar_enabled(&self, enabled: bool) -> EngineResult<()> {
        self.record("status_bar", enabled)
    }

    fn set_web_message_enabled(&self, enabled: bool) -> EngineResult<()> {
        self.record("web_message", enabled)
    }

    fn user_agent_settings(&self) -> Option<&dyn UserAgentSettings> {
        self.user_agent
            .as_ref()
            .map(|user_agent| user_agent as &dyn UserAgentSettings)
    }
}

struct FakeUserAgent {
    calls: CallLog,
    value: RefCell<String>,
}

impl UserAgentSettings for FakeUserAgent {
    fn user_agent(&self) -> EngineResult<String> {
        Ok(self.value.borrow().clone())
    }

    fn set_user_agent(&self, user_agent: &str) -> EngineResult<()> {
        self.calls
            .borrow_mut()
            .push(format!("set_user_agent {user_agent}"));
        *self.value.borrow_mut() = user_agent.to_string();
        Ok(())
    }
}

struct FakeCookieManager {
    cookies: EngineResult<Vec<EngineCookie>>,
}

impl CookieManager for FakeCookieManager {
    fn get_cookies(&self, uri: Option<&str>, on_completed: CookiesCompleted) -> EngineResult<()> {
        assert!(uri.is_none(), "cookies are always read unfiltered");
        on_completed(self.cookies.clone());
        Ok(())
    }
}

struct FakeNavigationStarting {
    uri: String,
    cancel: Cell<bool>,
    outcome: EngineResult<()>,
}

impl NavigationStarting for FakeNavigationStarting {
    fn uri(&self) -> EngineResult<String> {
        Ok(self.uri.clone())
    }

    fn set_cancel(&self, cancel: bool) -> EngineResult<()> {
        self.outcome?;
        self.cancel.set(cancel);
        Ok(())
    }
}

struct FakeNewWindowRequest {
    uri: String,
    handled: Cell<bool>,
}

impl NewWindowRequest for FakeNewWindowRequest {
    fn uri(&self) -> EngineResult<String> {
        Ok(self.uri.clone())
    }

    fn set_handled(&self, handled: bool) -> EngineResult<()> {
        self.handled.set(handled);
        Ok(())
    }
}

/// A web message as the page posted it.
pub enum FakeWebMessage {
    Text(String),
    Json(String),
    Broken(EngineError),
}

impl WebMessage for FakeWebMessage {
    fn try_get_as_string(&self) -> EngineResult<String> {
        match self {
            FakeWebMessage::Text(text) => Ok(text.clone()),
            FakeWebMessage::Json(_) => Err(EngineError::invalid_arg()),
            FakeWebMessage::Broken(err) => Err(*err),
        }
    }

    fn as_json(&self) -> EngineResult<String> {
        match self {
            FakeWebMessage::Text(text) => Ok(serde_json::to_string(text).unwrap()),
            FakeWebMessage::Json(json) => Ok(json.clone()),
            FakeWebMessage::Broken(err) => Err(*err),
        }
    }
}

pub struct FakeController {
    calls: CallLog,
    pub session: Rc<FakeSession>,
    pub session_available: Cell<bool>,
    pub bounds: Cell<Option<Bounds>>,
    pub close_outcome: Cell<EngineResult<()>>,
}

impl Controller for FakeController {
    fn session(&self) -> EngineResult<Rc<dyn Session>> {
        if self.session_available.get() {
            Ok(self.session.clone())
        } else {
            Err(EngineError::no_interface())
        }
    }

    fn set_bounds(&self, bounds: Bounds) -> EngineResult<()> {
        self.bounds.set(Some(bounds));
        Ok(())
    }

    fn close(&self) -> EngineResult<()> {
        self.calls.borrow_mut().push("close".to_string());
        self.close_outcome.get()
    }
}

struct FakeEnvironment {
    backend: Rc<BackendState>,
}

impl Environment for FakeEnvironment {
    fn create_controller(
        &self,
        parent: WindowHandle,
        on_completed: ControllerCompleted,
    ) -> EngineResult<()> {
        assert_eq!(parent, WindowHandle(0x1234));
        if self.backend.defer_controller.get() {
            *self.backend.pending_controller.borrow_mut() = Some(on_completed);
            return Ok(());
        }
        on_completed(self.backend.controller_outcome());
        Ok(())
    }
}

struct BackendState {
    controller: Rc<FakeController>,
    controller_error: Cell<Option<EngineError>>,
    defer_controller: Cell<bool>,
    pending_controller: RefCell<Option<ControllerCompleted>>,
}

impl BackendState {
    fn controller_outcome(&self) -> EngineResult<Rc<dyn Controller>> {
        match self.controller_error.get() {
            Some(err) => Err(err),
            None => Ok(self.controller.clone()),
        }
    }
}

/// Backend whose setup completes synchronously unless told otherwise.
pub struct FakeBackend {
    pub calls: CallLog,
    pub fail_window: Cell<bool>,
    pub environment_error: Cell<Option<EngineError>>,
    pub user_data_dirs: RefCell<Vec<String>>,
    state: Rc<BackendState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let calls = CallLog::default();
        let session = Rc::new(FakeSession::new(calls.clone()));
        let controller = Rc::new(FakeController {
            calls: calls.clone(),
            session,
            session_available: Cell::new(true),
            bounds: Cell::new(None),
            close_outcome: Cell::new(Ok(())),
        });
        Self {
            calls,
            fail_window: Cell::new(false),
            environment_error: Cell::new(None),
            user_data_dirs: RefCell::new(Vec::new()),
            state: Rc::new(BackendState {
                controller,
                controller_error: Cell::new(None),
                defer_controller: Cell::new(false),
                pending_controller: RefCell::new(None),
            }),
        }
    }

    pub fn session(&self) -> Rc<FakeSession> {
        self.state.controller.session.clone()
    }

    pub fn controller(&self) -> Rc<FakeController> {
        self.state.controller.clone()
    }

    pub fn fail_controller(&self, err: EngineError) {
        self.state.controller_error.set(Some(err));
    }

    pub fn defer_controller(&self) {
        self.state.defer_controller.set(true);
    }

    /// Delivers a deferred controller; returns false if none was requested.
    pub fn complete_controller(&self) -> bool {
        let pending = self.state.pending_controller.borrow_mut().take();
        match pending {
            Some(on_completed) => {
                on_completed(self.state.controller_outcome());
                true
            }
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Backend for FakeBackend {
    fn create_child_window(&self, class_name: &str) -> EngineResult<Box<dyn ChildWindow>> {
        if self.fail_window.get() {
            return Err(EngineError::fail());
        }
        self.calls
            .borrow_mut()
            .push(format!("create_window {class_name}"));
        Ok(Box::new(FakeWindow {
            calls: self.calls.clone(),
        }))
    }

    fn create_environment(
        &self,
        user_data_dir: &Path,
        on_completed: EnvironmentCompleted,
    ) -> EngineResult<()> {
        self.user_data_dirs
            .borrow_mut()
            .push(user_data_dir.display().to_string());
        match self.environment_error.get() {
            Some(err) => on_completed(Err(err)),
            None => on_completed(Ok(Rc::new(FakeEnvironment {
                backend: self.state.clone(),
            }))),
        }
        Ok(())
    }
}

/// Channel that records every outbound call and holds replies for the test.
#[derive(Default)]
pub struct RecordingChannel {
    calls: RefCell<Vec<(String, Value)>>,
    replies: RefCell<Vec<ReplyHandler>>,
}

impl RecordingChannel {
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.borrow().len()
    }

    /// Answers the oldest outstanding call that expects a reply.
    pub fn reply(&self, response: MethodResponse) {
        let reply = self.replies.borrow_mut().remove(0);
        reply(response);
    }
}

impl MethodChannel for RecordingChannel {
    fn invoke_method(&self, method: &str, arguments: Value, reply: Option<ReplyHandler>) {
        self.calls
            .borrow_mut()
            .push((method.to_string(), arguments));
        if let Some(reply) = reply {
            self.replies.borrow_mut().push(reply);
        }
    }
}

/// Collects what a `MethodResult` was answered with.
pub fn capture_result() -> (MethodResult, Rc<RefCell<Vec<MethodResponse>>>) {
    let responses = Rc::new(RefCell::new(Vec::new()));
    let sink = responses.clone();
    let result = MethodResult::new(move |response| sink.borrow_mut().push(response));
    (result, responses)
}

/// A backend, a channel and the creation codes reported so far.
pub struct Harness {
    pub backend: FakeBackend,
    pub channel: Rc<RecordingChannel>,
    pub created: Rc<RefCell<Vec<StatusCode>>>,
}

impl Harness {
    pub const VIEW_ID: i64 = 7;

    pub fn new() -> Self {
        Self {
            backend: FakeBackend::new(),
            channel: Rc::new(RecordingChannel::default()),
            created: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn create(&self) -> WebViewAdapter {
        self.create_with(&WebViewConfig::default())
    }

    pub fn create_with(&self, config: &WebViewConfig) -> WebViewAdapter {
        let created = self.created.clone();
        WebViewAdapter::new(
            &self.backend,
            self.channel.clone(),
            Self::VIEW_ID,
            Path::new("C:/Users/test/AppData/webview"),
            config,
            move |code| created.borrow_mut().push(code),
        )
    }

    /// Creates an adapter and forgets the setup calls.
    pub fn ready(&self) -> WebViewAdapter {
        let adapter = self.create();
        self.backend.clear_calls();
        self.channel.clear();
        adapter
    }

    pub fn session(&self) -> Rc<FakeSession> {
        self.backend.session()
    }

    pub fn created(&self) -> Vec<StatusCode> {
        self.created.borrow().clone()
    }
}
