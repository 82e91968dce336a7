//! Commands issued by the host.

use super::{WebViewAdapter, session};
use crate::channel::MethodResult;
use crate::cookie::CookieRecord;
use crate::engine::Session;
use crate::error::{EngineResult, MethodError};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

const NOT_CREATED: &str = "webview not created";

/// A result that either a completion callback or the issuing call answers,
/// whichever gets there first.
#[derive(Clone)]
struct SharedResult(Rc<RefCell<Option<MethodResult>>>);

impl SharedResult {
    fn new(result: MethodResult) -> Self {
        Self(Rc::new(RefCell::new(Some(result))))
    }

    fn take(&self) -> Option<MethodResult> {
        self.0.borrow_mut().take()
    }
}

impl WebViewAdapter {
    pub fn navigate(&self, url: &str) {
        self.delegate("navigate", |session| session.navigate(url));
    }

    pub fn add_script_to_execute_on_document_created(&self, script: &str) {
        self.delegate("add_script_to_execute_on_document_created", |session| {
            session.add_script_to_execute_on_document_created(script)
        });
    }

    /// Sets the user agent to the captured default followed by `name`.
    pub fn set_application_name_for_user_agent(&self, name: &str) {
        let Some(session) = self.session() else { return };
        let default_user_agent = self.state.borrow().default_user_agent.clone();

        let settings = match session.settings() {
            Ok(settings) => settings,
            Err(err) => {
                warn!(view_id = self.id(), %err, "failed to get settings");
                return;
            }
        };
        let Some(user_agent_settings) = settings.user_agent_settings() else {
            return;
        };
        if let Err(err) = user_agent_settings.set_user_agent(&(default_user_agent + name)) {
            warn!(view_id = self.id(), %err, "failed to set user agent");
        }
    }

    pub fn go_back(&self) {
        self.delegate("go_back", |session| session.go_back());
    }

    pub fn go_forward(&self) {
        self.delegate("go_forward", |session| session.go_forward());
    }

    pub fn reload(&self) {
        self.delegate("reload", |session| session.reload());
    }

    pub fn stop(&self) {
        self.delegate("stop", |session| session.stop());
    }

    pub fn open_dev_tools_window(&self) {
        self.delegate("open_dev_tools_window", |session| {
            session.open_dev_tools_window()
        });
    }

    pub fn can_go_back(&self) -> bool {
        self.session()
            .is_some_and(|session| session.can_go_back().unwrap_or(false))
    }

    pub fn can_go_forward(&self) -> bool {
        self.session()
            .is_some_and(|session| session.can_go_forward().unwrap_or(false))
    }

    /// Resizes the session to the child window's current client area.
    pub fn update_bounds(&self) {
        session::update_bounds(&self.state);
    }

    /// Answers with every cookie in the store as a list of cookie maps.
    pub fn get_all_cookies(&self, result: MethodResult) {
        let Some(session) = self.session() else {
            return result.error(MethodError::generic(NOT_CREATED));
        };
        let Some(cookie_manager) = session.cookie_manager() else {
            return result.error(MethodError::generic("Failed to get cookie manager"));
        };

        let id = self.id();
        let result = SharedResult::new(result);
        let completion = result.clone();
        let requested = cookie_manager.get_cookies(
            None,
            Box::new(move |cookies| {
                let Some(result) = completion.take() else { return };
                match cookies {
                    Ok(cookies) => {
                        let records: Vec<CookieRecord> =
                            cookies.into_iter().map(CookieRecord::from).collect();
                        result.success(
                            serde_json::to_value(records).unwrap_or(Value::Array(Vec::new())),
                        );
                    }
                    Err(err) => {
                        warn!(view_id = id, %err, "failed to get cookies");
                        result.error(MethodError::generic("Failed to get cookies"));
                    }
                }
            }),
        );

        if let Err(err) = requested {
            warn!(view_id = id, %err, "failed to request cookies");
            if let Some(result) = result.take() {
                result.error(MethodError::generic("Failed to get cookies"));
            }
        }
    }

    /// Runs `script` and answers with its result as JSON text.
    pub fn execute_java_script(&self, script: &str, result: MethodResult) {
        let Some(session) = self.session() else {
            return result.error(MethodError::generic(NOT_CREATED));
        };

        let id = self.id();
        let result = SharedResult::new(result);
        let completion = result.clone();
        let requested = session.execute_script(
            script,
            Box::new(move |outcome| {
                let Some(result) = completion.take() else { return };
                match outcome {
                    Ok(json) => result.success(Value::String(json)),
                    Err(err) => {
                        warn!(view_id = id, %err, "script execution failed");
                        result.error(MethodError::generic("Error executing JavaScript"));
                    }
                }
            }),
        );

        if let Err(err) = requested {
            warn!(view_id = id, %err, "failed to execute script");
            if let Some(result) = result.take() {
                result.error(MethodError::generic("Error executing JavaScript"));
            }
        }
    }

    pub fn post_web_message_as_string(&self, message: &str, result: MethodResult) {
        self.post(
            |session| session.post_web_message_as_string(message),
            "Error posting webmessage as String",
            result,
        );
    }

    pub fn post_web_message_as_json(&self, message: &str, result: MethodResult) {
        self.post(
            |session| session.post_web_message_as_json(message),
            "Error posting webmessage as JSON",
            result,
        );
    }

    fn post(
        &self,
        post: impl FnOnce(&dyn Session) -> EngineResult<()>,
        failure: &str,
        result: MethodResult,
    ) {
        let Some(session) = self.session() else {
            return result.error(MethodError::generic(NOT_CREATED));
        };
        match post(session.as_ref()) {
            Ok(()) => result.success_empty(),
            Err(err) => {
                warn!(view_id = self.id(), %err, "{failure}");
                result.error(MethodError::generic(failure));
            }
        }
    }

    /// Runs a fire-and-forget engine call, logging when it cannot be made.
    fn delegate(&self, command: &str, call: impl FnOnce(&dyn Session) -> EngineResult<()>) {
        let Some(session) = self.session() else {
            warn!(view_id = self.id(), command, "{NOT_CREATED}");
            return;
        };
        if let Err(err) = call(session.as_ref()) {
            warn!(view_id = self.id(), command, %err, "engine call failed");
        }
    }
}
