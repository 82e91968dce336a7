//! The web view adapter: one child window, one engine session.
//!
//! Construction starts a two-stage asynchronous setup (environment, then
//! controller). Once the controller arrives the session is configured and its
//! events are relayed to the host channel. Commands issued before that point
//! are no-ops or answer with an error.

mod commands;
mod session;

use crate::channel::MethodChannel;
use crate::config::{SessionSettings, WebViewConfig};
use crate::engine::{Backend, ChildWindow, Controller, Environment, Session, WindowHandle};
use crate::error::{EngineError, EngineResult, StatusCode};
use crate::navigation::NavigationApproval;
use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};
use tracing::{debug, error, warn};

pub type CreatedCallback = Box<dyn FnOnce(StatusCode)>;

pub(crate) type Shared = Rc<RefCell<State>>;
pub(crate) type WeakShared = Weak<RefCell<State>>;

pub(crate) struct State {
    pub(crate) id: i64,
    pub(crate) channel: Rc<dyn MethodChannel>,
    pub(crate) settings: SessionSettings,
    pub(crate) window: Option<Box<dyn ChildWindow>>,
    pub(crate) controller: Option<Rc<dyn Controller>>,
    pub(crate) session: Option<Rc<dyn Session>>,
    pub(crate) default_user_agent: String,
    pub(crate) approval: NavigationApproval,
    on_created: Option<CreatedCallback>,
}

/// Hosts one browser session inside a native child window.
pub struct WebViewAdapter {
    state: Shared,
}

impl WebViewAdapter {
    /// Creates the child window and starts asynchronous engine setup.
    ///
    /// `on_created` is called exactly once: with `S_FALSE` if the window cannot
    /// be created, otherwise with the environment or controller result code.
    pub fn new(
        backend: &dyn Backend,
        channel: Rc<dyn MethodChannel>,
        id: i64,
        user_data_dir: &Path,
        config: &WebViewConfig,
        on_created: impl FnOnce(StatusCode) + 'static,
    ) -> Self {
        let state = Rc::new(RefCell::new(State {
            id,
            channel,
            settings: config.settings.clone(),
            window: None,
            controller: None,
            session: None,
            default_user_agent: String::new(),
            approval: NavigationApproval::new(),
            on_created: Some(Box::new(on_created)),
        }));
        let adapter = Self { state };

        let window = match backend.create_child_window(&config.window.class_name) {
            Ok(window) => window,
            Err(err) => {
                error!(view_id = id, %err, "failed to create web view window");
                report_created(&adapter.state, StatusCode::FALSE);
                return adapter;
            }
        };
        let parent = window.handle();
        adapter.state.borrow_mut().window = Some(window);

        let weak = Rc::downgrade(&adapter.state);
        let requested = backend.create_environment(
            user_data_dir,
            Box::new(move |result| on_environment_created(weak, parent, result)),
        );
        if let Err(err) = requested {
            error!(view_id = id, %err, "failed to request environment");
            report_created(&adapter.state, err.code);
        }

        adapter
    }

    pub fn id(&self) -> i64 {
        self.state.borrow().id
    }

    /// Whether setup has completed and a session is available.
    pub fn has_session(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    /// Answers a pending `onUrlRequested` call.
    ///
    /// Approval replays the navigation; denial drops it. Unknown or already
    /// resolved ids are ignored.
    pub fn resolve_url_request(&self, request_id: u64, approve: bool) {
        resolve_url_request(&self.state, request_id, approve);
    }

    pub(crate) fn session(&self) -> Option<Rc<dyn Session>> {
        self.state.borrow().session.clone()
    }
}

impl Drop for WebViewAdapter {
    fn drop(&mut self) {
        let (id, session, controller, window) = {
            let mut state = self.state.borrow_mut();
            (
                state.id,
                state.session.take(),
                state.controller.take(),
                state.window.take(),
            )
        };

        if let Some(session) = session
            && let Err(err) = session.stop()
        {
            warn!(view_id = id, %err, "failed to stop navigation");
        }
        if let Some(controller) = controller
            && let Err(err) = controller.close()
        {
            warn!(view_id = id, %err, "failed to close controller");
        }
        drop(window);
        debug!(view_id = id, "web view destroyed");
    }
}

fn report_created(state: &Shared, code: StatusCode) {
    let callback = state.borrow_mut().on_created.take();
    if let Some(callback) = callback {
        callback(code);
    }
}

fn on_environment_created(
    weak: WeakShared,
    parent: WindowHandle,
    result: EngineResult<Rc<dyn Environment>>,
) {
    let Some(state) = weak.upgrade() else { return };
    let id = state.borrow().id;

    let environment = match result {
        Ok(environment) => environment,
        Err(err) => {
            error!(view_id = id, %err, "failed to create environment");
            report_created(&state, err.code);
            return;
        }
    };

    let requested = environment.create_controller(
        parent,
        Box::new(move |result| on_controller_created(weak, result)),
    );
    if let Err(err) = requested {
        error!(view_id = id, %err, "failed to request controller");
        report_created(&state, err.code);
    }
}

fn on_controller_created(weak: WeakShared, result: EngineResult<Rc<dyn Controller>>) {
    let Some(state) = weak.upgrade() else {
        // The adapter went away while the controller was being created.
        if let Ok(controller) = result
            && let Err(err) = controller.close()
        {
            warn!(%err, "failed to close late controller");
        }
        return;
    };

    match result {
        Ok(controller) => {
            state.borrow_mut().controller = Some(controller);
            session::configure(&state);
            report_created(&state, StatusCode::OK);
        }
        Err(err) => {
            let id = state.borrow().id;
            error!(view_id = id, %err, "failed to create controller");
            report_created(&state, err.code);
        }
    }
}

pub(crate) fn resolve_url_request(state: &Shared, request_id: u64, approve: bool) {
    let (id, url, session) = {
        let mut state = state.borrow_mut();
        let url = state.approval.resolve(request_id, approve);
        (state.id, url, state.session.clone())
    };
    let Some(url) = url else {
        debug!(view_id = id, request_id, approve, "url request dropped");
        return;
    };

    let replayed = match session {
        Some(session) => session.navigate(&url),
        None => {
            warn!(view_id = id, "webview not created");
            Err(EngineError::fail())
        }
    };
    if let Err(err) = replayed {
        warn!(view_id = id, %err, url = %url, "failed to replay approved navigation");
        state.borrow_mut().approval.abandon_replay();
    }
}
