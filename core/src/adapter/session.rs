//! Session configuration and the engine event table.

use super::{Shared, WeakShared, resolve_url_request};
use crate::channel::{MethodChannel, MethodResponse, Notification};
use crate::config::SessionSettings;
use crate::engine::{
    ContentLoadingHandler, HistoryChangedHandler, NavigationCompletedHandler, NavigationStarting,
    NavigationStartingHandler, NewWindowRequest, NewWindowRequestedHandler, Session, Settings,
    WebMessage, WebMessageReceivedHandler,
};
use crate::error::EngineResult;
use crate::navigation::StartingDecision;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Configures the session of a freshly created controller.
pub(super) fn configure(state: &Shared) {
    let (id, controller, settings) = {
        let state = state.borrow();
        (state.id, state.controller.clone(), state.settings.clone())
    };
    let Some(controller) = controller else { return };

    let session = match controller.session() {
        Ok(session) => session,
        Err(err) => {
            error!(view_id = id, %err, "failed to get core webview");
            return;
        }
    };

    let default_user_agent = match session.settings() {
        Ok(engine_settings) => {
            apply_settings(engine_settings.as_ref(), &settings, id);
            engine_settings
                .user_agent_settings()
                .and_then(|ua| ua.user_agent().ok())
        }
        Err(err) => {
            warn!(view_id = id, %err, "failed to get settings");
            None
        }
    };

    {
        let mut state = state.borrow_mut();
        state.session = Some(session.clone());
        if let Some(user_agent) = default_user_agent {
            state.default_user_agent = user_agent;
        }
    }

    update_bounds(state);
    subscribe(state, session.as_ref());
    debug!(view_id = id, "web view session ready");
}

fn apply_settings(engine_settings: &dyn Settings, settings: &SessionSettings, id: i64) {
    let applied = [
        engine_settings.set_script_enabled(settings.script_enabled),
        engine_settings.set_zoom_control_enabled(settings.zoom_control_enabled),
        engine_settings.set_default_context_menus_enabled(settings.default_context_menus_enabled),
        engine_settings.set_status_bar_enabled(settings.status_bar_enabled),
        engine_settings.set_web_message_enabled(settings.web_message_enabled),
    ];
    for err in applied.into_iter().filter_map(Result::err) {
        warn!(view_id = id, %err, "failed to apply setting");
    }
}

/// Resizes the session to the child window's client area.
pub(super) fn update_bounds(state: &Shared) {
    let (id, controller, bounds) = {
        let state = state.borrow();
        (
            state.id,
            state.controller.clone(),
            state.window.as_ref().map(|window| window.client_rect()),
        )
    };
    if let (Some(controller), Some(bounds)) = (controller, bounds)
        && let Err(err) = controller.set_bounds(bounds)
    {
        warn!(view_id = id, %err, "failed to set bounds");
    }
}

fn subscribe(state: &Shared, session: &dyn Session) {
    let id = state.borrow().id;
    let weak = Rc::downgrade(state);

    let registrations = [
        (
            "NewWindowRequested",
            session.add_new_window_requested(new_window_requested(weak.clone())),
        ),
        (
            "ContentLoading",
            session.add_content_loading(content_loading(id)),
        ),
        (
            "HistoryChanged",
            session.add_history_changed(history_changed(weak.clone())),
        ),
        (
            "NavigationStarting",
            session.add_navigation_starting(navigation_starting(weak.clone())),
        ),
        (
            "NavigationCompleted",
            session.add_navigation_completed(navigation_completed(weak.clone())),
        ),
        (
            "WebMessageReceived",
            session.add_web_message_received(web_message_received(weak)),
        ),
    ];
    for (event, registered) in registrations {
        if let Err(err) = registered {
            warn!(view_id = id, %err, event, "failed to subscribe");
        }
    }
}

/// Adapter state cloned out of the cell so no borrow is held across engine
/// or channel calls.
struct Relay {
    state: Shared,
    id: i64,
    channel: Rc<dyn MethodChannel>,
    session: Option<Rc<dyn Session>>,
}

impl Relay {
    fn upgrade(weak: &WeakShared) -> Option<Self> {
        let state = weak.upgrade()?;
        let (id, channel, session) = {
            let state = state.borrow();
            (state.id, state.channel.clone(), state.session.clone())
        };
        Some(Self {
            state,
            id,
            channel,
            session,
        })
    }

    fn notify(&self, notification: Notification) {
        notification.send(self.channel.as_ref(), None);
    }
}

/// Keeps every page in this view instead of opening new windows.
fn new_window_requested(weak: WeakShared) -> NewWindowRequestedHandler {
    Box::new(move |request: &dyn NewWindowRequest| {
        let uri = request.uri()?;
        if let Some(Relay {
            id,
            session: Some(session),
            ..
        }) = Relay::upgrade(&weak)
        {
            debug!(view_id = id, uri = %uri, "new window redirected");
            if let Err(err) = session.navigate(&uri) {
                warn!(view_id = id, %err, uri = %uri, "failed to redirect new window");
            }
        }
        request.set_handled(true)
    })
}

fn content_loading(id: i64) -> ContentLoadingHandler {
    Box::new(move || {
        debug!(view_id = id, "content loading");
        Ok(())
    })
}

fn history_changed(weak: WeakShared) -> HistoryChangedHandler {
    Box::new(move || {
        let Some(relay) = Relay::upgrade(&weak) else {
            return Ok(());
        };
        let (can_go_back, can_go_forward) = relay
            .session
            .as_ref()
            .map(|session| {
                (
                    session.can_go_back().unwrap_or(false),
                    session.can_go_forward().unwrap_or(false),
                )
            })
            .unwrap_or((false, false));

        relay.notify(Notification::HistoryChanged {
            id: relay.id,
            can_go_back,
            can_go_forward,
        });
        Ok(())
    })
}

fn navigation_starting(weak: WeakShared) -> NavigationStartingHandler {
    Box::new(move |args: &dyn NavigationStarting| {
        let Some(relay) = Relay::upgrade(&weak) else {
            return Ok(());
        };
        relay.notify(Notification::NavigationStarted { id: relay.id });

        let decision = relay.state.borrow_mut().approval.on_starting();
        match decision {
            StartingDecision::Intercept => intercept(&relay, args),
            StartingDecision::Pass => {
                debug!(view_id = relay.id, "approved navigation replayed");
                args.set_cancel(false)
            }
        }
    })
}

/// Cancels the navigation and asks the host whether it may proceed.
fn intercept(relay: &Relay, args: &dyn NavigationStarting) -> EngineResult<()> {
    let url = args.uri()?;
    args.set_cancel(true)?;
    let request_id = relay.state.borrow_mut().approval.begin_request(url.clone());

    let id = relay.id;
    let weak = Rc::downgrade(&relay.state);
    Notification::UrlRequested { id, url }.send(
        relay.channel.as_ref(),
        Some(Box::new(move |response| {
            let Some(state) = weak.upgrade() else { return };
            let approve = approval_from_reply(&response).unwrap_or_else(|| {
                warn!(view_id = id, ?response, "unexpected onUrlRequested reply");
                false
            });
            resolve_url_request(&state, request_id, approve);
        })),
    );
    Ok(())
}

/// Interprets the host's reply to `onUrlRequested`.
fn approval_from_reply(response: &MethodResponse) -> Option<bool> {
    match response {
        MethodResponse::Success(Value::Bool(approve)) => Some(*approve),
        _ => None,
    }
}

fn navigation_completed(weak: WeakShared) -> NavigationCompletedHandler {
    Box::new(move || {
        if let Some(relay) = Relay::upgrade(&weak) {
            relay.notify(Notification::NavigationCompleted { id: relay.id });
        }
        Ok(())
    })
}

fn web_message_received(weak: WeakShared) -> WebMessageReceivedHandler {
    Box::new(move |args: &dyn WebMessage| {
        let message = match args.try_get_as_string() {
            Ok(message) => message,
            // Not a string: the page posted a JSON object.
            Err(err) if err.is_invalid_arg() => args.as_json()?,
            Err(err) => return Err(err),
        };

        if let Some(relay) = Relay::upgrade(&weak) {
            relay.notify(Notification::WebMessageReceived {
                id: relay.id,
                message,
            });
        }
        Ok(())
    })
}
