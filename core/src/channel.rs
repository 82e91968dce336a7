//! Host method-channel seam: outbound notifications and inbound results.

use crate::error::MethodError;
use serde::Serialize;
use serde_json::Value;

/// Answer to a single method call.
#[derive(Clone, Debug, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error(MethodError),
    NotImplemented,
}

/// Single-use callback receiving the host's answer to an outbound call.
pub type ReplyHandler = Box<dyn FnOnce(MethodResponse)>;

/// Outbound call sink provided by the host.
///
/// Calls are asynchronous from the host's point of view: `reply`, when given,
/// may be invoked later on the same thread, or synchronously from within
/// `invoke_method`.
pub trait MethodChannel {
    fn invoke_method(&self, method: &str, arguments: Value, reply: Option<ReplyHandler>);
}

/// Single-use result sink for one inbound command.
pub struct MethodResult {
    respond: Box<dyn FnOnce(MethodResponse)>,
}

impl MethodResult {
    pub fn new(respond: impl FnOnce(MethodResponse) + 'static) -> Self {
        Self {
            respond: Box::new(respond),
        }
    }

    pub fn success(self, value: Value) {
        (self.respond)(MethodResponse::Success(value));
    }

    /// Success without a value.
    pub fn success_empty(self) {
        self.success(Value::Null);
    }

    pub fn error(self, error: MethodError) {
        (self.respond)(MethodResponse::Error(error));
    }

    pub fn not_implemented(self) {
        (self.respond)(MethodResponse::NotImplemented);
    }

    /// Answers with the value or the error.
    pub fn complete(self, outcome: Result<Value, MethodError>) {
        match outcome {
            Ok(value) => self.success(value),
            Err(error) => self.error(error),
        }
    }
}

/// Notifications sent from the web view to the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Notification {
    HistoryChanged {
        id: i64,
        can_go_back: bool,
        can_go_forward: bool,
    },
    NavigationStarted {
        id: i64,
    },
    /// Asks the host whether a navigation may proceed; expects a boolean reply.
    UrlRequested {
        id: i64,
        url: String,
    },
    NavigationCompleted {
        id: i64,
    },
    WebMessageReceived {
        id: i64,
        message: String,
    },
}

impl Notification {
    pub fn method(&self) -> &'static str {
        match self {
            Notification::HistoryChanged { .. } => "onHistoryChanged",
            Notification::NavigationStarted { .. } => "onNavigationStarted",
            Notification::UrlRequested { .. } => "onUrlRequested",
            Notification::NavigationCompleted { .. } => "onNavigationCompleted",
            Notification::WebMessageReceived { .. } => "onWebMessageReceived",
        }
    }

    /// The argument map of the notification.
    pub fn arguments(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Sends the notification over `channel`.
    pub fn send(self, channel: &dyn MethodChannel, reply: Option<ReplyHandler>) {
        channel.invoke_method(self.method(), self.arguments(), reply);
    }
}
