use crate::engine::EngineCookie;
use serde::Serialize;

/// Cookie as reported to the host by `getAllCookies`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// `None` for session cookies.
    pub expires: Option<f64>,
    pub secure: bool,
    pub http_only: bool,
    pub session_only: bool,
}

impl From<EngineCookie> for CookieRecord {
    fn from(cookie: EngineCookie) -> Self {
        Self {
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            expires: (cookie.expires >= 0.0).then_some(cookie.expires),
            secure: cookie.is_secure,
            http_only: cookie.is_http_only,
            session_only: cookie.is_session,
        }
    }
}
