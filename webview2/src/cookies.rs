//! Cookie enumeration through `ICoreWebView2CookieManager`.

use crate::error::IntoEngine;
use crate::wide::{WideString, take_string};
use webview2_com::GetCookiesCompletedHandler;
use webview2_com::Microsoft::Web::WebView2::Win32::{
    ICoreWebView2Cookie, ICoreWebView2CookieList, ICoreWebView2CookieManager,
};
use webview_window_core::EngineResult;
use webview_window_core::engine::{CookieManager, CookiesCompleted, EngineCookie};
use windows::core::BOOL;

pub(crate) struct WebView2CookieManager {
    manager: ICoreWebView2CookieManager,
}

impl WebView2CookieManager {
    pub(crate) fn new(manager: ICoreWebView2CookieManager) -> Self {
        Self { manager }
    }
}

impl CookieManager for WebView2CookieManager {
    fn get_cookies(&self, uri: Option<&str>, on_completed: CookiesCompleted) -> EngineResult<()> {
        // An empty URI selects every cookie in the store.
        let uri = WideString::new(uri.unwrap_or_default());
        let handler = GetCookiesCompletedHandler::create(Box::new(
            move |result: windows::core::Result<()>, list: Option<ICoreWebView2CookieList>| {
                let cookies = result.engine().and_then(|()| match list {
                    Some(list) => read_cookie_list(&list),
                    None => Ok(Vec::new()),
                });
                on_completed(cookies);
                Ok(())
            },
        ));

        unsafe { self.manager.GetCookies(uri.as_pcwstr(), &handler) }.engine()
    }
}

fn read_cookie_list(list: &ICoreWebView2CookieList) -> EngineResult<Vec<EngineCookie>> {
    let mut count = 0u32;
    unsafe { list.Count(&mut count) }.engine()?;

    (0..count)
        .map(|index| {
            let cookie = unsafe { list.GetValueAtIndex(index) }.engine()?;
            read_cookie(&cookie)
        })
        .collect()
}

fn read_cookie(cookie: &ICoreWebView2Cookie) -> EngineResult<EngineCookie> {
    let mut expires = 0.0;
    let mut is_secure = BOOL::default();
    let mut is_http_only = BOOL::default();
    let mut is_session = BOOL::default();
    unsafe {
        cookie.Expires(&mut expires).engine()?;
        cookie.IsSecure(&mut is_secure).engine()?;
        cookie.IsHttpOnly(&mut is_http_only).engine()?;
        cookie.IsSession(&mut is_session).engine()?;
    }

    Ok(EngineCookie {
        name: take_string(|value| unsafe { cookie.Name(value) })?,
        value: take_string(|value| unsafe { cookie.Value(value) })?,
        domain: take_string(|value| unsafe { cookie.Domain(value) })?,
        path: take_string(|value| unsafe { cookie.Path(value) })?,
        expires,
        is_secure: is_secure.as_bool(),
        is_http_only: is_http_only.as_bool(),
        is_session: is_session.as_bool(),
    })
}
