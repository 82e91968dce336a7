//! `ICoreWebView2` behind the engine `Session` trait.

use crate::cookies::WebView2CookieManager;
use crate::error::{IntoEngine, windows_error};
use crate::events::{NavigationStartingArgs, NewWindowRequestedArgs, WebMessageReceivedArgs};
use crate::wide::{WideString, take_string};
use std::rc::Rc;
use tracing::warn;
use webview2_com::Microsoft::Web::WebView2::Win32::{
    ICoreWebView2, ICoreWebView2_2, ICoreWebView2NavigationStartingEventArgs,
    ICoreWebView2NewWindowRequestedEventArgs, ICoreWebView2Settings, ICoreWebView2Settings2,
    ICoreWebView2WebMessageReceivedEventArgs,
};
use webview2_com::{
    AddScriptToExecuteOnDocumentCreatedCompletedHandler, ContentLoadingEventHandler,
    ExecuteScriptCompletedHandler, HistoryChangedEventHandler, NavigationCompletedEventHandler,
    NavigationStartingEventHandler, NewWindowRequestedEventHandler,
    WebMessageReceivedEventHandler,
};
use webview_window_core::EngineResult;
use webview_window_core::engine::{
    ContentLoadingHandler, CookieManager, EventToken, HistoryChangedHandler,
    NavigationCompletedHandler, NavigationStartingHandler, NewWindowRequestedHandler,
    ScriptCompleted, Session, Settings, UserAgentSettings, WebMessageReceivedHandler,
};
use windows::core::{BOOL, Interface};

pub(crate) struct WebView2Session {
    webview: ICoreWebView2,
}

impl WebView2Session {
    pub(crate) fn new(webview: ICoreWebView2) -> Self {
        Self { webview }
    }
}

impl Session for WebView2Session {
    fn settings(&self) -> EngineResult<Box<dyn Settings>> {
        let settings = unsafe { self.webview.Settings() }.engine()?;
        Ok(Box::new(WebView2Settings::new(settings)))
    }

    fn navigate(&self, url: &str) -> EngineResult<()> {
        let url = WideString::new(url);
        unsafe { self.webview.Navigate(url.as_pcwstr()) }.engine()
    }

    fn add_script_to_execute_on_document_created(&self, script: &str) -> EngineResult<()> {
        let script = WideString::new(script);
        let handler = AddScriptToExecuteOnDocumentCreatedCompletedHandler::create(Box::new(
            |result: windows::core::Result<()>, _id: String| {
                if let Err(err) = result {
                    warn!(%err, "document-created script was not added");
                }
                Ok(())
            },
        ));
        unsafe {
            self.webview
                .AddScriptToExecuteOnDocumentCreated(script.as_pcwstr(), &handler)
        }
        .engine()
    }

    fn go_back(&self) -> EngineResult<()> {
        unsafe { self.webview.GoBack() }.engine()
    }

    fn go_forward(&self) -> EngineResult<()> {
        unsafe { self.webview.GoForward() }.engine()
    }

    fn reload(&self) -> EngineResult<()> {
        unsafe { self.webview.Reload() }.engine()
    }

    fn stop(&self) -> EngineResult<()> {
        unsafe { self.webview.Stop() }.engine()
    }

    fn can_go_back(&self) -> EngineResult<bool> {
        let mut value = BOOL::default();
        unsafe { self.webview.CanGoBack(&mut value) }.engine()?;
        Ok(value.as_bool())
    }

    fn can_go_forward(&self) -> EngineResult<bool> {
        let mut value = BOOL::default();
        unsafe { self.webview.CanGoForward(&mut value) }.engine()?;
        Ok(value.as_bool())
    }

    fn open_dev_tools_window(&self) -> EngineResult<()> {
        unsafe { self.webview.OpenDevToolsWindow() }.engine()
    }

    fn execute_script(&self, script: &str, on_completed: ScriptCompleted) -> EngineResult<()> {
        let script = WideString::new(script);
        let handler = ExecuteScriptCompletedHandler::create(Box::new(
            move |result: windows::core::Result<()>, json: String| {
                on_completed(result.engine().map(|()| json));
                Ok(())
            },
        ));
        unsafe { self.webview.ExecuteScript(script.as_pcwstr(), &handler) }.engine()
    }

    fn post_web_message_as_string(&self, message: &str) -> EngineResult<()> {
        let message = WideString::new(message);
        unsafe { self.webview.PostWebMessageAsString(message.as_pcwstr()) }.engine()
    }

    fn post_web_message_as_json(&self, message: &str) -> EngineResult<()> {
        let message = WideString::new(message);
        unsafe { self.webview.PostWebMessageAsJson(message.as_pcwstr()) }.engine()
    }

    fn cookie_manager(&self) -> Option<Rc<dyn CookieManager>> {
        let webview = self.webview.cast::<ICoreWebView2_2>().ok()?;
        let manager = unsafe { webview.CookieManager() }.ok()?;
        Some(Rc::new(WebView2CookieManager::new(manager)))
    }

    fn add_new_window_requested(
        &self,
        mut handler: NewWindowRequestedHandler,
    ) -> EngineResult<EventToken> {
        let handler = NewWindowRequestedEventHandler::create(Box::new(
            move |_sender, args: Option<ICoreWebView2NewWindowRequestedEventArgs>| {
                let Some(args) = args else { return Ok(()) };
                handler(&NewWindowRequestedArgs(args)).map_err(windows_error)
            },
        ));
        let mut token = 0i64;
        unsafe { self.webview.add_NewWindowRequested(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }

    fn add_content_loading(&self, mut handler: ContentLoadingHandler) -> EngineResult<EventToken> {
        let handler = ContentLoadingEventHandler::create(Box::new(move |_sender, _args| {
            handler().map_err(windows_error)
        }));
        let mut token = 0i64;
        unsafe { self.webview.add_ContentLoading(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }

    fn add_history_changed(&self, mut handler: HistoryChangedHandler) -> EngineResult<EventToken> {
        let handler = HistoryChangedEventHandler::create(Box::new(move |_sender, _args| {
            handler().map_err(windows_error)
        }));
        let mut token = 0i64;
        unsafe { self.webview.add_HistoryChanged(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }

    fn add_navigation_starting(
        &self,
        mut handler: NavigationStartingHandler,
    ) -> EngineResult<EventToken> {
        let handler = NavigationStartingEventHandler::create(Box::new(
            move |_sender, args: Option<ICoreWebView2NavigationStartingEventArgs>| {
                let Some(args) = args else { return Ok(()) };
                handler(&NavigationStartingArgs(args)).map_err(windows_error)
            },
        ));
        let mut token = 0i64;
        unsafe { self.webview.add_NavigationStarting(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }

    fn add_navigation_completed(
        &self,
        mut handler: NavigationCompletedHandler,
    ) -> EngineResult<EventToken> {
        let handler = NavigationCompletedEventHandler::create(Box::new(move |_sender, _args| {
            handler().map_err(windows_error)
        }));
        let mut token = 0i64;
        unsafe { self.webview.add_NavigationCompleted(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }

    fn add_web_message_received(
        &self,
        mut handler: WebMessageReceivedHandler,
    ) -> EngineResult<EventToken> {
        let handler = WebMessageReceivedEventHandler::create(Box::new(
            move |_sender, args: Option<ICoreWebView2WebMessageReceivedEventArgs>| {
                let Some(args) = args else { return Ok(()) };
                handler(&WebMessageReceivedArgs(args)).map_err(windows_error)
            },
        ));
        let mut token = 0i64;
        unsafe { self.webview.add_WebMessageReceived(&handler, &mut token) }.engine()?;
        Ok(EventToken(token))
    }
}

struct WebView2Settings {
    settings: ICoreWebView2Settings,
    user_agent: Option<WebView2UserAgent>,
}

impl WebView2Settings {
    fn new(settings: ICoreWebView2Settings) -> Self {
        let user_agent = settings
            .cast::<ICoreWebView2Settings2>()
            .ok()
            .map(WebView2UserAgent);
        Self {
            settings,
            user_agent,
        }
    }
}

impl Settings for WebView2Settings {
    fn set_script_enabled(&self, enabled: bool) -> EngineResult<()> {
        unsafe { self.settings.SetIsScriptEnabled(enabled) }.engine()
    }

    fn set_zoom_control_enabled(&self, enabled: bool) -> EngineResult<()> {
        unsafe { self.settings.SetIsZoomControlEnabled(enabled) }.engine()
    }

    fn set_default_context_menus_enabled(&self, enabled: bool) -> EngineResult<()> {
        unsafe { self.settings.SetAreDefaultContextMenusEnabled(enabled) }.engine()
    }

    fn set_status_bar_enabled(&self, enabled: bool) -> EngineResult<()> {
        unsafe { self.settings.SetIsStatusBarEnabled(enabled) }.engine()
    }

    fn set_web_message_enabled(&self, enabled: bool) -> EngineResult<()> {
        unsafe { self.settings.SetIsWebMessageEnabled(enabled) }.engine()
    }

    fn user_agent_settings(&self) -> Option<&dyn UserAgentSettings> {
        self.user_agent
            .as_ref()
            .map(|user_agent| user_agent as &dyn UserAgentSettings)
    }
}

struct WebView2UserAgent(ICoreWebView2Settings2);

impl UserAgentSettings for WebView2UserAgent {
    fn user_agent(&self) -> EngineResult<String> {
        take_string(|value| unsafe { self.0.UserAgent(value) })
    }

    fn set_user_agent(&self, user_agent: &str) -> EngineResult<()> {
        let user_agent = WideString::new(user_agent);
        unsafe { self.0.SetUserAgent(user_agent.as_pcwstr()) }.engine()
    }
}
