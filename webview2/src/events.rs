//! Event argument wrappers.

use crate::error::IntoEngine;
use crate::wide::take_string;
use webview2_com::Microsoft::Web::WebView2::Win32::{
    ICoreWebView2NavigationStartingEventArgs, ICoreWebView2NewWindowRequestedEventArgs,
    ICoreWebView2WebMessageReceivedEventArgs,
};
use webview_window_core::EngineResult;
use webview_window_core::engine::{NavigationStarting, NewWindowRequest, WebMessage};

pub(crate) struct NavigationStartingArgs(pub(crate) ICoreWebView2NavigationStartingEventArgs);

impl NavigationStarting for NavigationStartingArgs {
    fn uri(&self) -> EngineResult<String> {
        take_string(|value| unsafe { self.0.Uri(value) })
    }

    fn set_cancel(&self, cancel: bool) -> EngineResult<()> {
        unsafe { self.0.SetCancel(cancel) }.engine()
    }
}

pub(crate) struct NewWindowRequestedArgs(pub(crate) ICoreWebView2NewWindowRequestedEventArgs);

impl NewWindowRequest for NewWindowRequestedArgs {
    fn uri(&self) -> EngineResult<String> {
        take_string(|value| unsafe { self.0.Uri(value) })
    }

    fn set_handled(&self, handled: bool) -> EngineResult<()> {
        unsafe { self.0.SetHandled(handled) }.engine()
    }
}

pub(crate) struct WebMessageReceivedArgs(pub(crate) ICoreWebView2WebMessageReceivedEventArgs);

impl WebMessage for WebMessageReceivedArgs {
    fn try_get_as_string(&self) -> EngineResult<String> {
        take_string(|value| unsafe { self.0.TryGetWebMessageAsString(value) })
    }

    fn as_json(&self) -> EngineResult<String> {
        take_string(|value| unsafe { self.0.WebMessageAsJson(value) })
    }
}
