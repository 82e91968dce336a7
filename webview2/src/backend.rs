//! Environment and controller creation.

use crate::error::IntoEngine;
use crate::session::WebView2Session;
use crate::wide::WideString;
use crate::window::{MessageWindow, hwnd};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;
use webview2_com::Microsoft::Web::WebView2::Win32::{
    CreateCoreWebView2EnvironmentWithOptions, ICoreWebView2Controller, ICoreWebView2Environment,
    ICoreWebView2EnvironmentOptions,
};
use webview2_com::{
    CoreWebView2EnvironmentOptions, CreateCoreWebView2ControllerCompletedHandler,
    CreateCoreWebView2EnvironmentCompletedHandler,
};
use webview_window_core::engine::{
    Backend, Bounds, ChildWindow, Controller, ControllerCompleted, Environment,
    EnvironmentCompleted, Session, WindowHandle,
};
use webview_window_core::{EngineError, EngineResult};
use windows::Win32::Foundation::RECT;
use windows::core::PCWSTR;

/// Creates WebView2 environments using the installed Evergreen runtime.
#[derive(Debug, Default)]
pub struct WebView2Backend;

impl WebView2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for WebView2Backend {
    fn create_child_window(&self, class_name: &str) -> EngineResult<Box<dyn ChildWindow>> {
        Ok(Box::new(MessageWindow::create(class_name)?))
    }

    fn create_environment(
        &self,
        user_data_dir: &Path,
        on_completed: EnvironmentCompleted,
    ) -> EngineResult<()> {
        debug!(user_data_dir = %user_data_dir.display(), "creating environment");
        let folder = WideString::from_os_str(user_data_dir.as_os_str());
        let options: ICoreWebView2EnvironmentOptions =
            CoreWebView2EnvironmentOptions::default().into();

        let handler = CreateCoreWebView2EnvironmentCompletedHandler::create(Box::new(
            move |result: windows::core::Result<()>,
                  environment: Option<ICoreWebView2Environment>| {
                let environment = result
                    .engine()
                    .and_then(|()| environment.ok_or_else(EngineError::no_interface))
                    .map(|environment| {
                        Rc::new(WebView2Environment { environment }) as Rc<dyn Environment>
                    });
                on_completed(environment);
                Ok(())
            },
        ));

        unsafe {
            CreateCoreWebView2EnvironmentWithOptions(
                PCWSTR::null(),
                folder.as_pcwstr(),
                &options,
                &handler,
            )
        }
        .engine()
    }
}

struct WebView2Environment {
    environment: ICoreWebView2Environment,
}

impl Environment for WebView2Environment {
    fn create_controller(
        &self,
        parent: WindowHandle,
        on_completed: ControllerCompleted,
    ) -> EngineResult<()> {
        let handler = CreateCoreWebView2ControllerCompletedHandler::create(Box::new(
            move |result: windows::core::Result<()>,
                  controller: Option<ICoreWebView2Controller>| {
                let controller = result
                    .engine()
                    .and_then(|()| controller.ok_or_else(EngineError::no_interface))
                    .map(|controller| {
                        Rc::new(WebView2Controller { controller }) as Rc<dyn Controller>
                    });
                on_completed(controller);
                Ok(())
            },
        ));

        unsafe {
            self.environment
                .CreateCoreWebView2Controller(hwnd(parent), &handler)
        }
        .engine()
    }
}

struct WebView2Controller {
    controller: ICoreWebView2Controller,
}

impl Controller for WebView2Controller {
    fn session(&self) -> EngineResult<Rc<dyn Session>> {
        let webview = unsafe { self.controller.CoreWebView2() }.engine()?;
        Ok(Rc::new(WebView2Session::new(webview)))
    }

    fn set_bounds(&self, bounds: Bounds) -> EngineResult<()> {
        let rect = RECT {
            left: bounds.left,
            top: bounds.top,
            right: bounds.right,
            bottom: bounds.bottom,
        };
        unsafe { self.controller.SetBounds(rect) }.engine()
    }

    fn close(&self) -> EngineResult<()> {
        unsafe { self.controller.Close() }.engine()
    }
}
