//! Hosts one web view, navigates it, and logs everything it reports.
//!
//! Usage: `webview-demo [URL]`. Set `RUST_LOG` to adjust verbosity.

#[cfg(windows)]
fn main() -> windows::core::Result<()> {
    demo::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("webview-demo requires Windows");
}

#[cfg(windows)]
mod demo {
    use serde_json::Value;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;
    use tracing::{error, info};
    use tracing_subscriber::EnvFilter;
    use webview_window_core::{
        MethodChannel, MethodResponse, ReplyHandler, WebViewAdapter, WebViewConfig,
    };
    use webview_window_webview2::WebView2Backend;
    use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, MSG, PostQuitMessage, TranslateMessage,
    };

    const DEFAULT_URL: &str = "https://example.com/";

    /// Logs notifications, approves every navigation and quits once a page loads.
    struct LoggingChannel;

    impl MethodChannel for LoggingChannel {
        fn invoke_method(&self, method: &str, arguments: Value, reply: Option<ReplyHandler>) {
            info!(method, %arguments, "notification");
            if method == "onNavigationCompleted" {
                unsafe { PostQuitMessage(0) };
            }
            if let Some(reply) = reply {
                reply(MethodResponse::Success(Value::Bool(true)));
            }
        }
    }

    pub fn run() -> windows::core::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();

        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.ok()?;

        let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
        let data_dir = std::env::temp_dir().join("webview-demo");
        let config = load_config(&data_dir);

        let slot: Rc<RefCell<Option<WebViewAdapter>>> = Rc::new(RefCell::new(None));
        let created = slot.clone();
        let adapter = WebViewAdapter::new(
            &WebView2Backend::new(),
            Rc::new(LoggingChannel),
            1,
            &data_dir,
            &config,
            move |code| {
                info!(%code, "web view created");
                if !code.is_success() {
                    unsafe { PostQuitMessage(1) };
                    return;
                }
                if let Some(adapter) = created.borrow().as_ref() {
                    adapter.navigate(&url);
                }
            },
        );
        *slot.borrow_mut() = Some(adapter);

        pump_messages();
        drop(slot.borrow_mut().take());
        Ok(())
    }

    fn load_config(data_dir: &Path) -> WebViewConfig {
        let path = WebViewConfig::path(data_dir);
        WebViewConfig::load(&path).unwrap_or_else(|err| {
            error!(%err, path = %path.display(), "invalid config, using defaults");
            WebViewConfig::default()
        })
    }

    fn pump_messages() {
        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}
