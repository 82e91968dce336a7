//! Message-only child window the controller is bound to.

use crate::error::IntoEngine;
use crate::wide::WideString;
use std::ffi::c_void;
use std::sync::OnceLock;
use tracing::{debug, warn};
use webview_window_core::EngineResult;
use webview_window_core::engine::{Bounds, ChildWindow, WindowHandle};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, HWND_MESSAGE, RegisterClassW,
    WINDOW_EX_STYLE, WNDCLASSW, WS_CHILD, WS_VISIBLE,
};
use windows::core::PCWSTR;

/// Class name registered by the first window of the process.
static WINDOW_CLASS: OnceLock<WideString> = OnceLock::new();

pub(crate) struct MessageWindow {
    hwnd: HWND,
}

impl MessageWindow {
    pub(crate) fn create(class_name: &str) -> EngineResult<Self> {
        unsafe {
            let instance: HINSTANCE = GetModuleHandleW(None).engine()?.into();
            let class = WINDOW_CLASS.get_or_init(|| register_class(instance, class_name));

            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                class.as_pcwstr(),
                PCWSTR::null(),
                WS_CHILD | WS_VISIBLE,
                0,
                0,
                0,
                0,
                Some(HWND_MESSAGE),
                None,
                Some(instance),
                None,
            )
            .engine()?;
            Ok(Self { hwnd })
        }
    }
}

fn register_class(instance: HINSTANCE, class_name: &str) -> WideString {
    let class = WideString::new(class_name);
    let wc = WNDCLASSW {
        lpfnWndProc: Some(wndproc),
        hInstance: instance,
        lpszClassName: class.as_pcwstr(),
        ..Default::default()
    };

    let atom = unsafe { RegisterClassW(&wc) };
    if atom == 0 {
        warn!(class_name, "window class registration failed");
    } else {
        debug!(class_name, "window class registered");
    }
    class
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

impl ChildWindow for MessageWindow {
    fn handle(&self) -> WindowHandle {
        WindowHandle(self.hwnd.0 as isize)
    }

    fn client_rect(&self) -> Bounds {
        let mut rect = RECT::default();
        if let Err(err) = unsafe { GetClientRect(self.hwnd, &mut rect) } {
            warn!(%err, "failed to read client rect");
        }
        Bounds {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        if let Err(err) = unsafe { DestroyWindow(self.hwnd) } {
            warn!(%err, "failed to destroy window");
        }
    }
}

/// Native handle for a window handed back by the core.
pub(crate) fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}
