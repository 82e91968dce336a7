use crate::error::IntoEngine;
use std::ffi::OsStr;
use std::iter;
use std::os::windows::ffi::OsStrExt;
use webview_window_core::EngineResult;
use webview_window_core::encoding::{from_wide, to_wide};
use windows::Win32::System::Com::CoTaskMemFree;
use windows::core::{PCWSTR, PWSTR};

/// Null-terminated UTF-16 buffer that outlives the engine call it is passed to.
pub(crate) struct WideString(Vec<u16>);

impl WideString {
    pub(crate) fn new(s: &str) -> Self {
        Self(to_wide(s))
    }

    pub(crate) fn from_os_str(s: &OsStr) -> Self {
        Self(s.encode_wide().chain(iter::once(0)).collect())
    }

    pub(crate) fn as_pcwstr(&self) -> PCWSTR {
        PCWSTR(self.0.as_ptr())
    }
}

/// Reads a string out-parameter allocated by the engine and frees it.
///
/// Invalid UTF-16 is an error rather than being replaced.
pub(crate) fn take_string(
    read: impl FnOnce(*mut PWSTR) -> windows::core::Result<()>,
) -> EngineResult<String> {
    let mut value = PWSTR::null();
    read(&mut value).engine()?;
    if value.is_null() {
        return Ok(String::new());
    }

    let decoded = from_wide(unsafe { value.as_wide() });
    unsafe { CoTaskMemFree(Some(value.0 as *const _)) };
    Ok(decoded?)
}
