use webview_window_core::{EngineError, EngineResult, StatusCode};
use windows::core::HRESULT;

/// Converts `windows` results into engine results, keeping the HRESULT.
pub(crate) trait IntoEngine<T> {
    fn engine(self) -> EngineResult<T>;
}

impl<T> IntoEngine<T> for windows::core::Result<T> {
    fn engine(self) -> EngineResult<T> {
        self.map_err(|err| EngineError::new(StatusCode(err.code().0)))
    }
}

/// Hands a handler failure back to WebView2.
pub(crate) fn windows_error(err: EngineError) -> windows::core::Error {
    windows::core::Error::from(HRESULT(err.code.0))
}
