//! WebView2 implementation of the web view engine traits.
//!
//! Everything here runs on the thread that created the adapter; WebView2
//! delivers its completion handlers and events through that thread's message
//! loop.

#![cfg(windows)]

mod backend;
mod cookies;
mod error;
mod events;
mod session;
mod wide;
mod window;

pub use backend::WebView2Backend;
