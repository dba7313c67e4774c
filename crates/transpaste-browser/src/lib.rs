//! Browser DOM layer for transpaste.
//!
//! This crate connects `transpaste-core` to a live document. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `Dom` type family and `File` handles
//! - `events`: reading `drop`/`paste` events into the core model
//! - `canvas`: `<img>` + `<canvas>` image codec
//! - `dispatch`: building, re-identifying and dispatching replacement events
//! - `listener`: page-lifetime document listeners and cycle scheduling
//!
//! # Re-exports
//!
//! This crate re-exports `transpaste-core` for convenience, so consumers
//! only need to depend on `transpaste-browser`.

// Re-export core crate
pub use transpaste_core;
pub use transpaste_core::*;

pub mod canvas;
pub mod dispatch;
pub mod dom;
pub mod events;
pub mod listener;

pub use canvas::CanvasCodec;
pub use dispatch::{BrowserPlatform, build_data_transfer, build_event, force_property};
pub use dom::{BrowserDom, BrowserFile, js_error};
pub use events::{capture, capture_drop, capture_paste, read_transfer};
pub use listener::{BrowserInterceptor, Scheduler, install, is_installed};
