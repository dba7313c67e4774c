//! WASM bindings for transpaste.
//!
//! Loading the module sets up console logging; `install` then attaches the
//! document listeners that convert pasted and dropped images to PNG before
//! the host editor sees them.
//!
//! ```js
//! import init, { install, diagnostics } from "transpaste";
//! await init();
//! install({ serializeCycles: true });
//! ```

mod diagnostics;

pub use diagnostics::{DiagnosticCaptureLayer, clear_diagnostics, diagnostics};

use transpaste_browser::InterceptorConfig;
use wasm_bindgen::prelude::*;

/// Initialize panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default()
        .with(wasm_layer)
        .with(DiagnosticCaptureLayer);

    // A host page may already have installed a subscriber.
    let _ = set_global_default(reg);
}

/// Decode `install` options. `undefined` and `null` select the defaults.
pub fn parse_options(options: JsValue) -> Result<InterceptorConfig, serde_wasm_bindgen::Error> {
    if options.is_undefined() || options.is_null() {
        return Ok(InterceptorConfig::default());
    }
    serde_wasm_bindgen::from_value(options)
}

/// Install the interceptor on the current document.
///
/// Returns `false` if it was already installed. Throws if `options` does not
/// describe a valid configuration.
#[wasm_bindgen]
pub fn install(options: JsValue) -> Result<bool, JsError> {
    let config = parse_options(options)
        .map_err(|e| JsError::new(&format!("invalid transpaste options: {e}")))?;
    Ok(transpaste_browser::install(config))
}

/// Whether the interceptor is installed in this page.
#[wasm_bindgen(js_name = isInstalled)]
pub fn is_installed() -> bool {
    transpaste_browser::is_installed()
}
