//! Browser handles for the core `Dom` type family.

use std::future::Future;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use transpaste_core::{Dom, PlatformError, SourceFile};

/// The live browser document.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDom;

impl Dom for BrowserDom {
    type Element = web_sys::EventTarget;
    type File = BrowserFile;
    /// `UIEvent.sourceCapabilities`, kept opaque.
    type Capabilities = JsValue;
    type Event = web_sys::Event;
}

/// A `File` taken out of a `DataTransferItem`.
///
/// The name is read eagerly: the item list is cleared once the event handler
/// returns, but the `File` object itself stays readable.
#[derive(Debug, Clone)]
pub struct BrowserFile {
    name: String,
    file: web_sys::File,
}

impl BrowserFile {
    pub fn new(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            file,
        }
    }

    pub fn inner(&self) -> &web_sys::File {
        &self.file
    }
}

impl SourceFile for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, PlatformError>> {
        let promise = self.file.array_buffer();
        async move {
            let buffer = JsFuture::from(promise).await.map_err(js_error)?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }
    }
}

/// Stringify a thrown JS value for diagnostics.
pub fn js_error(value: JsValue) -> PlatformError {
    match value.as_string() {
        Some(message) => PlatformError(message),
        None => PlatformError(format!("{:?}", value)),
    }
}
