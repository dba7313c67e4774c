//! Image codec backed by the browser's own decoders.
//!
//! Bytes are loaded into an `<img>` through an object URL, drawn onto a fresh
//! `<canvas>` of the image's natural size, and read back with `toBlob`. This
//! path handles every format the browser can display, SVG included; an SVG
//! renders at its own declared size.

use std::future::Future;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use transpaste_core::{CANONICAL_MIME, CodecError, ImageCodec, ImageFormat, check_dimensions};

use crate::dom::js_error;

#[derive(Debug, Clone)]
pub struct CanvasCodec {
    document: web_sys::Document,
}

impl CanvasCodec {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl ImageCodec for CanvasCodec {
    type Surface = web_sys::HtmlCanvasElement;

    fn decode(
        &self,
        bytes: Vec<u8>,
        format: ImageFormat,
    ) -> impl Future<Output = Result<web_sys::HtmlCanvasElement, CodecError>> {
        let document = self.document.clone();
        async move {
            let image = load_image(&bytes, format.mime())
                .await
                .map_err(|e| CodecError::Decode(js_error(e).0))?;
            check_dimensions(image.natural_width(), image.natural_height())?;
            draw_to_canvas(&document, &image).map_err(|e| CodecError::Decode(js_error(e).0))
        }
    }

    fn dimensions(&self, surface: &web_sys::HtmlCanvasElement) -> (u32, u32) {
        (surface.width(), surface.height())
    }

    fn encode_png(
        &self,
        surface: web_sys::HtmlCanvasElement,
    ) -> impl Future<Output = Result<Vec<u8>, CodecError>> {
        async move {
            canvas_to_png(&surface)
                .await
                .map_err(|e| CodecError::Encode(js_error(e).0))
        }
    }
}

/// Decode `bytes` into an `<img>` element.
pub async fn load_image(bytes: &[u8], mime: &str) -> Result<web_sys::HtmlImageElement, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let image = web_sys::HtmlImageElement::new()?;
    image.set_src(&url);
    let decoded = JsFuture::from(image.decode()).await;
    web_sys::Url::revoke_object_url(&url)?;
    decoded?;
    Ok(image)
}

/// Draw `image` onto a new canvas sized to its natural dimensions.
pub fn draw_to_canvas(
    document: &web_sys::Document,
    image: &web_sys::HtmlImageElement,
) -> Result<web_sys::HtmlCanvasElement, JsValue> {
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("canvas element has unexpected type"))?;
    canvas.set_width(image.natural_width());
    canvas.set_height(image.natural_height());

    let context: web_sys::CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("2d context has unexpected type"))?;
    context.draw_image_with_html_image_element(image, 0.0, 0.0)?;
    Ok(canvas)
}

/// Encode a canvas as PNG bytes.
pub async fn canvas_to_png(canvas: &web_sys::HtmlCanvasElement) -> Result<Vec<u8>, JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let on_error = reject.clone();
        let callback = Closure::once_into_js(move |blob: JsValue| {
            if blob.is_null() {
                let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("toBlob produced no blob"));
            } else {
                let _ = resolve.call1(&JsValue::NULL, &blob);
            }
        });
        if let Err(e) = canvas.to_blob_with_type(callback.unchecked_ref(), CANONICAL_MIME) {
            let _ = on_error.call1(&JsValue::NULL, &e);
        }
    });

    let blob: web_sys::Blob = JsFuture::from(promise).await?.dyn_into()?;
    let buffer = JsFuture::from(blob.array_buffer()).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
