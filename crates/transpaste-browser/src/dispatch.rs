//! Building and dispatching the replacement event.
//!
//! Events built by script carry their own `target`/`srcElement` once
//! dispatched. Host handlers key off those identity fields, so they are
//! redefined as own properties holding the original event's values.

use wasm_bindgen::JsValue;
use transpaste_core::{
    EventKind, InsertionPlatform, OutputFile, PlatformError, Point, SynthesizedEvent,
    TransferPayload,
};

use crate::dom::{BrowserDom, js_error};

/// Build a `DataTransfer` holding `payload`'s files and effects.
pub fn build_data_transfer(
    payload: &TransferPayload<OutputFile>,
) -> Result<web_sys::DataTransfer, JsValue> {
    let data_transfer = web_sys::DataTransfer::new()?;
    let items = data_transfer.items();
    for item in &payload.items {
        let Some(output) = &item.file else {
            continue;
        };
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(output.bytes.as_slice()));
        let options = web_sys::FilePropertyBag::new();
        options.set_type(&output.mime);
        let file =
            web_sys::File::new_with_u8_array_sequence_and_options(&parts, &output.name, &options)?;
        items.add_with_file(&file)?;
    }
    data_transfer.set_drop_effect(&payload.effects.drop_effect);
    data_transfer.set_effect_allowed(&payload.effects.effect_allowed);
    Ok(data_transfer)
}

/// Build the DOM event described by `synthesized`, identity fields excluded.
pub fn build_event(synthesized: &SynthesizedEvent<BrowserDom>) -> Result<web_sys::Event, JsValue> {
    let data_transfer = build_data_transfer(&synthesized.payload)?;
    let flags = synthesized.flags;

    match &synthesized.kind {
        EventKind::Drop => {
            let init = web_sys::DragEventInit::new();
            init.set_bubbles(flags.bubbles);
            init.set_cancelable(flags.cancelable);
            init.set_composed(flags.composed);
            let Point { x, y } = synthesized.point.unwrap_or_default();
            init.set_client_x(x);
            init.set_client_y(y);
            init.set_data_transfer(Some(&data_transfer));
            if let Some(capabilities) = &synthesized.source_capabilities {
                js_sys::Reflect::set(&init, &JsValue::from_str("sourceCapabilities"), capabilities)?;
            }
            let event = web_sys::DragEvent::new_with_event_init_dict("drop", &init)?;
            Ok(event.into())
        }
        EventKind::Paste => {
            let init = web_sys::ClipboardEventInit::new();
            init.set_bubbles(flags.bubbles);
            init.set_cancelable(flags.cancelable);
            init.set_composed(flags.composed);
            init.set_clipboard_data(Some(&data_transfer));
            let event = web_sys::ClipboardEvent::new_with_event_init_dict("paste", &init)?;
            Ok(event.into())
        }
        EventKind::Other(kind) => Err(JsValue::from_str(&format!(
            "cannot build a `{kind}` event"
        ))),
    }
}

/// Redefine `name` on `event` as an own, read-only property holding `value`.
pub fn force_property(event: &web_sys::Event, name: &str, value: &JsValue) -> Result<(), JsValue> {
    let descriptor = js_sys::Object::new();
    js_sys::Reflect::set(&descriptor, &JsValue::from_str("value"), value)?;
    js_sys::Reflect::set(&descriptor, &JsValue::from_str("configurable"), &JsValue::TRUE)?;
    let defined = js_sys::Reflect::define_property(event, &JsValue::from_str(name), &descriptor)?;
    if defined {
        Ok(())
    } else {
        Err(JsValue::from_str(&format!("could not redefine `{name}`")))
    }
}

/// Platform backed by a live document.
#[derive(Debug, Clone)]
pub struct BrowserPlatform {
    document: web_sys::Document,
}

impl BrowserPlatform {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

impl InsertionPlatform for BrowserPlatform {
    type Dom = BrowserDom;

    fn prevent_default(&self, event: &web_sys::Event) {
        event.prevent_default();
    }

    fn element_from_point(&self, point: Point) -> Option<web_sys::EventTarget> {
        self.document
            .element_from_point(point.x as f32, point.y as f32)
            .map(Into::into)
    }

    fn active_element(&self) -> Option<web_sys::EventTarget> {
        self.document.active_element().map(Into::into)
    }

    fn dispatch(
        &self,
        target: &web_sys::EventTarget,
        event: SynthesizedEvent<BrowserDom>,
    ) -> Result<(), PlatformError> {
        let built = build_event(&event).map_err(js_error)?;
        if let Some(original) = &event.target {
            force_property(&built, "target", original).map_err(js_error)?;
        }
        if let Some(original) = &event.src_element {
            force_property(&built, "srcElement", original).map_err(js_error)?;
        }

        let not_cancelled = target.dispatch_event(&built).map_err(js_error)?;
        tracing::debug!(
            kind = %event.kind,
            files = event.payload.len(),
            not_cancelled,
            "dispatched synthesized event"
        );
        Ok(())
    }
}
