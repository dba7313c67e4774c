//! Reading browser insertion events into the core model.
//!
//! Everything is copied out synchronously: a `DataTransfer` handed to a
//! `drop` or `paste` listener is emptied as soon as the listener returns.

use wasm_bindgen::{JsCast, JsValue};
use transpaste_core::{
    EventFlags, EventKind, InputEvent, ItemKind, Point, SmolStr, TransferEffects, TransferItem,
    TransferPayload,
};

use crate::dom::{BrowserDom, BrowserFile};

/// Snapshot a `DataTransfer`: items in order, files materialized, effects.
pub fn read_transfer(data_transfer: &web_sys::DataTransfer) -> TransferPayload<BrowserFile> {
    let list = data_transfer.items();
    let mut items = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        let Some(item) = list.get(index) else {
            continue;
        };
        let kind = ItemKind::from_kind_str(&item.kind());
        let file = match kind {
            ItemKind::File => item.get_as_file().ok().flatten().map(BrowserFile::new),
            ItemKind::Other => None,
        };
        items.push(TransferItem {
            kind,
            declared_type: SmolStr::new(item.type_()),
            file,
        });
    }

    TransferPayload {
        items,
        effects: TransferEffects::new(data_transfer.drop_effect(), data_transfer.effect_allowed()),
    }
}

/// Read a `drop` event.
pub fn capture_drop(event: &web_sys::DragEvent) -> InputEvent<BrowserDom> {
    let base: &web_sys::Event = event.as_ref();
    InputEvent {
        kind: EventKind::from_event_type(&base.type_()),
        trusted: base.is_trusted(),
        flags: flags_of(base),
        point: Some(Point::new(event.client_x(), event.client_y())),
        target: base.target(),
        src_element: src_element_of(base),
        payload: event.data_transfer().as_ref().map(read_transfer),
        source_capabilities: source_capabilities_of(base),
        document_url: document_url_of(base),
        raw: base.clone(),
    }
}

/// Read a `paste` event.
pub fn capture_paste(event: &web_sys::ClipboardEvent) -> InputEvent<BrowserDom> {
    let base: &web_sys::Event = event.as_ref();
    InputEvent {
        kind: EventKind::from_event_type(&base.type_()),
        trusted: base.is_trusted(),
        flags: flags_of(base),
        point: None,
        target: base.target(),
        src_element: src_element_of(base),
        payload: event.clipboard_data().as_ref().map(read_transfer),
        source_capabilities: None,
        document_url: document_url_of(base),
        raw: base.clone(),
    }
}

/// Read any event that reached a drop or paste listener.
///
/// Returns `None` if the event is neither a `DragEvent` nor a
/// `ClipboardEvent`.
pub fn capture(event: &web_sys::Event) -> Option<InputEvent<BrowserDom>> {
    if let Some(drag) = event.dyn_ref::<web_sys::DragEvent>() {
        Some(capture_drop(drag))
    } else {
        event
            .dyn_ref::<web_sys::ClipboardEvent>()
            .map(capture_paste)
    }
}

fn flags_of(event: &web_sys::Event) -> EventFlags {
    EventFlags {
        bubbles: event.bubbles(),
        cancelable: event.cancelable(),
        composed: event.composed(),
    }
}

/// Legacy `srcElement` alias of `target`; some host handlers still read it.
fn src_element_of(event: &web_sys::Event) -> Option<web_sys::EventTarget> {
    js_sys::Reflect::get(event, &JsValue::from_str("srcElement"))
        .ok()
        .and_then(|value| value.dyn_into::<web_sys::EventTarget>().ok())
}

fn source_capabilities_of(event: &web_sys::Event) -> Option<JsValue> {
    js_sys::Reflect::get(event, &JsValue::from_str("sourceCapabilities"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// URL of the document owning the event target, falling back to the
/// document this script runs in.
fn document_url_of(event: &web_sys::Event) -> String {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
        .and_then(|node| node.owner_document())
        .or_else(|| web_sys::window().and_then(|w| w.document()))
        .and_then(|document| document.url().ok())
        .unwrap_or_default()
}
