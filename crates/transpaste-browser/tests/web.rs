//! WASM browser tests for transpaste-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use transpaste_browser::{
    BrowserDom, BrowserPlatform, CanvasCodec, EventFlags, EventKind, IgnoreReason, ImageCodec,
    ImageFormat, InsertionPlatform, Interception, Interceptor, InterceptorConfig, ItemKind,
    OutputFile, Point, SmolStr, SynthesizedEvent, TransferEffects, TransferItem, TransferPayload,
    build_data_transfer, build_event, capture_paste, force_property,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn document() -> web_sys::Document {
    gloo_utils::document()
}

fn output_payload(names: &[&str]) -> TransferPayload<OutputFile> {
    TransferPayload::with_items(
        names
            .iter()
            .map(|name| {
                TransferItem::file(
                    "image/png",
                    OutputFile {
                        name: name.to_string(),
                        mime: SmolStr::new_static("image/png"),
                        bytes: PNG_SIGNATURE.to_vec(),
                    },
                )
            })
            .collect(),
    )
}

fn synthesized(
    kind: EventKind,
    payload: TransferPayload<OutputFile>,
    target: Option<web_sys::EventTarget>,
) -> SynthesizedEvent<BrowserDom> {
    let composed = kind == EventKind::Paste;
    SynthesizedEvent {
        point: (kind == EventKind::Drop).then(|| Point::new(12, 34)),
        kind,
        flags: EventFlags {
            bubbles: true,
            cancelable: true,
            composed,
        },
        payload,
        source_capabilities: None,
        src_element: target.clone(),
        target,
    }
}

fn append_div(id: &str) -> web_sys::HtmlElement {
    let doc = document();
    let div: web_sys::HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    div.set_id(id);
    doc.body().unwrap().append_child(&div).unwrap();
    div
}

// === Payload building ===

#[wasm_bindgen_test]
fn test_data_transfer_keeps_order_and_names() {
    let dt = build_data_transfer(&output_payload(&["a.png", "b.png"])).unwrap();
    let files = dt.files().unwrap();
    assert_eq!(files.length(), 2);
    assert_eq!(files.get(0).unwrap().name(), "a.png");
    assert_eq!(files.get(1).unwrap().name(), "b.png");
    assert_eq!(files.get(0).unwrap().type_(), "image/png");
}

#[wasm_bindgen_test]
fn test_build_drop_event() {
    let mut payload = output_payload(&["a.png"]);
    payload.effects = TransferEffects::new("copy", "all");
    let event = build_event(&synthesized(EventKind::Drop, payload, None)).unwrap();

    let drag: web_sys::DragEvent = event.dyn_into().unwrap();
    assert_eq!(drag.type_(), "drop");
    assert!(drag.bubbles());
    assert!(drag.cancelable());
    assert_eq!(drag.client_x(), 12);
    assert_eq!(drag.client_y(), 34);
    let dt = drag.data_transfer().unwrap();
    assert_eq!(dt.files().unwrap().length(), 1);
    assert_eq!(dt.drop_effect(), "copy");
}

#[wasm_bindgen_test]
fn test_build_paste_event() {
    let event = build_event(&synthesized(EventKind::Paste, output_payload(&["a.png"]), None)).unwrap();

    let clipboard: web_sys::ClipboardEvent = event.dyn_into().unwrap();
    assert_eq!(clipboard.type_(), "paste");
    assert!(clipboard.bubbles());
    assert!(clipboard.cancelable());
    assert!(clipboard.composed());
    let dt = clipboard.clipboard_data().unwrap();
    assert_eq!(dt.files().unwrap().get(0).unwrap().name(), "a.png");
}

#[wasm_bindgen_test]
fn test_build_unknown_kind_fails() {
    let event = synthesized(
        EventKind::from_event_type("dragend"),
        output_payload(&[]),
        None,
    );
    assert!(build_event(&event).is_err());
}

// === Identity fields ===

#[wasm_bindgen_test]
fn test_force_target() {
    let div = append_div("force-target");
    let event = web_sys::Event::new("paste").unwrap();
    force_property(&event, "target", &div).unwrap();

    let target = js_sys::Reflect::get(&event, &JsValue::from_str("target")).unwrap();
    assert_eq!(target, JsValue::from(div));
}

#[wasm_bindgen_test]
fn test_dispatch_reports_original_target() {
    let original = append_div("original-target");
    let resolved = append_div("resolved-target");

    let seen: Rc<RefCell<Vec<(JsValue, u32)>>> = Rc::new(RefCell::new(Vec::new()));
    let listener = {
        let seen = seen.clone();
        gloo_events::EventListener::new(&resolved, "paste", move |event| {
            let target = js_sys::Reflect::get(event, &JsValue::from_str("target")).unwrap();
            let files = event
                .dyn_ref::<web_sys::ClipboardEvent>()
                .and_then(|e| e.clipboard_data())
                .and_then(|dt| dt.files())
                .map(|files| files.length())
                .unwrap_or(0);
            seen.borrow_mut().push((target, files));
        })
    };

    let platform = BrowserPlatform::new(document());
    let event = synthesized(
        EventKind::Paste,
        output_payload(&["x.png"]),
        Some(original.clone().into()),
    );
    platform.dispatch(&resolved.clone().into(), event).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, JsValue::from(original));
    assert_eq!(seen[0].1, 1);
    drop(listener);
}

// === Capture ===

#[wasm_bindgen_test]
fn test_capture_reads_items_and_trust() {
    let event = build_event(&synthesized(EventKind::Paste, output_payload(&["a.png"]), None)).unwrap();
    let clipboard: web_sys::ClipboardEvent = event.dyn_into().unwrap();

    let input = capture_paste(&clipboard);
    assert_eq!(input.kind, EventKind::Paste);
    assert!(!input.trusted);
    assert_eq!(input.point, None);
    let payload = input.payload.unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload.items[0].kind, ItemKind::File);
    assert_eq!(payload.items[0].declared_type, "image/png");
    assert!(payload.items[0].file.is_some());
}

#[wasm_bindgen_test]
fn test_synthesized_events_are_not_reintercepted() {
    let doc = document();
    let interceptor = Interceptor::new(
        BrowserPlatform::new(doc.clone()),
        CanvasCodec::new(doc),
        InterceptorConfig::default(),
    );
    let event = build_event(&synthesized(EventKind::Paste, output_payload(&["a.png"]), None)).unwrap();
    let clipboard: web_sys::ClipboardEvent = event.dyn_into().unwrap();

    let outcome = interceptor.intercept(capture_paste(&clipboard)).unwrap();
    assert!(matches!(outcome, Interception::Ignored(IgnoreReason::Untrusted)));
    assert!(!clipboard.default_prevented());
}

// === Canvas codec ===

#[wasm_bindgen_test]
async fn test_canvas_codec_svg_to_png() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="3"><rect width="4" height="3" fill="#0000ff"/></svg>"##;
    let codec = CanvasCodec::new(document());

    let canvas = codec.decode(svg.to_vec(), ImageFormat::Svg).await.unwrap();
    assert_eq!(codec.dimensions(&canvas), (4, 3));

    let png = codec.encode_png(canvas).await.unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
}

#[wasm_bindgen_test]
async fn test_canvas_codec_rejects_garbage() {
    let codec = CanvasCodec::new(document());
    let result = codec.decode(b"not an image".to_vec(), ImageFormat::WebP).await;
    assert!(result.is_err());
}

#[wasm_bindgen_test]
async fn test_canvas_codec_rejects_oversized_svg() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1000000" height="1000000"/>"#;
    let codec = CanvasCodec::new(document());
    let result = codec.decode(svg.to_vec(), ImageFormat::Svg).await;
    assert!(result.is_err());
}
