//! Shared test fixtures: a recording platform and image builders.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::{Future, ready};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, RgbaImage};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use transpaste_core::{
    CodecError, Dom, EventFlags, EventKind, ImageCodec, ImageFormat, InputEvent,
    InsertionPlatform, PlatformError, Point, RasterCodec, SmolStr, SourceFile, SynthesizedEvent,
    TransferEffects, TransferItem, TransferPayload,
};

pub const DOCS_URL: &str = "https://docs.google.com/document/d/1/edit";
pub const SLIDES_URL: &str = "https://docs.google.com/presentation/d/1/edit";

#[derive(Debug, Clone)]
pub struct MockDom;

impl Dom for MockDom {
    type Element = SmolStr;
    type File = MockFile;
    type Capabilities = bool;
    type Event = u32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MockFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

impl SourceFile for MockFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, PlatformError>> {
        ready(Ok(self.bytes.clone()))
    }
}

/// Records every call the interceptor makes.
#[derive(Default)]
pub struct MockPlatform {
    pub prevented: RefCell<Vec<u32>>,
    pub dispatched: RefCell<Vec<(SmolStr, SynthesizedEvent<MockDom>)>>,
    /// Element hit-test table consulted by `element_from_point`.
    pub layout: RefCell<Vec<(Point, SmolStr)>>,
    pub focused: RefCell<Option<SmolStr>>,
    pub hit_tests: Cell<usize>,
    pub fail_dispatch: Cell<bool>,
}

impl MockPlatform {
    pub fn with_focus(element: &str) -> Self {
        let platform = Self::default();
        platform.focused.replace(Some(SmolStr::new(element)));
        platform
    }

    pub fn with_element_at(point: Point, element: &str) -> Self {
        let platform = Self::default();
        platform.layout.borrow_mut().push((point, SmolStr::new(element)));
        platform
    }

    pub fn prevent_count(&self) -> usize {
        self.prevented.borrow().len()
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatched.borrow().len()
    }
}

impl InsertionPlatform for MockPlatform {
    type Dom = MockDom;

    fn prevent_default(&self, event: &u32) {
        self.prevented.borrow_mut().push(*event);
    }

    fn element_from_point(&self, point: Point) -> Option<SmolStr> {
        self.hit_tests.set(self.hit_tests.get() + 1);
        self.layout
            .borrow()
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, element)| element.clone())
    }

    fn active_element(&self) -> Option<SmolStr> {
        self.focused.borrow().clone()
    }

    fn dispatch(
        &self,
        target: &SmolStr,
        event: SynthesizedEvent<MockDom>,
    ) -> Result<(), PlatformError> {
        if self.fail_dispatch.get() {
            return Err("dispatchEvent threw".into());
        }
        self.dispatched.borrow_mut().push((target.clone(), event));
        Ok(())
    }
}

/// Codec that delays each decode by a scripted number of scheduler turns and
/// records the order in which decodes finish.
pub struct StaggeredCodec {
    inner: RasterCodec,
    delays: RefCell<VecDeque<usize>>,
    next_index: Cell<usize>,
    pub finished: RefCell<Vec<usize>>,
}

impl StaggeredCodec {
    pub fn new(delays: &[usize]) -> Self {
        Self {
            inner: RasterCodec::new(),
            delays: RefCell::new(delays.iter().copied().collect()),
            next_index: Cell::new(0),
            finished: RefCell::new(Vec::new()),
        }
    }
}

impl ImageCodec for StaggeredCodec {
    type Surface = RgbaImage;

    fn decode(
        &self,
        bytes: Vec<u8>,
        format: ImageFormat,
    ) -> impl Future<Output = Result<RgbaImage, CodecError>> {
        let index = self.next_index.get();
        self.next_index.set(index + 1);
        let delay = self.delays.borrow_mut().pop_front().unwrap_or(0);
        async move {
            for _ in 0..delay {
                tokio::task::yield_now().await;
            }
            let surface = self.inner.decode(bytes, format).await;
            self.finished.borrow_mut().push(index);
            surface
        }
    }

    fn dimensions(&self, surface: &RgbaImage) -> (u32, u32) {
        self.inner.dimensions(surface)
    }

    fn encode_png(&self, surface: RgbaImage) -> impl Future<Output = Result<Vec<u8>, CodecError>> {
        self.inner.encode_png(surface)
    }
}

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let mut img = RgbaImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = image::Rgba([(x * 20) as u8, (y * 20) as u8, 128, 255]);
    }
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

pub fn bmp(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Bmp)
}

pub fn webp(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::WebP)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Png)
}

pub fn svg(width: u32, height: u32) -> Vec<u8> {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="{width}" height="{height}" fill="#00ff00"/></svg>"##
    )
    .into_bytes()
}

pub fn corrupt_webp() -> Vec<u8> {
    b"RIFF\x10\0\0\0WEBPVP8 garbage".to_vec()
}

pub fn file_item(declared: &str, name: &str, bytes: Vec<u8>) -> TransferItem<MockFile> {
    TransferItem::file(declared, MockFile::new(name, bytes))
}

pub fn paste_event(id: u32, items: Vec<TransferItem<MockFile>>) -> InputEvent<MockDom> {
    InputEvent {
        kind: EventKind::Paste,
        trusted: true,
        flags: EventFlags {
            bubbles: true,
            cancelable: true,
            composed: true,
        },
        point: None,
        target: Some(SmolStr::new("paste-target")),
        src_element: Some(SmolStr::new("paste-target")),
        payload: Some(TransferPayload::with_items(items)),
        source_capabilities: None,
        document_url: DOCS_URL.to_string(),
        raw: id,
    }
}

pub fn drop_event(id: u32, point: Point, items: Vec<TransferItem<MockFile>>) -> InputEvent<MockDom> {
    let mut payload = TransferPayload::with_items(items);
    payload.effects = TransferEffects::new("copy", "all");
    InputEvent {
        kind: EventKind::Drop,
        trusted: true,
        flags: EventFlags {
            bubbles: true,
            cancelable: true,
            composed: false,
        },
        point: Some(point),
        target: Some(SmolStr::new("drop-target")),
        src_element: Some(SmolStr::new("drop-target")),
        payload: Some(payload),
        source_capabilities: Some(false),
        document_url: DOCS_URL.to_string(),
        raw: id,
    }
}

/// The event a document-level listener would observe when `event` is
/// dispatched at `target`.
pub fn observed(target: &SmolStr, event: &SynthesizedEvent<MockDom>) -> InputEvent<MockDom> {
    let items = event
        .payload
        .items
        .iter()
        .map(|item| {
            let file = item.file.as_ref().unwrap();
            TransferItem::file(
                item.declared_type.clone(),
                MockFile::new(&file.name, file.bytes.clone()),
            )
        })
        .collect();
    let mut payload = TransferPayload::with_items(items);
    payload.effects = event.payload.effects.clone();
    InputEvent {
        kind: event.kind.clone(),
        trusted: false,
        flags: event.flags,
        point: event.point,
        target: Some(target.clone()),
        src_element: event.src_element.clone(),
        payload: Some(payload),
        source_capabilities: event.source_capabilities,
        document_url: DOCS_URL.to_string(),
        raw: u32::MAX,
    }
}

/// Decode PNG bytes and return their dimensions.
pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).unwrap();
    (img.width(), img.height())
}

/// Messages of WARN events seen on this thread while the guard is alive.
#[derive(Clone, Default)]
pub struct Warnings(Arc<Mutex<Vec<String>>>);

impl Warnings {
    pub fn capture() -> (Self, DefaultGuard) {
        let warnings = Self::default();
        let subscriber = tracing_subscriber::Registry::default().with(warnings.clone());
        (warnings, tracing::subscriber::set_default(subscriber))
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for Warnings {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut message = Message::default();
        event.record(&mut message);
        self.0.lock().unwrap().push(message.0);
    }
}

#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
