//! Core interception types: events, transfer payloads, and per-cycle images.
//!
//! These types are platform-agnostic. The `Dom` parameter supplies the
//! handles for elements, files and raw events.

use std::fmt;

use smol_str::SmolStr;

use crate::format::{CANONICAL_EXTENSION, ImageFormat};
use crate::platform::Dom;

/// Kind of insertion event.
///
/// Parsed from the platform's event type string. Anything other than `drop`
/// and `paste` is kept verbatim so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Drop,
    Paste,
    Other(SmolStr),
}

impl EventKind {
    /// Parse a DOM event type (`"drop"`, `"paste"`, ...).
    pub fn from_event_type(s: &str) -> Self {
        match s {
            "drop" => EventKind::Drop,
            "paste" => EventKind::Paste,
            other => EventKind::Other(SmolStr::new(other)),
        }
    }

    /// The DOM event type string.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Drop => "drop",
            EventKind::Paste => "paste",
            EventKind::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewport coordinates of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Propagation flags of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventFlags {
    pub bubbles: bool,
    pub cancelable: bool,
    /// Crosses shadow-root boundaries.
    pub composed: bool,
}

/// Drag-effect fields of a transfer object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEffects {
    pub drop_effect: SmolStr,
    pub effect_allowed: SmolStr,
}

impl TransferEffects {
    pub fn new(drop_effect: impl Into<SmolStr>, effect_allowed: impl Into<SmolStr>) -> Self {
        Self {
            drop_effect: drop_effect.into(),
            effect_allowed: effect_allowed.into(),
        }
    }

    /// Values a freshly constructed transfer object reports.
    pub fn neutral() -> Self {
        Self::new("none", "uninitialized")
    }
}

impl Default for TransferEffects {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Kind of a transfer item. Only `File` items are candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Other,
}

impl ItemKind {
    /// Parse `DataTransferItem.kind`.
    pub fn from_kind_str(s: &str) -> Self {
        if s == "file" { ItemKind::File } else { ItemKind::Other }
    }
}

/// One entry of a transfer payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferItem<F> {
    pub kind: ItemKind,
    pub declared_type: SmolStr,
    /// Backing file. Present for `File` items the platform could materialize.
    pub file: Option<F>,
}

impl<F> TransferItem<F> {
    pub fn file(declared_type: impl Into<SmolStr>, file: F) -> Self {
        Self {
            kind: ItemKind::File,
            declared_type: declared_type.into(),
            file: Some(file),
        }
    }

    pub fn other(declared_type: impl Into<SmolStr>) -> Self {
        Self {
            kind: ItemKind::Other,
            declared_type: declared_type.into(),
            file: None,
        }
    }
}

/// Ordered files offered for insertion, plus the drag-effect fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPayload<F> {
    pub items: Vec<TransferItem<F>>,
    pub effects: TransferEffects,
}

impl<F> TransferPayload<F> {
    /// Empty payload with neutral effects.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            effects: TransferEffects::neutral(),
        }
    }

    pub fn with_items(items: Vec<TransferItem<F>>) -> Self {
        Self {
            items,
            effects: TransferEffects::neutral(),
        }
    }

    pub fn push(&mut self, item: TransferItem<F>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<F> Default for TransferPayload<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// An insertion event as observed at the document root.
///
/// Built by the platform layer at interception time. Everything the cycle
/// needs later is copied out here, because the platform's own transfer object
/// is emptied once the event handler returns.
#[derive(Debug, Clone)]
pub struct InputEvent<D: Dom> {
    pub kind: EventKind,
    /// Produced by a real user action rather than by script.
    pub trusted: bool,
    pub flags: EventFlags,
    /// Drop coordinates. `None` for paste.
    pub point: Option<Point>,
    pub target: Option<D::Element>,
    pub src_element: Option<D::Element>,
    /// `dataTransfer` for drop, `clipboardData` for paste.
    pub payload: Option<TransferPayload<D::File>>,
    /// Drop only.
    pub source_capabilities: Option<D::Capabilities>,
    /// URL of the document the event originated in.
    pub document_url: String,
    pub raw: D::Event,
}

/// A transfer item selected for conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateImage<F> {
    pub file: F,
    pub format: ImageFormat,
}

/// Output of the transcoder for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    pub original_name: String,
    pub png: Vec<u8>,
}

impl ConvertedImage {
    /// Name of the converted file: the original extension replaced by `.png`.
    pub fn file_name(&self) -> String {
        png_file_name(&self.original_name)
    }
}

/// A converted file placed into a rebuilt payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub mime: SmolStr,
    pub bytes: Vec<u8>,
}

/// Derive the converted file name from the original one.
pub fn png_file_name(original: &str) -> String {
    if original.is_empty() {
        return format!("image.{CANONICAL_EXTENSION}");
    }
    match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.{CANONICAL_EXTENSION}"),
        _ => format!("{original}.{CANONICAL_EXTENSION}"),
    }
}
