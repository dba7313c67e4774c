//! Ring buffer of recent problems, for bug reports.
//!
//! Console output is handled by `WASMLayer`; this layer only keeps the
//! warnings and errors raised by our own crates so a host page can attach
//! them to a report.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Write as FmtWrite;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use wasm_bindgen::prelude::*;

/// Maximum number of entries to keep.
const MAX_ENTRIES: usize = 100;

const CAPTURED_PREFIXES: &[&str] = &["transpaste_"];

/// Least severe level that is kept.
const MIN_LEVEL: Level = Level::WARN;

thread_local! {
    static DIAGNOSTICS: RefCell<VecDeque<String>> =
        RefCell::new(VecDeque::with_capacity(MAX_ENTRIES));
}

/// Captures WARN and ERROR events from `transpaste_*` targets.
pub struct DiagnosticCaptureLayer;

impl<S: Subscriber> Layer<S> for DiagnosticCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = metadata.level();
        let target = metadata.target();

        let ours = CAPTURED_PREFIXES.iter().any(|prefix| target.starts_with(prefix));
        if !ours || *level > MIN_LEVEL {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        push(format!("[{level}] {target}: {}", visitor.finish()));
    }
}

fn push(entry: String) {
    DIAGNOSTICS.with(|buf| {
        let mut buf = buf.borrow_mut();
        if buf.len() >= MAX_ENTRIES {
            buf.pop_front();
        }
        buf.push_back(entry);
    });
}

/// Message first, then `name=value` fields in recording order.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn field(&mut self) -> &mut String {
        if !self.fields.is_empty() {
            self.fields.push_str(", ");
        }
        &mut self.fields
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{}, {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.field(), "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.field(), "{}={value}", field.name());
        }
    }
}

/// Captured entries, oldest first.
#[wasm_bindgen]
pub fn diagnostics() -> Vec<String> {
    DIAGNOSTICS.with(|buf| buf.borrow().iter().cloned().collect())
}

#[wasm_bindgen(js_name = clearDiagnostics)]
pub fn clear_diagnostics() {
    DIAGNOSTICS.with(|buf| buf.borrow_mut().clear());
}
