//! Construction of the replacement event.
//!
//! The synthesized event must look, to the host's own handlers, like the one
//! the platform would have produced at the same target: same kind, same
//! coordinates, same identity fields, a payload the host can read.

use crate::error::InterceptError;
use crate::platform::Dom;
use crate::types::{
    EventFlags, EventKind, InputEvent, OutputFile, Point, TransferEffects, TransferPayload,
};

/// A fully described replacement event, ready for the platform to build and
/// dispatch.
#[derive(Debug, Clone)]
pub struct SynthesizedEvent<D: Dom> {
    pub kind: EventKind,
    pub flags: EventFlags,
    /// Drop only.
    pub point: Option<Point>,
    pub payload: TransferPayload<OutputFile>,
    /// Drop only.
    pub source_capabilities: Option<D::Capabilities>,
    /// Reported target, forced to the original's.
    pub target: Option<D::Element>,
    /// Reported originating element, forced to the original's.
    pub src_element: Option<D::Element>,
}

/// Build the replacement for `original` carrying `payload`.
pub fn synthesize<D: Dom>(
    kind: &EventKind,
    mut payload: TransferPayload<OutputFile>,
    original: &InputEvent<D>,
) -> Result<SynthesizedEvent<D>, InterceptError> {
    let (flags, point, source_capabilities) = match kind {
        EventKind::Drop => {
            // The host's drop handler checks these to decide acceptance.
            payload.effects = original
                .payload
                .as_ref()
                .map(|p| p.effects.clone())
                .unwrap_or_default();
            let flags = EventFlags {
                bubbles: true,
                cancelable: true,
                composed: false,
            };
            (flags, original.point, original.source_capabilities.clone())
        }
        EventKind::Paste => {
            payload.effects = TransferEffects::neutral();
            let flags = EventFlags {
                bubbles: true,
                cancelable: true,
                composed: true,
            };
            (flags, None, None)
        }
        EventKind::Other(name) => {
            return Err(InterceptError::UnsupportedEventKind(name.clone()));
        }
    };

    Ok(SynthesizedEvent {
        kind: kind.clone(),
        flags,
        point,
        payload,
        source_capabilities,
        target: original.target.clone(),
        src_element: original.src_element.clone(),
    })
}
