//! Platform abstraction traits for event interception.
//!
//! These traits define the interface between the interception logic and the
//! environment that produces and consumes insertion events (the browser DOM,
//! or a mock in tests). The same cycle logic runs unchanged on either side.

use std::fmt;
use std::future::Future;

use crate::synth::SynthesizedEvent;
use crate::types::Point;

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError(pub String);

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Type family describing one host environment.
///
/// Implementors are zero-sized markers; the associated types are the handles
/// the environment hands out for elements, files and events.
pub trait Dom: Clone + fmt::Debug + 'static {
    /// Something events can be dispatched to.
    type Element: Clone + fmt::Debug;
    /// Backing file of a transfer item.
    type File: SourceFile + Clone + fmt::Debug;
    /// Source-capability hint carried by drop events.
    type Capabilities: Clone + fmt::Debug;
    /// Handle to the original event, used only to suppress its default action.
    type Event: Clone + fmt::Debug;
}

/// A file offered for insertion.
pub trait SourceFile {
    /// File name as reported by the platform, possibly empty.
    fn name(&self) -> &str;

    /// Read the full contents as binary.
    ///
    /// This is a suspension point: the platform performs the read while the
    /// event loop keeps running.
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, PlatformError>>;
}

/// Platform-specific event plumbing.
///
/// The browser implementation talks to the live document; the test
/// implementation records calls so the cycle can be inspected.
pub trait InsertionPlatform {
    type Dom: Dom;

    /// Suppress the default action of the original event.
    fn prevent_default(&self, event: &<Self::Dom as Dom>::Event);

    /// Element currently rendered under the given viewport coordinates.
    fn element_from_point(&self, point: Point) -> Option<<Self::Dom as Dom>::Element>;

    /// Element that currently has focus.
    fn active_element(&self) -> Option<<Self::Dom as Dom>::Element>;

    /// Dispatch a synthesized event at `target`.
    fn dispatch(
        &self,
        target: &<Self::Dom as Dom>::Element,
        event: SynthesizedEvent<Self::Dom>,
    ) -> Result<(), PlatformError>;
}
