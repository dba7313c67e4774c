//! Error types for interception cycles.
//!
//! Every error here is recovered locally: the cycle is aborted, a diagnostic
//! is logged, and the host document is left untouched.

use miette::Diagnostic;
use smol_str::SmolStr;

use crate::format::ImageFormat;
use crate::platform::PlatformError;
use crate::types::EventKind;

/// Why an interception cycle was aborted.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum InterceptError {
    /// The event carried no transfer payload (e.g. paste without clipboard data).
    #[error("{kind} event carried no transfer payload")]
    #[diagnostic(code(transpaste::malformed_event))]
    MalformedEvent { kind: EventKind },

    /// Synthesis was asked for an event kind other than drop or paste.
    #[error("cannot synthesize an event of kind `{0}`")]
    #[diagnostic(code(transpaste::unsupported_event_kind))]
    UnsupportedEventKind(SmolStr),

    /// A file of the batch could not be converted; the whole batch is dropped.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transcode(#[from] TranscodeError),

    /// No element to dispatch the synthesized event to.
    #[error("no element to dispatch the synthesized {kind} event to")]
    #[diagnostic(
        code(transpaste::target_unresolvable),
        help("drops resolve the element under the pointer, pastes the focused element")
    )]
    TargetUnresolvable { kind: EventKind },

    /// The platform refused to dispatch the synthesized event.
    #[error("dispatch failed: {0}")]
    #[diagnostic(code(transpaste::dispatch))]
    Dispatch(#[from] PlatformError),

    /// The serialized cycle queue has no worker draining it.
    #[error("interception queue is closed")]
    #[diagnostic(code(transpaste::queue_closed))]
    QueueClosed,
}

/// Conversion failure for one file.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("failed to convert `{file_name}` ({format})")]
#[diagnostic(code(transpaste::transcode))]
pub struct TranscodeError {
    pub file_name: String,
    pub format: ImageFormat,
    #[source]
    pub source: CodecError,
}

/// Failure inside the decode/encode pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("could not read file: {0}")]
    Read(#[from] PlatformError),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("no decoder for {0}")]
    Unsupported(ImageFormat),

    #[error("image has no intrinsic size")]
    EmptyImage,

    #[error("image is {width}x{height}, larger than {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}
