//! transpaste-core: platform-agnostic interception of image insertions.
//!
//! This crate provides:
//! - `Dom`, `SourceFile`, `InsertionPlatform` - seams to the host environment
//! - `Classifier` - picks the convertible items of a transfer payload
//! - `ImageCodec` and `transcode_all` - concurrent conversion to PNG
//! - `assemble` / `synthesize` - the replacement payload and event
//! - `Interceptor` - the cycle state machine, plus an optional serial queue
//!
//! With the `native` feature, `RasterCodec` converts with pure-Rust decoders.

pub mod assemble;
pub mod classify;
#[cfg(feature = "native")]
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod intercept;
pub mod platform;
pub mod queue;
pub mod synth;
pub mod transcode;
pub mod types;

pub use assemble::assemble;
pub use classify::Classifier;
#[cfg(feature = "native")]
pub use codec::RasterCodec;
pub use config::{HostRule, InterceptorConfig, RESTRICTED_SURFACE_PREFIX};
pub use error::{CodecError, InterceptError, TranscodeError};
pub use format::{CANONICAL_EXTENSION, CANONICAL_MIME, Detected, ImageFormat, detect};
pub use intercept::{Cycle, CycleReport, CycleState, IgnoreReason, Interception, Interceptor};
pub use platform::{Dom, InsertionPlatform, PlatformError, SourceFile};
pub use queue::{CycleQueue, CycleWorker, cycle_queue};
pub use smol_str::SmolStr;
pub use synth::{SynthesizedEvent, synthesize};
pub use transcode::{ImageCodec, MAX_DIMENSION, check_dimensions, transcode, transcode_all};
pub use types::{
    CandidateImage, ConvertedImage, EventFlags, EventKind, InputEvent, ItemKind, OutputFile,
    Point, TransferEffects, TransferItem, TransferPayload, png_file_name,
};
