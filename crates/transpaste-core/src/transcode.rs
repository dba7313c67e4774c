//! Conversion of candidate images to the canonical format.
//!
//! The pixel work is delegated to an [`ImageCodec`]; this module drives the
//! per-file pipeline (read, decode, encode) and the batch policy.

use std::future::Future;

use futures_util::future::try_join_all;

use crate::error::{CodecError, TranscodeError};
use crate::format::ImageFormat;
use crate::platform::SourceFile;
use crate::types::{CandidateImage, ConvertedImage};

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Reject surfaces that are empty or larger than [`MAX_DIMENSION`] on
/// either axis.
///
/// Codecs call this before allocating a surface sized from the source's own
/// header; [`transcode`] calls it again on every decoded surface.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::EmptyImage);
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CodecError::TooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Decode/encode capability of the runtime.
///
/// Both steps are suspension points. Implementations hold no mutable state
/// shared between calls, so several conversions can be in flight at once.
pub trait ImageCodec {
    /// A drawable surface sized to the source's intrinsic pixel dimensions.
    type Surface;

    /// Decode `bytes` and render them into a fresh surface.
    ///
    /// Vector sources are rasterized at their intrinsic size, without scaling.
    fn decode(
        &self,
        bytes: Vec<u8>,
        format: ImageFormat,
    ) -> impl Future<Output = Result<Self::Surface, CodecError>>;

    /// Pixel dimensions of a decoded surface.
    fn dimensions(&self, surface: &Self::Surface) -> (u32, u32);

    /// Encode a surface as lossless PNG.
    fn encode_png(&self, surface: Self::Surface)
    -> impl Future<Output = Result<Vec<u8>, CodecError>>;
}

/// Convert one candidate to PNG.
pub async fn transcode<C, F>(
    codec: &C,
    candidate: &CandidateImage<F>,
) -> Result<ConvertedImage, TranscodeError>
where
    C: ImageCodec,
    F: SourceFile,
{
    let name = candidate.file.name();
    let fail = |source: CodecError| TranscodeError {
        file_name: name.to_string(),
        format: candidate.format,
        source,
    };

    let bytes = candidate.file.read_bytes().await.map_err(|e| fail(e.into()))?;
    let surface = codec.decode(bytes, candidate.format).await.map_err(fail)?;
    let (width, height) = codec.dimensions(&surface);
    check_dimensions(width, height).map_err(fail)?;
    let png = codec.encode_png(surface).await.map_err(fail)?;

    tracing::debug!(
        file = name,
        format = %candidate.format,
        width,
        height,
        png_len = png.len(),
        "converted"
    );

    Ok(ConvertedImage {
        original_name: name.to_string(),
        png,
    })
}

/// Convert a batch concurrently.
///
/// Output order equals input order regardless of which conversion finishes
/// first. The first failure fails the whole batch.
pub async fn transcode_all<C, F>(
    codec: &C,
    candidates: &[CandidateImage<F>],
) -> Result<Vec<ConvertedImage>, TranscodeError>
where
    C: ImageCodec,
    F: SourceFile,
{
    try_join_all(candidates.iter().map(|candidate| transcode(codec, candidate))).await
}
