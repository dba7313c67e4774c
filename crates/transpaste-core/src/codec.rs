//! Pure-Rust codec backed by `image` and `resvg`.
//!
//! Used outside the browser and in tests. AVIF and HEIF have no pure-Rust
//! decoder here and are reported as unsupported; in the browser those go
//! through the platform decoder instead.
//!
//! SVG `<text>` is shaped with the system fonts, loaded once per process on
//! the first SVG decode. Text whose family is not installed falls back to
//! whatever fontdb matches, or is not drawn if no font is installed at all.

use std::future::{Future, ready};
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::{DynamicImage, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::CodecError;
use crate::format::ImageFormat;
use crate::transcode::{ImageCodec, check_dimensions};

/// Synchronous codec; every future it returns is already complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode_sync(bytes: &[u8], format: ImageFormat) -> Result<RgbaImage, CodecError> {
        let format = match format {
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Svg => return rasterize_svg(bytes),
            ImageFormat::Avif | ImageFormat::Heif => {
                return Err(CodecError::Unsupported(format));
            }
        };
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        // Fresh surface with the source's dimensions, source drawn at the origin.
        let mut surface = RgbaImage::new(decoded.width(), decoded.height());
        image::imageops::replace(&mut surface, &decoded.to_rgba8(), 0, 0);
        Ok(surface)
    }
}

fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
            Arc::new(db)
        })
        .clone()
}

fn rasterize_svg(bytes: &[u8]) -> Result<RgbaImage, CodecError> {
    let options = usvg::Options {
        fontdb: system_fonts(),
        ..usvg::Options::default()
    };
    let tree =
        usvg::Tree::from_data(bytes, &options).map_err(|e| CodecError::Decode(e.to_string()))?;
    let size = tree.size().to_int_size();
    check_dimensions(size.width(), size.height())?;
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(CodecError::EmptyImage)?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let raw = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(size.width(), size.height(), raw)
        .ok_or_else(|| CodecError::Decode("pixmap size mismatch".into()))
}

impl ImageCodec for RasterCodec {
    type Surface = RgbaImage;

    fn decode(
        &self,
        bytes: Vec<u8>,
        format: ImageFormat,
    ) -> impl Future<Output = Result<RgbaImage, CodecError>> {
        ready(Self::decode_sync(&bytes, format))
    }

    fn dimensions(&self, surface: &RgbaImage) -> (u32, u32) {
        surface.dimensions()
    }

    fn encode_png(&self, surface: RgbaImage) -> impl Future<Output = Result<Vec<u8>, CodecError>> {
        let mut buf = Vec::new();
        let written = DynamicImage::ImageRgba8(surface)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png);
        ready(match written {
            Ok(()) => Ok(buf),
            Err(e) => Err(CodecError::Encode(e.to_string())),
        })
    }
}
