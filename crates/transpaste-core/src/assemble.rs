//! Rebuilding a transfer payload from converted images.

use smol_str::SmolStr;

use crate::format::CANONICAL_MIME;
use crate::types::{ConvertedImage, OutputFile, TransferItem, TransferPayload};

/// Build a fresh payload holding one PNG file item per converted image, in
/// input order. Effects start out neutral; the synthesizer sets them.
pub fn assemble(converted: Vec<ConvertedImage>) -> TransferPayload<OutputFile> {
    let mut payload = TransferPayload::new();
    for image in converted {
        let file = OutputFile {
            name: image.file_name(),
            mime: SmolStr::new_static(CANONICAL_MIME),
            bytes: image.png,
        };
        payload.push(TransferItem::file(CANONICAL_MIME, file));
    }
    payload
}
