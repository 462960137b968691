// crates/core/src/thumbnail.rs
//! Thumbnail codec: derive a small JPEG surrogate from raw image bytes.
//!
//! History records carry the thumbnail inline, so it must be bounded in size.
//! The codec scales down so neither dimension exceeds [`THUMBNAIL_MAX_DIM`]
//! (aspect preserved, never upscaled) and re-encodes at a fixed JPEG quality.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use thiserror::Error;

/// Maximum pixel dimension of a stored thumbnail.
pub const THUMBNAIL_MAX_DIM: u32 = 256;

/// JPEG re-encode quality.
const THUMBNAIL_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Input bytes are not a decodable image. A corrupt upload must fail the
    /// request rather than produce a malformed history record.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to encode thumbnail: {0}")]
    Encode(image::ImageError),
}

/// Compress raw image bytes into a bounded JPEG thumbnail.
///
/// Deterministic for a given input. Images already within bounds are
/// re-encoded without resizing.
pub fn compress_thumbnail(raw: &[u8]) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(raw)?;

    let resized = if img.width() > THUMBNAIL_MAX_DIM || img.height() > THUMBNAIL_MAX_DIM {
        img.thumbnail(THUMBNAIL_MAX_DIM, THUMBNAIL_MAX_DIM)
    } else {
        img
    };

    // JPEG has no alpha channel; flatten to RGB before encoding.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, THUMBNAIL_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(ThumbnailError::Encode)?;

    Ok(bytes)
}
