// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layer blob format.
//
// ```text
// offset  size  field
// 0       4     magic "ABLR"
// 4       1     version (1)
// 5       4     width, u32 little-endian
// 9       4     height, u32 little-endian
// 13      w*h*4 straight RGBA bytes, row-major
// ```

use abook_core::error::{AbookError, Result};
use image::RgbaImage;

const MAGIC: &[u8; 4] = b"ABLR";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 13;

/// Serialise a raster into a blob that carries its own dimensions.
pub fn encode(pixels: &RgbaImage) -> Vec<u8> {
    let raw = pixels.as_raw();
    let mut blob = Vec::with_capacity(HEADER_LEN + raw.len());
    blob.extend_from_slice(MAGIC);
    blob.push(VERSION);
    blob.extend_from_slice(&pixels.width().to_le_bytes());
    blob.extend_from_slice(&pixels.height().to_le_bytes());
    blob.extend_from_slice(raw);
    blob
}

/// Rebuild a raster from a blob written by [`encode`].
pub fn decode(blob: &[u8]) -> Result<RgbaImage> {
    if blob.len() < HEADER_LEN {
        return Err(AbookError::Encoding(format!(
            "blob is {} bytes, shorter than the {HEADER_LEN}-byte header",
            blob.len()
        )));
    }
    if &blob[0..4] != MAGIC {
        return Err(AbookError::Encoding("missing ABLR magic".into()));
    }
    if blob[4] != VERSION {
        return Err(AbookError::Encoding(format!("unsupported version {}", blob[4])));
    }

    let width = u32::from_le_bytes([blob[5], blob[6], blob[7], blob[8]]);
    let height = u32::from_le_bytes([blob[9], blob[10], blob[11], blob[12]]);
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| AbookError::Encoding(format!("dimensions {width}x{height} overflow")))?;

    let payload = &blob[HEADER_LEN..];
    if payload.len() != expected {
        return Err(AbookError::Encoding(format!(
            "{width}x{height} needs {expected} pixel bytes, found {}",
            payload.len()
        )));
    }

    RgbaImage::from_raw(width, height, payload.to_vec())
        .ok_or_else(|| AbookError::Encoding("pixel buffer does not match dimensions".into()))
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn header_layout() {
        let pixels = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let blob = encode(&pixels);
        assert_eq!(&blob[0..4], b"ABLR");
        assert_eq!(blob[4], 1);
        assert_eq!(&blob[5..9], &3u32.to_le_bytes());
        assert_eq!(&blob[9..13], &2u32.to_le_bytes());
        assert_eq!(blob.len(), 13 + 3 * 2 * 4);
    }

    #[test]
    fn decode_restores_pixels() {
        let mut pixels = RgbaImage::from_pixel(5, 7, Rgba([0, 0, 0, 0]));
        pixels.put_pixel(4, 6, Rgba([20, 20, 20, 255]));
        let decoded = decode(&encode(&pixels)).expect("decode");
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn rejects_truncated_and_foreign_blobs() {
        let blob = encode(&RgbaImage::new(4, 4));
        assert!(matches!(decode(&blob[..10]), Err(AbookError::Encoding(_))));
        assert!(matches!(decode(&blob[..blob.len() - 1]), Err(AbookError::Encoding(_))));

        let mut foreign = blob.clone();
        foreign[0] = b'P';
        assert!(matches!(decode(&foreign), Err(AbookError::Encoding(_))));

        let mut future = blob;
        future[4] = 9;
        assert!(matches!(decode(&future), Err(AbookError::Encoding(_))));
    }
}
