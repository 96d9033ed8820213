use std::io::Cursor;

use crate::foundation::error::{RenderError, RenderResult};
use crate::render::target::FrameRGBA;

/// Logical file name an exported snapshot image is offered under.
pub const EXPORT_FILE_NAME: &str = "4D Chess Image.png";

/// Encoded image plus the name it should be saved as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested file name; [`EXPORT_FILE_NAME`] for renders.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

/// Encode `frame` as PNG (straight alpha).
///
/// Identical frames always produce identical bytes.
pub fn encode_png(frame: &FrameRGBA) -> RenderResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(RenderError::encode(format!(
            "frame {}x{} carries {} bytes, expected {expected}",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }

    let data = if frame.premultiplied {
        unpremultiply_rgba8(&frame.data)
    } else {
        frame.data.clone()
    };
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| RenderError::encode("frame buffer does not fit its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| RenderError::encode(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Encode `frame` and attach the export file name.
pub fn export_png(frame: &FrameRGBA) -> RenderResult<ExportedImage> {
    Ok(ExportedImage {
        file_name: EXPORT_FILE_NAME.to_owned(),
        width: frame.width,
        height: frame.height,
        bytes: encode_png(frame)?,
    })
}

pub(crate) fn unpremultiply_rgba8(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
