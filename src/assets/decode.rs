use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{RenderError, RenderResult};

/// Decoded image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub(crate) struct PreparedImage {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Row-major, tightly packed.
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded raster bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub(crate) fn decode_image(bytes: &[u8]) -> RenderResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes and rasterize them into a `size_px` square.
pub(crate) fn rasterize_svg(bytes: &[u8], size_px: u32) -> RenderResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size_px, size_px)
        .ok_or_else(|| RenderError::asset(format!("cannot allocate {size_px}px svg raster")))?;
    let sx = (size_px as f32) / tree.size().width();
    let sy = (size_px as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied.
    Ok(PreparedImage {
        width: size_px,
        height: size_px,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

/// Decode a sprite file, choosing the decoder from the file name.
pub(crate) fn decode_sprite(name: &str, bytes: &[u8], cell_px: u32) -> RenderResult<PreparedImage> {
    if name.to_ascii_lowercase().ends_with(".svg") {
        rasterize_svg(bytes, cell_px)
    } else {
        decode_image(bytes)
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
