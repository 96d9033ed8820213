use crate::assets::sprites::PreparedSprite;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, BezPath, Canvas, PixelRect, Point};
use crate::foundation::error::{RenderError, RenderResult};

/// A rendered image as RGBA8 pixels.
///
/// Frames come out of [`RenderTarget::finish`] premultiplied; the flag makes that explicit at
/// API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The drawing surface every paint stage receives explicitly.
///
/// Wraps a `vello_cpu` render context sized to the planned canvas. Paint calls are recorded in
/// order and rasterized once by [`RenderTarget::finish`].
pub struct RenderTarget {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl RenderTarget {
    /// Allocate a target for `canvas`.
    pub fn new(canvas: Canvas) -> RenderResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| RenderError::canvas("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| RenderError::canvas("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(RenderError::canvas(format!(
                "canvas {}x{} has zero area",
                canvas.width, canvas.height
            )));
        }
        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Size of the surface.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Fill `rect` with `color` (source-over).
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8) {
        self.reset_transforms();
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill the closed polygon through `points` with `color`.
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba8) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();

        self.reset_transforms();
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    /// Draw `sprite` scaled into `rect`.
    pub fn draw_sprite(&mut self, sprite: &PreparedSprite, rect: PixelRect) {
        let sw = f64::from(sprite.width);
        let sh = f64::from(sprite.height);
        let tr = Affine::translate((f64::from(rect.x), f64::from(rect.y)))
            * Affine::scale_non_uniform(f64::from(rect.width) / sw, f64::from(rect.height) / sh);

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint(sprite.paint());
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sw, sh));
    }

    /// Rasterize everything recorded so far into a new frame.
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(rect: PixelRect) -> vello_cpu::kurbo::Rect {
    let r = rect.to_rect();
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
