use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::sprites::SpriteAtlas;
use crate::encode::png::{ExportedImage, export_png};
use crate::foundation::error::{RenderError, RenderResult};
use crate::layout::geometry::Geometry;
use crate::layout::planner::{Layout, LayoutPlanner};
use crate::render::grid::{paint_boards, paint_panels};
use crate::render::highlights::{AbsentBoardPolicy, paint_highlights, plan_highlights};
use crate::render::indicators::paint_indicators;
use crate::render::palette::Palette;
use crate::render::pieces::paint_pieces;
use crate::render::target::{FrameRGBA, RenderTarget};
use crate::snapshot::parse::GameSnapshot;

/// Presentation options for a [`Renderer`].
///
/// Deserializes from JSON; every missing key takes its default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Pixel geometry.
    pub geometry: Geometry,
    /// Colours.
    pub palette: Palette,
    /// Handling of highlights on absent boards.
    pub absent_boards: AbsentBoardPolicy,
}

impl RenderOpts {
    /// Parse options from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> RenderResult<Self> {
        let opts: Self = serde_json::from_reader(r).context("parse render options JSON")?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open render options '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the geometry is drawable.
    pub fn validate(&self) -> RenderResult<()> {
        self.geometry.validate()
    }
}

/// Counters reported by [`Renderer::render_with_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Boards painted.
    pub boards: usize,
    /// Pieces drawn from a sprite.
    pub pieces_drawn: usize,
    /// Pieces left blank for lack of a sprite.
    pub pieces_without_sprite: usize,
    /// Distinct highlight squares painted.
    pub highlights_drawn: usize,
    /// Highlights dropped because their board is absent.
    pub highlights_skipped: usize,
}

/// Renders snapshots to images with fixed options and a preloaded sprite atlas.
///
/// Stateless between calls; one renderer can be shared across threads.
#[derive(Clone, Debug)]
pub struct Renderer {
    opts: RenderOpts,
    atlas: Arc<SpriteAtlas>,
}

impl Renderer {
    /// Build a renderer after validating `opts`.
    pub fn new(opts: RenderOpts, atlas: Arc<SpriteAtlas>) -> RenderResult<Self> {
        opts.validate()?;
        Ok(Self { opts, atlas })
    }

    /// Options in use.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Sprite atlas in use.
    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    /// Plan the layout of `snapshot` without drawing.
    pub fn plan(&self, snapshot: &GameSnapshot) -> RenderResult<Layout> {
        LayoutPlanner::new(self.opts.geometry).plan(snapshot)
    }

    /// Render `snapshot` to premultiplied RGBA8.
    pub fn render(&self, snapshot: &GameSnapshot) -> RenderResult<FrameRGBA> {
        self.render_with_stats(snapshot).map(|(frame, _)| frame)
    }

    /// Render `snapshot` and report what was drawn.
    ///
    /// Layout and highlights are fully resolved before the surface is allocated, so a bounds or
    /// canvas error never leaves a partial image behind.
    #[tracing::instrument(skip_all, fields(timelines = snapshot.timelines().len()))]
    pub fn render_with_stats(&self, snapshot: &GameSnapshot) -> RenderResult<(FrameRGBA, RenderStats)> {
        let layout = self.plan(snapshot)?;
        let highlights = plan_highlights(snapshot, &layout, self.opts.absent_boards)?;
        let palette = &self.opts.palette;

        let mut target = RenderTarget::new(layout.canvas)?;
        paint_panels(&layout, palette, &mut target);
        paint_indicators(&layout, palette, &mut target);
        let boards = paint_boards(&layout, palette, &mut target);
        let pieces = paint_pieces(&layout, &self.atlas, &mut target);
        let highlights_drawn = paint_highlights(&highlights, palette, &mut target);

        let stats = RenderStats {
            boards,
            pieces_drawn: pieces.drawn,
            pieces_without_sprite: pieces.without_sprite,
            highlights_drawn,
            highlights_skipped: highlights.skipped,
        };
        tracing::debug!(
            width = layout.canvas.width,
            height = layout.canvas.height,
            ?stats,
            "rendered snapshot"
        );
        Ok((target.finish(), stats))
    }

    /// Render `snapshot` and encode it as PNG under the export file name.
    pub fn render_png(&self, snapshot: &GameSnapshot) -> RenderResult<ExportedImage> {
        let frame = self.render(snapshot)?;
        export_png(&frame)
    }

    /// Render independent snapshots in parallel.
    ///
    /// Uses a dedicated pool of `threads` workers (rayon's default when `None`). Results are in
    /// input order and each carries its own outcome; the outer error covers pool setup only.
    #[tracing::instrument(skip(self, snapshots), fields(count = snapshots.len()))]
    pub fn render_batch(
        &self,
        snapshots: &[GameSnapshot],
        threads: Option<usize>,
    ) -> RenderResult<Vec<RenderResult<FrameRGBA>>> {
        let pool = build_thread_pool(threads)?;
        Ok(pool.install(|| {
            snapshots
                .par_iter()
                .map(|snapshot| self.render(snapshot))
                .collect::<Vec<_>>()
        }))
    }
}

/// One-shot render with `opts` and `atlas`.
pub fn render_snapshot(
    snapshot: &GameSnapshot,
    opts: &RenderOpts,
    atlas: Arc<SpriteAtlas>,
) -> RenderResult<FrameRGBA> {
    Renderer::new(opts.clone(), atlas)?.render(snapshot)
}

fn build_thread_pool(threads: Option<usize>) -> RenderResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RenderError::Other(anyhow::anyhow!(
            "batch 'threads' must be >= 1 when set"
        )));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .context("failed to build rayon thread pool")
        .map_err(RenderError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
