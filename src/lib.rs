//! Renders 4D chess game snapshots to raster images.
//!
//! A snapshot is a grid of boards: one row per timeline, one column per ply. The pipeline is:
//!
//! - Parse a [`GameSnapshot`] from the stored JSON document
//! - Plan a [`Layout`] (canvas size, board, piece and indicator rectangles)
//! - Paint panels, timeline indicators, boards, pieces and move highlights into a [`RenderTarget`]
//! - Encode the result as PNG ([`encode_png`]) and hand it to an [`ImageSink`]
//!
//! Sprites are decoded once into a [`SpriteAtlas`]; rendering itself does no IO and can run on
//! many snapshots in parallel ([`Renderer::render_batch`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod layout;
mod render;
mod snapshot;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, BezPath, Canvas, PixelRect, Point, Rect};
pub use crate::foundation::error::{RenderError, RenderResult};

pub use crate::snapshot::parse::{
    Board, GameSnapshot, MovementVisual, Piece, PieceKind, Side, Timeline, VisualOrder,
};

pub use crate::layout::geometry::Geometry;
pub use crate::layout::planner::{
    BoardLayout, IndicatorGeometry, Layout, LayoutPlanner, MAX_CANVAS_SIDE, PieceLayout,
    TimelineLayout, plan_layout,
};

pub use crate::assets::sprites::{PreparedSprite, SpriteAtlas, SpriteEntry, SpriteKey, SpriteTable};

pub use crate::render::grid::{paint_boards, paint_panels, tile_parity};
pub use crate::render::highlights::{
    AbsentBoardPolicy, HighlightPlan, paint_highlights, plan_highlights,
};
pub use crate::render::indicators::paint_indicators;
pub use crate::render::palette::Palette;
pub use crate::render::pieces::{PieceCounts, paint_pieces};
pub use crate::render::pipeline::{RenderOpts, RenderStats, Renderer, render_snapshot};
pub use crate::render::target::{FrameRGBA, RenderTarget};

pub use crate::encode::png::{EXPORT_FILE_NAME, ExportedImage, encode_png, export_png};
pub use crate::encode::sink::{FileSink, ImageSink, InMemorySink};
