use serde::Serialize;

use crate::foundation::core::{Canvas, PixelRect, Point};
use crate::foundation::error::{RenderError, RenderResult};
use crate::layout::geometry::Geometry;
use crate::snapshot::parse::{GameSnapshot, Piece, Side, Timeline};

/// Largest canvas side the raster backend can address.
pub const MAX_CANVAS_SIDE: u32 = u16::MAX as u32;

/// Pixel placement of everything in a snapshot.
///
/// Pure data: planning never draws, so layouts can be compared and serialized on their own.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    /// Output raster size.
    pub canvas: Canvas,
    /// Board width in squares.
    pub board_width: u32,
    /// Board height in squares.
    pub board_height: u32,
    /// Reserved timeline rows (present or not).
    pub row_count: u32,
    /// Longest timeline, counted in raw board slots.
    pub max_row_length: u32,
    /// Background panel columns; each panel spans two board slots.
    pub panel_columns: u32,
    /// Horizontal pitch of board slots.
    pub slot_width: u32,
    /// Vertical pitch of timeline rows.
    pub row_height: u32,
    /// Parameters the layout was planned with.
    pub geometry: Geometry,
    /// Per-row layout, `None` where the snapshot has no timeline.
    pub timelines: Vec<Option<TimelineLayout>>,
}

/// Placement of one timeline row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineLayout {
    /// Row index.
    pub index: u32,
    /// Leading absent slots skipped when placing boards.
    pub compaction_offset: u32,
    /// Present boards, in slot order.
    pub boards: Vec<BoardLayout>,
    /// Connector bar and marker; `None` when the timeline has no boards.
    pub indicator: Option<IndicatorGeometry>,
}

/// Placement of one present board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardLayout {
    /// Slot index in the snapshot.
    pub slot: u32,
    /// Display column after compaction.
    pub column: u32,
    /// Side to move.
    pub turn_color: Side,
    /// Area covered by the squares.
    pub interior: PixelRect,
    /// Interior grown by the border thickness.
    pub border: PixelRect,
    /// Present pieces.
    pub pieces: Vec<PieceLayout>,
}

/// Placement of one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PieceLayout {
    /// The piece itself.
    pub piece: Piece,
    /// Cell the sprite is drawn into.
    pub rect: PixelRect,
}

/// Connector bar and open-ended marker for one timeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IndicatorGeometry {
    /// Horizontal bar behind the boards.
    pub bar: PixelRect,
    /// Triangle: base top, tip, base bottom.
    pub marker: [Point; 3],
}

impl Layout {
    /// Interior rectangle of the board in display `column` of row `timeline`.
    pub fn board_rect(&self, timeline: u32, column: u32) -> PixelRect {
        let margin = self.geometry.margin_px() as i32;
        let cell = self.geometry.cell_px;
        PixelRect::new(
            (column * self.slot_width) as i32 + margin,
            (timeline * self.row_height) as i32 + margin,
            self.board_width * cell,
            self.board_height * cell,
        )
    }

    /// Square `(x, y)` of the board in display `column` of row `timeline`.
    pub fn cell_rect(&self, timeline: u32, column: u32, x: u32, y: u32) -> PixelRect {
        let cell = self.geometry.cell_px;
        let board = self.board_rect(timeline, column);
        PixelRect::new(
            board.x + (x * cell) as i32,
            board.y + (y * cell) as i32,
            cell,
            cell,
        )
    }

    /// Background panels as `(row, column, rect)`, row-major.
    pub fn panel_rects(&self) -> impl Iterator<Item = (u32, u32, PixelRect)> + '_ {
        let panel_w = self.slot_width * 2;
        (0..self.row_count).flat_map(move |row| {
            (0..self.panel_columns).map(move |col| {
                (
                    row,
                    col,
                    PixelRect::new(
                        (col * panel_w) as i32,
                        (row * self.row_height) as i32,
                        panel_w,
                        self.row_height,
                    ),
                )
            })
        })
    }

    /// Layout of timeline `index`, if present.
    pub fn timeline(&self, index: u32) -> Option<&TimelineLayout> {
        self.timelines.get(index as usize).and_then(Option::as_ref)
    }

    /// Every present board with its row.
    pub fn boards(&self) -> impl Iterator<Item = (&TimelineLayout, &BoardLayout)> {
        self.timelines
            .iter()
            .flatten()
            .flat_map(|tl| tl.boards.iter().map(move |b| (tl, b)))
    }
}

/// Computes a [`Layout`] from a snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutPlanner {
    geometry: Geometry,
}

impl LayoutPlanner {
    /// Planner using `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Plan canvas extent and every board, piece and indicator rectangle.
    ///
    /// Pieces outside their board are rejected here, before anything is drawn.
    #[tracing::instrument(skip_all, fields(timelines = snapshot.timelines().len()))]
    pub fn plan(&self, snapshot: &GameSnapshot) -> RenderResult<Layout> {
        self.geometry.validate()?;

        let board_width = snapshot.board_width();
        let board_height = snapshot.board_height();
        let row_count = snapshot.timelines().len() as u64;
        let max_row_length = snapshot
            .timelines()
            .iter()
            .flatten()
            .map(|tl| tl.boards.len() as u64)
            .max()
            .unwrap_or(0);

        let slot_width = self.geometry.slot_width(board_width);
        let row_height = self.geometry.row_height(board_height);
        let panel_columns = (max_row_length + 2) / 2;
        let width = panel_columns
            .saturating_mul(2)
            .saturating_mul(slot_width);
        let height = row_count.saturating_mul(row_height);

        if row_count == 0 {
            return Err(RenderError::canvas("snapshot has no timeline rows"));
        }
        let limit = u64::from(MAX_CANVAS_SIDE);
        if width > limit || height > limit {
            return Err(RenderError::canvas(format!(
                "canvas {width}x{height} exceeds the {limit}px raster limit"
            )));
        }

        // Every coordinate below is bounded by the canvas, so the narrowing casts are lossless.
        let mut layout = Layout {
            canvas: Canvas {
                width: width as u32,
                height: height as u32,
            },
            board_width,
            board_height,
            row_count: row_count as u32,
            max_row_length: max_row_length as u32,
            panel_columns: panel_columns as u32,
            slot_width: slot_width as u32,
            row_height: row_height as u32,
            geometry: self.geometry,
            timelines: Vec::with_capacity(row_count as usize),
        };

        for (t, timeline) in snapshot.timelines().iter().enumerate() {
            let planned = timeline
                .as_ref()
                .map(|tl| plan_timeline(&layout, t as u32, tl))
                .transpose()?;
            layout.timelines.push(planned);
        }

        tracing::debug!(
            width = layout.canvas.width,
            height = layout.canvas.height,
            boards = layout.boards().count(),
            "planned layout"
        );
        Ok(layout)
    }
}

/// Plan `snapshot` with `geometry`; shorthand for [`LayoutPlanner::plan`].
pub fn plan_layout(snapshot: &GameSnapshot, geometry: Geometry) -> RenderResult<Layout> {
    LayoutPlanner::new(geometry).plan(snapshot)
}

fn plan_timeline(layout: &Layout, t: u32, timeline: &Timeline) -> RenderResult<TimelineLayout> {
    let offset = timeline.compaction_offset() as u32;
    let mut boards = Vec::with_capacity(timeline.present_count());

    for (slot, board) in timeline.present_boards() {
        let slot = slot as u32;
        let column = slot - offset;
        let interior = layout.board_rect(t, column);

        let mut pieces = Vec::with_capacity(board.pieces.len());
        for (p, piece) in board.present_pieces() {
            if piece.x >= layout.board_width || piece.y >= layout.board_height {
                return Err(RenderError::bounds(format!(
                    "piece {p} on timeline {t} board {slot} at ({}, {}) lies outside the {}x{} board",
                    piece.x, piece.y, layout.board_width, layout.board_height
                )));
            }
            pieces.push(PieceLayout {
                piece: *piece,
                rect: layout.cell_rect(t, column, piece.x, piece.y),
            });
        }

        boards.push(BoardLayout {
            slot,
            column,
            turn_color: board.turn_color,
            interior,
            border: interior.inflate(layout.geometry.border_px),
            pieces,
        });
    }

    let indicator = match (boards.first(), boards.last()) {
        (Some(first), Some(last)) => Some(indicator_for(layout, t, first.column, last.column)),
        _ => None,
    };

    Ok(TimelineLayout {
        index: t,
        compaction_offset: offset,
        boards,
        indicator,
    })
}

fn indicator_for(layout: &Layout, t: u32, first_column: u32, last_column: u32) -> IndicatorGeometry {
    let g = &layout.geometry;
    // Bar and marker stay inside their own row and the canvas.
    let thickness = g.bar_thickness_px.min(layout.row_height);
    let half_height = g.marker_half_height_px.min(layout.row_height / 2);
    let overhang = g.bar_overhang_px.min(layout.slot_width);

    let cy = (t * layout.row_height + layout.row_height / 2) as i32;
    let x0 = first_column * layout.slot_width;
    let x1 = (last_column + 1) * layout.slot_width + overhang;
    let length = g.marker_length_px.min(layout.canvas.width.saturating_sub(x1));

    let bar = PixelRect::new(x0 as i32, cy - (thickness / 2) as i32, x1 - x0, thickness);

    let base_x = f64::from(x1);
    let cy = f64::from(cy);
    let half = f64::from(half_height);
    let marker = [
        Point::new(base_x, cy - half),
        Point::new(base_x + f64::from(length), cy),
        Point::new(base_x, cy + half),
    ];

    IndicatorGeometry { bar, marker }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/planner.rs"]
mod tests;
