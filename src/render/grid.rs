//! Background panels, board frames and checkerboard squares.

use crate::layout::planner::Layout;
use crate::render::palette::Palette;
use crate::render::target::RenderTarget;

/// Tile colour index (`0` light, `1` dark) of the square at row-major `index`.
///
/// Even-width boards alternate by `(index / width + index) % 2`, odd-width boards by
/// `index % 2`. Both give a standard checkerboard with the top-left square light. A zero width
/// has no rows and takes the running-index rule.
pub fn tile_parity(board_width: u32, index: u32) -> usize {
    if board_width != 0 && board_width % 2 == 0 {
        (((index / board_width) % 2 + index) % 2) as usize
    } else {
        (index % 2) as usize
    }
}

/// Fill the alternating background panels.
pub fn paint_panels(layout: &Layout, palette: &Palette, target: &mut RenderTarget) {
    for (row, col, rect) in layout.panel_rects() {
        target.fill_rect(rect, palette.panels[((row + col) % 2) as usize]);
    }
}

/// Paint every present board: frame coloured by side to move, then its squares.
///
/// Returns the number of boards painted.
pub fn paint_boards(layout: &Layout, palette: &Palette, target: &mut RenderTarget) -> usize {
    let bw = layout.board_width;
    let bh = layout.board_height;

    let mut painted = 0;
    for (timeline, board) in layout.boards() {
        target.fill_rect(board.border, palette.borders[board.turn_color.index()]);
        for index in 0..bw * bh {
            let rect = layout.cell_rect(timeline.index, board.column, index % bw, index / bw);
            target.fill_rect(rect, palette.tiles[tile_parity(bw, index)]);
        }
        painted += 1;
    }
    painted
}

#[cfg(test)]
#[path = "../../tests/unit/render/grid.rs"]
mod tests;
