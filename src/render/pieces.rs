use crate::assets::sprites::SpriteAtlas;
use crate::layout::planner::Layout;
use crate::render::target::RenderTarget;

/// Outcome of [`paint_pieces`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PieceCounts {
    /// Pieces drawn from a sprite.
    pub drawn: usize,
    /// Pieces whose `(colour, kind)` has no sprite and were left blank.
    pub without_sprite: usize,
}

/// Draw every planned piece scaled into its square.
///
/// Unmapped pieces are skipped, not treated as errors.
pub fn paint_pieces(layout: &Layout, atlas: &SpriteAtlas, target: &mut RenderTarget) -> PieceCounts {
    let mut counts = PieceCounts::default();
    for (timeline, board) in layout.boards() {
        for placed in &board.pieces {
            let piece = placed.piece;
            match atlas.get(piece.color, piece.kind) {
                Some(sprite) => {
                    target.draw_sprite(sprite, placed.rect);
                    counts.drawn += 1;
                }
                None => {
                    tracing::debug!(
                        timeline = timeline.index,
                        board = board.slot,
                        color = ?piece.color,
                        kind = ?piece.kind,
                        "no sprite for piece; skipped"
                    );
                    counts.without_sprite += 1;
                }
            }
        }
    }
    counts
}

#[cfg(test)]
#[path = "../../tests/unit/render/pieces.rs"]
mod tests;
