use super::*;
use crate::layout::geometry::Geometry;
use crate::layout::planner::plan_layout;
use crate::snapshot::parse::{Board, GameSnapshot, Piece, PieceKind, Side, Timeline};

fn piece(color: Side, kind: PieceKind, x: u32, y: u32) -> Option<Piece> {
    Some(Piece { color, kind, x, y })
}

#[test]
fn draws_mapped_pieces_and_counts_the_rest() {
    let board = Board {
        turn_color: Side::White,
        pieces: vec![
            piece(Side::White, PieceKind::Pawn, 0, 6),
            None,
            piece(Side::Black, PieceKind::King, 4, 0),
            piece(Side::White, PieceKind::Other(42), 1, 1),
        ],
    };
    let snap = GameSnapshot::new(
        8,
        8,
        vec![Some(Timeline {
            boards: vec![Some(board)],
        })],
        vec![],
    )
    .unwrap();
    let layout = plan_layout(&snap, Geometry::default()).unwrap();

    let mut atlas = SpriteAtlas::empty();
    atlas
        .insert_rgba(Side::White, PieceKind::Pawn, 4, 4, [200, 20, 20, 255].repeat(16))
        .unwrap();

    let mut target = RenderTarget::new(layout.canvas).unwrap();
    let counts = paint_pieces(&layout, &atlas, &mut target);
    assert_eq!(
        counts,
        PieceCounts {
            drawn: 1,
            without_sprite: 2
        }
    );

    let frame = target.finish();
    // (0, 6) -> rect (16, 208, 32, 32).
    let px = frame.pixel(32, 224).unwrap();
    assert!(px[0] >= 198 && px[1] <= 22 && px[3] == 255, "{px:?}");
    // The unmapped king's square stays untouched.
    assert_eq!(frame.pixel(16 + 4 * 32 + 16, 32), Some([0, 0, 0, 0]));
}

#[test]
fn empty_atlas_draws_nothing() {
    let board = Board {
        turn_color: Side::Black,
        pieces: vec![piece(Side::Black, PieceKind::Queen, 0, 0)],
    };
    let snap = GameSnapshot::new(
        2,
        2,
        vec![Some(Timeline {
            boards: vec![Some(board)],
        })],
        vec![],
    )
    .unwrap();
    let layout = plan_layout(&snap, Geometry::default()).unwrap();
    let mut target = RenderTarget::new(layout.canvas).unwrap();
    let counts = paint_pieces(&layout, &SpriteAtlas::empty(), &mut target);
    assert_eq!(counts.drawn, 0);
    assert_eq!(counts.without_sprite, 1);
    assert!(target.finish().data.iter().all(|&b| b == 0));
}
