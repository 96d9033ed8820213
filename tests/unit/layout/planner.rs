use super::*;
use crate::snapshot::parse::{Board, PieceKind};

fn board(turn: Side, pieces: Vec<Piece>) -> Board {
    Board {
        turn_color: turn,
        pieces: pieces.into_iter().map(Some).collect(),
    }
}

fn empty_board() -> Board {
    board(Side::White, vec![])
}

fn timeline(slots: Vec<Option<Board>>) -> Option<Timeline> {
    Some(Timeline { boards: slots })
}

fn snapshot(w: u32, h: u32, timelines: Vec<Option<Timeline>>) -> GameSnapshot {
    GameSnapshot::new(w, h, timelines, vec![]).unwrap()
}

fn plan(snap: &GameSnapshot) -> Layout {
    LayoutPlanner::default().plan(snap).unwrap()
}

#[test]
fn single_board_geometry_matches_defaults() {
    let pawn = Piece {
        color: Side::White,
        kind: PieceKind::Pawn,
        x: 0,
        y: 6,
    };
    let snap = snapshot(8, 8, vec![timeline(vec![Some(board(Side::White, vec![pawn]))])]);
    let layout = plan(&snap);

    assert_eq!(layout.canvas, Canvas { width: 576, height: 288 });
    assert_eq!(layout.slot_width, 288);
    assert_eq!(layout.row_height, 288);
    assert_eq!(layout.panel_columns, 1);

    let (_, b) = layout.boards().next().unwrap();
    assert_eq!(b.interior, PixelRect::new(16, 16, 256, 256));
    assert_eq!(b.border, PixelRect::new(10, 10, 268, 268));
    assert_eq!(b.pieces.len(), 1);
    assert_eq!(b.pieces[0].rect, PixelRect::new(16, 208, 32, 32));
}

#[test]
fn indicator_spans_boards_and_ends_in_marker() {
    let snap = snapshot(8, 8, vec![timeline(vec![Some(empty_board())])]);
    let layout = plan(&snap);
    let ind = layout.timeline(0).unwrap().indicator.unwrap();

    assert_eq!(ind.bar, PixelRect::new(0, 112, 304, 64));
    assert_eq!(
        ind.marker,
        [
            Point::new(304.0, 80.0),
            Point::new(368.0, 144.0),
            Point::new(304.0, 208.0)
        ]
    );
}

#[test]
fn canvas_height_scales_linearly_with_rows() {
    let one = plan(&snapshot(8, 8, vec![timeline(vec![Some(empty_board())])]));
    let two = plan(&snapshot(
        8,
        8,
        vec![timeline(vec![Some(empty_board())]); 2],
    ));
    let four = plan(&snapshot(
        8,
        8,
        vec![timeline(vec![Some(empty_board())]); 4],
    ));

    assert_eq!(two.canvas.height, one.canvas.height * 2);
    assert_eq!(four.canvas.height, one.canvas.height * 4);
    assert_eq!(one.canvas.width, two.canvas.width);
}

#[test]
fn canvas_width_follows_half_of_row_length_plus_one() {
    let width_for = |len: usize| {
        let slots = vec![Some(empty_board()); len];
        plan(&snapshot(8, 8, vec![timeline(slots)])).canvas.width
    };
    let panel = 2 * 288;
    assert_eq!(width_for(1), panel);
    assert_eq!(width_for(2), 2 * panel);
    assert_eq!(width_for(3), 2 * panel);
    assert_eq!(width_for(4), 3 * panel);
}

#[test]
fn max_row_length_counts_absent_slots() {
    let snap = snapshot(
        8,
        8,
        vec![
            timeline(vec![Some(empty_board())]),
            timeline(vec![None, None, None, Some(empty_board())]),
        ],
    );
    let layout = plan(&snap);
    assert_eq!(layout.max_row_length, 4);
    assert_eq!(layout.panel_columns, 3);
}

#[test]
fn leading_absent_slots_are_compacted() {
    let piece = Piece {
        color: Side::Black,
        kind: PieceKind::King,
        x: 3,
        y: 3,
    };
    let lone = plan(&snapshot(
        8,
        8,
        vec![timeline(vec![Some(board(Side::Black, vec![piece]))])],
    ));
    let shifted = plan(&snapshot(
        8,
        8,
        vec![timeline(vec![None, None, Some(board(Side::Black, vec![piece]))])],
    ));

    let (_, a) = lone.boards().next().unwrap();
    let (tl, b) = shifted.boards().next().unwrap();
    assert_eq!(tl.compaction_offset, 2);
    assert_eq!(b.slot, 2);
    assert_eq!(b.column, 0);
    assert_eq!(a.interior, b.interior);
    assert_eq!(a.pieces[0].rect, b.pieces[0].rect);
    assert_eq!(
        lone.timeline(0).unwrap().indicator,
        shifted.timeline(0).unwrap().indicator
    );
}

#[test]
fn compaction_is_per_timeline() {
    let snap = snapshot(
        8,
        8,
        vec![
            timeline(vec![Some(empty_board()), Some(empty_board())]),
            timeline(vec![None, Some(empty_board())]),
        ],
    );
    let layout = plan(&snap);
    assert_eq!(layout.timeline(0).unwrap().compaction_offset, 0);
    assert_eq!(layout.timeline(1).unwrap().compaction_offset, 1);
    assert_eq!(
        layout.timeline(1).unwrap().boards[0].interior,
        PixelRect::new(16, 288 + 16, 256, 256)
    );
}

#[test]
fn interior_gap_keeps_column_and_bar_reaches_last_board() {
    let snap = snapshot(
        8,
        8,
        vec![timeline(vec![Some(empty_board()), None, Some(empty_board())])],
    );
    let layout = plan(&snap);
    let tl = layout.timeline(0).unwrap();
    assert_eq!(tl.boards[1].column, 2);
    assert_eq!(tl.indicator.unwrap().bar.right(), 3 * 288 + 16);
}

#[test]
fn absent_and_empty_timelines_have_no_indicator() {
    let snap = snapshot(8, 8, vec![None, timeline(vec![None, None])]);
    let layout = plan(&snap);
    assert!(layout.timeline(0).is_none());
    assert!(layout.timeline(1).unwrap().indicator.is_none());
    assert_eq!(layout.row_count, 2);
    assert_eq!(layout.boards().count(), 0);
}

#[test]
fn rows_use_board_height_on_non_square_boards() {
    let snap = snapshot(4, 2, vec![timeline(vec![Some(empty_board())]); 3]);
    let layout = plan(&snap);
    assert_eq!(layout.slot_width, 5 * 32);
    assert_eq!(layout.row_height, 3 * 32);
    assert_eq!(layout.canvas.height, 3 * 3 * 32);
    assert_eq!(
        layout.timeline(2).unwrap().boards[0].interior,
        PixelRect::new(16, 2 * 96 + 16, 128, 64)
    );
}

#[test]
fn panels_tile_the_whole_canvas() {
    let snap = snapshot(8, 8, vec![timeline(vec![Some(empty_board()); 3]); 2]);
    let layout = plan(&snap);
    let panels: Vec<_> = layout.panel_rects().collect();
    assert_eq!(panels.len(), 2 * 2);
    let covered: u64 = panels
        .iter()
        .map(|(_, _, r)| u64::from(r.width) * u64::from(r.height))
        .sum();
    assert_eq!(covered, layout.canvas.area());
    assert_eq!(panels[3], (1, 1, PixelRect::new(576, 288, 576, 288)));
}

#[test]
fn piece_outside_board_is_a_bounds_error() {
    let stray = Piece {
        color: Side::White,
        kind: PieceKind::Rook,
        x: 8,
        y: 0,
    };
    let snap = snapshot(
        8,
        8,
        vec![timeline(vec![None, Some(board(Side::White, vec![stray]))])],
    );
    let err = LayoutPlanner::default().plan(&snap).unwrap_err();
    assert!(matches!(err, RenderError::Bounds(_)));
    let msg = err.to_string();
    assert!(msg.contains("timeline 0 board 1"), "{msg}");
    assert!(msg.contains("(8, 0)"), "{msg}");
}

#[test]
fn empty_snapshot_is_a_canvas_error() {
    let snap = snapshot(8, 8, vec![]);
    assert!(matches!(
        LayoutPlanner::default().plan(&snap),
        Err(RenderError::Canvas(_))
    ));
}

#[test]
fn oversized_canvas_is_rejected_before_allocation() {
    let snap = snapshot(8, 8, vec![timeline(vec![Some(empty_board()); 500])]);
    let err = LayoutPlanner::default().plan(&snap).unwrap_err();
    assert!(matches!(err, RenderError::Canvas(_)));
    assert!(err.to_string().contains("raster limit"));
}

#[test]
fn custom_geometry_changes_pitch() {
    let geometry = Geometry {
        cell_px: 10,
        border_px: 2,
        ..Geometry::default()
    };
    let snap = snapshot(8, 8, vec![timeline(vec![Some(empty_board())])]);
    let layout = plan_layout(&snap, geometry).unwrap();
    assert_eq!(layout.slot_width, 90);
    let (_, b) = layout.boards().next().unwrap();
    assert_eq!(b.interior, PixelRect::new(5, 5, 80, 80));
    assert_eq!(b.border, PixelRect::new(3, 3, 84, 84));
}

#[test]
fn invalid_geometry_is_rejected() {
    let geometry = Geometry {
        cell_px: 1,
        ..Geometry::default()
    };
    let snap = snapshot(8, 8, vec![timeline(vec![Some(empty_board())])]);
    assert!(matches!(
        plan_layout(&snap, geometry),
        Err(RenderError::Canvas(_))
    ));
}

#[test]
fn indicator_is_capped_to_its_row_and_the_canvas() {
    let snap = snapshot(1, 1, vec![timeline(vec![Some(empty_board())]); 2]);
    let layout = plan(&snap);
    assert_eq!(layout.canvas, Canvas { width: 128, height: 128 });

    let ind = layout.timeline(1).unwrap().indicator.unwrap();
    assert_eq!(ind.bar, PixelRect::new(0, 64, 80, 64));
    assert_eq!(
        ind.marker,
        [
            Point::new(80.0, 64.0),
            Point::new(128.0, 96.0),
            Point::new(80.0, 128.0),
        ]
    );
    for p in ind.marker {
        assert!(p.x <= 128.0 && (64.0..=128.0).contains(&p.y), "{p:?}");
    }
}
