use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::core::PixelRect;
use crate::foundation::error::{RenderError, RenderResult};
use crate::layout::planner::Layout;
use crate::render::palette::Palette;
use crate::render::target::RenderTarget;
use crate::snapshot::parse::{GameSnapshot, MovementVisual};

/// What to do with a highlight whose timeline or board slot is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsentBoardPolicy {
    /// Drop the record and count it.
    #[default]
    Skip,
    /// Fail the render with a bounds error.
    Reject,
}

/// Highlight squares resolved against a layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightPlan {
    /// One rect per distinct record, in record order.
    pub rects: Vec<PixelRect>,
    /// Records dropped under [`AbsentBoardPolicy::Skip`].
    pub skipped: usize,
}

/// Resolve the snapshot's movement visuals to cell rectangles.
///
/// Records are de-duplicated and sorted. Board slots go through the owning timeline's compaction
/// offset so a highlight lands on the same square a piece there would.
pub fn plan_highlights(
    snapshot: &GameSnapshot,
    layout: &Layout,
    policy: AbsentBoardPolicy,
) -> RenderResult<HighlightPlan> {
    let bw = snapshot.board_width();
    let bh = snapshot.board_height();

    let mut distinct = BTreeSet::new();
    let mut skipped = 0;
    for (i, mv) in snapshot.movement_visuals().iter().enumerate() {
        if mv.x >= bw || mv.y >= bh {
            return Err(RenderError::bounds(format!(
                "movement visual {i} at ({}, {}) lies outside the {bw}x{bh} board",
                mv.x, mv.y
            )));
        }

        let timeline = snapshot.timeline(mv.timeline as usize);
        let present = timeline.is_some_and(|tl| tl.board(mv.board as usize).is_some());
        if !present {
            match policy {
                AbsentBoardPolicy::Skip => {
                    tracing::debug!(
                        record = i,
                        timeline = mv.timeline,
                        board = mv.board,
                        "movement visual targets an absent board; skipped"
                    );
                    skipped += 1;
                    continue;
                }
                AbsentBoardPolicy::Reject => {
                    return Err(RenderError::bounds(format!(
                        "movement visual {i} targets absent board {} on timeline {}",
                        mv.board, mv.timeline
                    )));
                }
            }
        }

        distinct.insert(*mv);
    }

    let rects = distinct
        .into_iter()
        .map(|mv| highlight_rect(snapshot, layout, mv))
        .collect();
    Ok(HighlightPlan { rects, skipped })
}

fn highlight_rect(snapshot: &GameSnapshot, layout: &Layout, mv: MovementVisual) -> PixelRect {
    let offset = snapshot
        .timeline(mv.timeline as usize)
        .map_or(0, |tl| tl.compaction_offset() as u32);
    layout.cell_rect(mv.timeline, mv.board - offset, mv.x, mv.y)
}

/// Paint each planned highlight once with the translucent highlight colour.
pub fn paint_highlights(plan: &HighlightPlan, palette: &Palette, target: &mut RenderTarget) -> usize {
    for rect in &plan.rects {
        target.fill_rect(*rect, palette.highlight);
    }
    plan.rects.len()
}

#[cfg(test)]
#[path = "../../tests/unit/render/highlights.rs"]
mod tests;
