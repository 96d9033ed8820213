use crate::layout::planner::Layout;
use crate::render::palette::Palette;
use crate::render::target::RenderTarget;

/// Paint the connector bar and arrow marker of every timeline that has boards.
///
/// Returns the number of indicators painted.
pub fn paint_indicators(layout: &Layout, palette: &Palette, target: &mut RenderTarget) -> usize {
    let mut painted = 0;
    for indicator in layout.timelines.iter().flatten().filter_map(|tl| tl.indicator) {
        target.fill_rect(indicator.bar, palette.indicator);
        target.fill_polygon(&indicator.marker, palette.indicator);
        painted += 1;
    }
    painted
}

#[cfg(test)]
#[path = "../../tests/unit/render/indicators.rs"]
mod tests;
