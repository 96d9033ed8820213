use serde::{Deserialize, Serialize};

use crate::foundation::error::{RenderError, RenderResult};

/// Pixel-size presentation parameters.
///
/// Nothing outside rendering depends on these values; they only shape the output image.
///
/// The indicator sizes are upper bounds: the planner caps the bar and marker height to the
/// timeline row, the overhang to one slot, and the marker length to the space left on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Edge length of one board square (and of piece sprites and highlights).
    pub cell_px: u32,
    /// Thickness of the turn-colour frame around each board.
    pub border_px: u32,
    /// Height of the timeline connector bar.
    pub bar_thickness_px: u32,
    /// How far the bar runs past the right edge of the last board slot.
    pub bar_overhang_px: u32,
    /// Horizontal distance from the marker's base to its tip.
    pub marker_length_px: u32,
    /// Half the height of the marker's base.
    pub marker_half_height_px: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_px: 32,
            border_px: 6,
            bar_thickness_px: 64,
            bar_overhang_px: 16,
            marker_length_px: 64,
            marker_half_height_px: 64,
        }
    }
}

impl Geometry {
    /// Reject parameter sets that cannot produce a sensible layout.
    pub fn validate(&self) -> RenderResult<()> {
        if self.cell_px < 2 {
            return Err(RenderError::canvas("geometry cell_px must be >= 2"));
        }
        if self.bar_thickness_px == 0 {
            return Err(RenderError::canvas("geometry bar_thickness_px must be > 0"));
        }
        if self.marker_length_px == 0 || self.marker_half_height_px == 0 {
            return Err(RenderError::canvas(
                "geometry marker dimensions must be > 0",
            ));
        }
        let limit = u32::from(u16::MAX);
        let values = [
            self.cell_px,
            self.border_px,
            self.bar_thickness_px,
            self.bar_overhang_px,
            self.marker_length_px,
            self.marker_half_height_px,
        ];
        if values.iter().any(|&v| v > limit) {
            return Err(RenderError::canvas(format!(
                "geometry values must not exceed {limit}px"
            )));
        }
        Ok(())
    }

    /// Gap between a slot's edge and its board interior.
    pub fn margin_px(&self) -> u32 {
        self.cell_px / 2
    }

    /// Horizontal pitch of board slots for boards `board_width` squares wide.
    pub fn slot_width(&self, board_width: u32) -> u64 {
        (u64::from(board_width) + 1) * u64::from(self.cell_px)
    }

    /// Vertical pitch of timeline rows for boards `board_height` squares tall.
    pub fn row_height(&self, board_height: u32) -> u64 {
        (u64::from(board_height) + 1) * u64::from(self.cell_px)
    }
}
