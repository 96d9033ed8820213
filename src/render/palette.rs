use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;

/// Colours used by every paint stage.
///
/// Two-entry arrays are indexed by parity (panels, tiles) or by [`crate::Side`] (borders).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Background panels, alternating by `(row + column) % 2`.
    pub panels: [Rgba8; 2],
    /// Board frame by side to move.
    pub borders: [Rgba8; 2],
    /// Light and dark squares.
    pub tiles: [Rgba8; 2],
    /// Timeline connector bar and marker.
    pub indicator: Rgba8,
    /// Move-history highlight; normally translucent.
    pub highlight: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            panels: [Rgba8::rgb(0x28, 0x28, 0x28), Rgba8::rgb(0x20, 0x20, 0x20)],
            borders: [Rgba8::rgb(0xe0, 0xe0, 0xe0), Rgba8::rgb(0x10, 0x10, 0x10)],
            tiles: [Rgba8::rgb(0xb0, 0xb0, 0xb0), Rgba8::rgb(0x50, 0x50, 0x50)],
            indicator: Rgba8::rgb(0x60, 0x60, 0x60),
            highlight: Rgba8::rgba(0xff, 0x00, 0xff, 0x60),
        }
    }
}
