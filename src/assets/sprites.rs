use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::decode::{PreparedImage, decode_sprite, premultiply_rgba8_in_place};
use crate::foundation::error::{RenderError, RenderResult};
use crate::snapshot::parse::{PieceKind, Side};

/// Atlas lookup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteKey {
    /// Piece colour.
    pub color: Side,
    /// Piece kind.
    pub kind: PieceKind,
}

/// One `(colour, kind) -> path` row of a [`SpriteTable`] in its JSON form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteEntry {
    /// Piece colour (`0`/`1`).
    pub color: Side,
    /// Piece type id.
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Asset path relative to the sprite root.
    pub path: String,
}

/// Injectable mapping from `(colour, kind)` to a sprite asset path.
///
/// Pairs without an entry render nothing. The default table covers the seven classic kinds for
/// both sides; unicorns, dragons and unknown ids are left unmapped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SpriteEntry>", into = "Vec<SpriteEntry>")]
pub struct SpriteTable {
    entries: BTreeMap<SpriteKey, String>,
}

impl Default for SpriteTable {
    fn default() -> Self {
        const NAMES: [(PieceKind, &str); 7] = [
            (PieceKind::Master, "Master"),
            (PieceKind::King, "King"),
            (PieceKind::Queen, "Queen"),
            (PieceKind::Bishop, "Bishop"),
            (PieceKind::Knight, "Knight"),
            (PieceKind::Rook, "Rook"),
            (PieceKind::Pawn, "Pawn"),
        ];

        let mut table = Self::empty();
        for (color, suffix) in [(Side::White, 'W'), (Side::Black, 'B')] {
            for (kind, name) in NAMES {
                table.insert(color, kind, format!("Pieces/64px/{name}{suffix}.png"));
            }
        }
        table
    }
}

impl From<Vec<SpriteEntry>> for SpriteTable {
    fn from(entries: Vec<SpriteEntry>) -> Self {
        let mut table = Self::empty();
        for e in entries {
            table.insert(e.color, e.kind, e.path);
        }
        table
    }
}

impl From<SpriteTable> for Vec<SpriteEntry> {
    fn from(table: SpriteTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(key, path)| SpriteEntry {
                color: key.color,
                kind: key.kind,
                path,
            })
            .collect()
    }
}

impl SpriteTable {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Parse a table from a JSON array of [`SpriteEntry`] rows.
    pub fn from_reader<R: std::io::Read>(r: R) -> RenderResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RenderError::asset(format!("parse sprite table JSON: {e}")))
    }

    /// Parse a table from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RenderError::asset(format!("open sprite table '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Map `(color, kind)` to `path`, returning the previous path if any.
    pub fn insert(&mut self, color: Side, kind: PieceKind, path: impl Into<String>) -> Option<String> {
        self.entries.insert(SpriteKey { color, kind }, path.into())
    }

    /// Path mapped to `(color, kind)`.
    pub fn get(&self, color: Side, kind: PieceKind) -> Option<&str> {
        self.entries
            .get(&SpriteKey { color, kind })
            .map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of mapped pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decoded sprite, ready to be painted.
#[derive(Clone)]
pub struct PreparedSprite {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for PreparedSprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedSprite")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixmap_ptr", &Arc::as_ptr(&self.pixmap))
            .finish()
    }
}

impl PreparedSprite {
    fn from_image(img: &PreparedImage) -> RenderResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        Ok(Self {
            width: img.width,
            height: img.height,
            pixmap: Arc::new(pixmap),
        })
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Preloaded sprites keyed by `(colour, kind)`.
///
/// All file IO and decoding happens when the atlas is built; rendering only reads from it.
/// Share one atlas between renders behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<SpriteKey, PreparedSprite>,
}

impl SpriteAtlas {
    /// Atlas without sprites; every piece renders nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read and decode every entry of `table` below `root`.
    ///
    /// SVG entries are rasterized at `cell_px`. Any unreadable or undecodable entry fails the
    /// whole preparation.
    #[tracing::instrument(skip(table, root), fields(entries = table.len()))]
    pub fn prepare(table: &SpriteTable, root: impl AsRef<Path>, cell_px: u32) -> RenderResult<Self> {
        let root = root.as_ref();
        let mut atlas = Self::empty();
        for (key, rel) in table.iter() {
            let norm = normalize_rel_path(rel)?;
            let path = root.join(Path::new(&norm));
            let bytes = std::fs::read(&path).map_err(|e| {
                RenderError::asset(format!("failed to read sprite '{}': {e}", path.display()))
            })?;
            atlas.insert_encoded(key.color, key.kind, &norm, &bytes, cell_px)?;
        }
        tracing::debug!(sprites = atlas.len(), root = %root.display(), "prepared sprite atlas");
        Ok(atlas)
    }

    /// Decode `bytes` (named `name`, used to pick the decoder) into the slot for `(color, kind)`.
    pub fn insert_encoded(
        &mut self,
        color: Side,
        kind: PieceKind,
        name: &str,
        bytes: &[u8],
        cell_px: u32,
    ) -> RenderResult<()> {
        let img = decode_sprite(name, bytes, cell_px)
            .map_err(|e| RenderError::asset(format!("sprite '{name}': {e}")))?;
        self.sprites
            .insert(SpriteKey { color, kind }, PreparedSprite::from_image(&img)?);
        Ok(())
    }

    /// Store straight-alpha RGBA8 pixels as the sprite for `(color, kind)`.
    pub fn insert_rgba(
        &mut self,
        color: Side,
        kind: PieceKind,
        width: u32,
        height: u32,
        mut rgba: Vec<u8>,
    ) -> RenderResult<()> {
        premultiply_rgba8_in_place(&mut rgba);
        let img = PreparedImage {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        };
        self.sprites
            .insert(SpriteKey { color, kind }, PreparedSprite::from_image(&img)?);
        Ok(())
    }

    /// Sprite for `(color, kind)`, if mapped.
    pub fn get(&self, color: Side, kind: PieceKind) -> Option<&PreparedSprite> {
        self.sprites.get(&SpriteKey { color, kind })
    }

    /// Number of prepared sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// `true` when no sprite is prepared.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Normalize a sprite-root-relative path.
///
/// Uses `/` separators, drops `.` segments, and rejects absolute paths and `..` traversal.
pub(crate) fn normalize_rel_path(source: &str) -> RenderResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(RenderError::asset(format!(
            "sprite path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(RenderError::asset(format!(
                "sprite path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(RenderError::asset("sprite path must contain a file name"));
    }
    Ok(out.join("/"))
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> RenderResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RenderError::asset("sprite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RenderError::asset("sprite height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(RenderError::asset("sprite has zero area"));
    }
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RenderError::asset("sprite byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprites.rs"]
mod tests;
