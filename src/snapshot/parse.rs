use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{RenderError, RenderResult};
use crate::snapshot::model::{BoardDef, PieceDef, SnapshotDef, TimelineDef, VisualOrderDef};

/// Side marker used for piece colour and for the side to move.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum Side {
    /// Stored as `0`.
    White,
    /// Stored as `1`.
    Black,
}

impl Side {
    /// Decode the stored `0`/`1` marker.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::White),
            1 => Some(Self::Black),
            _ => None,
        }
    }

    /// Stored marker value, usable as a two-entry table index.
    pub fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl TryFrom<u32> for Side {
    type Error = String;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("side must be 0 or 1, got {id}"))
    }
}

impl From<Side> for u32 {
    fn from(side: Side) -> Self {
        side.index() as u32
    }
}

/// Enumerated piece kind.
///
/// Ids without a named variant are kept as [`PieceKind::Other`]; they are valid input and simply
/// have no sprite by default.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub enum PieceKind {
    /// Id `1`.
    Master,
    /// Id `2`.
    King,
    /// Id `3`.
    Queen,
    /// Id `4`.
    Bishop,
    /// Id `5`.
    Knight,
    /// Id `6`.
    Rook,
    /// Id `7`.
    Pawn,
    /// Id `8`.
    Unicorn,
    /// Id `9`.
    Dragon,
    /// Any other id, including the reserved `0`.
    Other(u32),
}

impl PieceKind {
    /// Decode a stored type id.
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => Self::Master,
            2 => Self::King,
            3 => Self::Queen,
            4 => Self::Bishop,
            5 => Self::Knight,
            6 => Self::Rook,
            7 => Self::Pawn,
            8 => Self::Unicorn,
            9 => Self::Dragon,
            other => Self::Other(other),
        }
    }

    /// Stored type id.
    pub fn id(self) -> u32 {
        match self {
            Self::Master => 1,
            Self::King => 2,
            Self::Queen => 3,
            Self::Bishop => 4,
            Self::Knight => 5,
            Self::Rook => 6,
            Self::Pawn => 7,
            Self::Unicorn => 8,
            Self::Dragon => 9,
            Self::Other(id) => id,
        }
    }
}

impl From<u32> for PieceKind {
    fn from(id: u32) -> Self {
        Self::from_id(id)
    }
}

impl From<PieceKind> for u32 {
    fn from(kind: PieceKind) -> Self {
        kind.id()
    }
}

/// One piece on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Piece {
    /// Owning side.
    pub color: Side,
    /// Piece kind; selects the sprite.
    pub kind: PieceKind,
    /// Column, `0..board_width` for a well-formed snapshot.
    pub x: u32,
    /// Row, `0..board_height` for a well-formed snapshot.
    pub y: u32,
}

/// One played board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Side to move; drives the border tint.
    pub turn_color: Side,
    /// Sparse piece slots.
    pub pieces: Vec<Option<Piece>>,
}

impl Board {
    /// Present pieces with their slot index.
    pub fn present_pieces(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i, p)))
    }
}

/// One branch of the game: sparse board slots indexed by ply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Board slots; a leading run of `None` precedes the branch point.
    pub boards: Vec<Option<Board>>,
}

impl Timeline {
    /// Number of leading absent slots.
    pub fn compaction_offset(&self) -> usize {
        self.boards.iter().take_while(|b| b.is_none()).count()
    }

    /// Number of present boards.
    pub fn present_count(&self) -> usize {
        self.boards.iter().filter(|b| b.is_some()).count()
    }

    /// Present boards with their slot index.
    pub fn present_boards(&self) -> impl Iterator<Item = (usize, &Board)> {
        self.boards
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (i, b)))
    }

    /// Board at `slot`, if present.
    pub fn board(&self, slot: usize) -> Option<&Board> {
        self.boards.get(slot).and_then(Option::as_ref)
    }
}

/// Field order of the four-integer movement visual records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum VisualOrder {
    /// `[timeline, board, x, y]`, the order stored game states use.
    #[default]
    TimelineBoardXY,
    /// `[board, timeline, x, y]`.
    BoardTimelineXY,
}

/// One highlighted square from the move history.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MovementVisual {
    /// Timeline index.
    pub timeline: u32,
    /// Board slot within the timeline (before compaction).
    pub board: u32,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl MovementVisual {
    /// Decode a stored record according to `order`.
    pub fn from_fields(order: VisualOrder, fields: [u32; 4]) -> Self {
        let [a, b, x, y] = fields;
        match order {
            VisualOrder::TimelineBoardXY => Self {
                timeline: a,
                board: b,
                x,
                y,
            },
            VisualOrder::BoardTimelineXY => Self {
                timeline: b,
                board: a,
                x,
                y,
            },
        }
    }
}

/// Immutable, validated game snapshot.
///
/// Built fresh for every render from the stored document and discarded afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    board_width: u32,
    board_height: u32,
    timelines: Vec<Option<Timeline>>,
    movement_visuals: Vec<MovementVisual>,
    visual_order: VisualOrder,
}

impl GameSnapshot {
    /// Build a snapshot from already-typed parts.
    ///
    /// Board dimensions must be positive. Piece and highlight coordinates are checked later,
    /// when the layout is planned.
    pub fn new(
        board_width: u32,
        board_height: u32,
        timelines: Vec<Option<Timeline>>,
        movement_visuals: Vec<MovementVisual>,
    ) -> RenderResult<Self> {
        if board_width == 0 {
            return Err(RenderError::parse("boardWidth must be > 0"));
        }
        if board_height == 0 {
            return Err(RenderError::parse("boardHeight must be > 0"));
        }
        Ok(Self {
            board_width,
            board_height,
            timelines,
            movement_visuals,
            visual_order: VisualOrder::default(),
        })
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(s: &str) -> RenderResult<Self> {
        let def: SnapshotDef = serde_json::from_str(s)
            .map_err(|e| RenderError::parse(format!("snapshot JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse a snapshot from a JSON reader.
    #[tracing::instrument(skip(r))]
    pub fn from_reader<R: std::io::Read>(r: R) -> RenderResult<Self> {
        let def: SnapshotDef = serde_json::from_reader(r)
            .map_err(|e| RenderError::parse(format!("snapshot JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse a snapshot from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RenderError::parse(format!("open snapshot JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub(crate) fn from_def(def: SnapshotDef) -> RenderResult<Self> {
        let SnapshotDef {
            board_width,
            board_height,
            timelines,
            movement_visuals,
            visual_order,
        } = def;

        let timelines = timelines
            .into_iter()
            .enumerate()
            .map(|(t, tl)| tl.map(|tl| convert_timeline(t, tl)).transpose())
            .collect::<RenderResult<Vec<_>>>()?;

        let visual_order = match visual_order {
            VisualOrderDef::Tbxy => VisualOrder::TimelineBoardXY,
            VisualOrderDef::Btxy => VisualOrder::BoardTimelineXY,
        };
        let movement_visuals = movement_visuals
            .into_iter()
            .map(|fields| MovementVisual::from_fields(visual_order, fields))
            .collect();

        let mut out = Self::new(board_width, board_height, timelines, movement_visuals)?;
        out.visual_order = visual_order;
        tracing::debug!(
            timelines = out.timelines.len(),
            movement_visuals = out.movement_visuals.len(),
            "parsed snapshot"
        );
        Ok(out)
    }

    /// Board width in squares.
    pub fn board_width(&self) -> u32 {
        self.board_width
    }

    /// Board height in squares.
    pub fn board_height(&self) -> u32 {
        self.board_height
    }

    /// Timeline rows, `None` for timelines not yet created.
    pub fn timelines(&self) -> &[Option<Timeline>] {
        &self.timelines
    }

    /// Timeline at `index`, if present.
    pub fn timeline(&self, index: usize) -> Option<&Timeline> {
        self.timelines.get(index).and_then(Option::as_ref)
    }

    /// Highlight records in input order.
    pub fn movement_visuals(&self) -> &[MovementVisual] {
        &self.movement_visuals
    }

    /// Field order the highlight records were decoded with.
    pub fn visual_order(&self) -> VisualOrder {
        self.visual_order
    }
}

fn convert_timeline(t: usize, def: TimelineDef) -> RenderResult<Timeline> {
    let boards = def
        .boards
        .into_iter()
        .enumerate()
        .map(|(b, board)| board.map(|board| convert_board(t, b, board)).transpose())
        .collect::<RenderResult<Vec<_>>>()?;
    Ok(Timeline { boards })
}

fn convert_board(t: usize, b: usize, def: BoardDef) -> RenderResult<Board> {
    let turn_color = Side::from_id(def.turn_color).ok_or_else(|| {
        RenderError::parse(format!(
            "timelines[{t}].boards[{b}].turnColor must be 0 or 1, got {}",
            def.turn_color
        ))
    })?;
    let pieces = def
        .pieces
        .into_iter()
        .enumerate()
        .map(|(p, piece)| piece.map(|piece| convert_piece(t, b, p, piece)).transpose())
        .collect::<RenderResult<Vec<_>>>()?;
    Ok(Board { turn_color, pieces })
}

fn convert_piece(t: usize, b: usize, p: usize, def: PieceDef) -> RenderResult<Piece> {
    let color = Side::from_id(def.color).ok_or_else(|| {
        RenderError::parse(format!(
            "timelines[{t}].boards[{b}].pieces[{p}].color must be 0 or 1, got {}",
            def.color
        ))
    })?;
    Ok(Piece {
        color,
        kind: PieceKind::from_id(def.kind),
        x: def.x,
        y: def.y,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/parse.rs"]
mod tests;
