use serde::{Deserialize, Serialize};

/// JSON boundary form of a stored game state.
///
/// Only the fields the renderer needs are declared; everything else the store keeps alongside
/// them is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotDef {
    pub(crate) board_width: u32,
    pub(crate) board_height: u32,
    pub(crate) timelines: Vec<Option<TimelineDef>>,
    pub(crate) movement_visuals: Vec<[u32; 4]>,
    #[serde(default)]
    pub(crate) visual_order: VisualOrderDef,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum VisualOrderDef {
    #[default]
    Tbxy,
    Btxy,
}

/// A timeline is stored as `{ "boards": [...] }`; bare arrays are accepted too.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TimelineDef {
    pub(crate) boards: Vec<Option<BoardDef>>,
}

impl<'de> Deserialize<'de> for TimelineDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Errors raised inside a board keep their field names (untagged enums drop them).
        struct TimelineVisitor;

        impl<'de> serde::de::Visitor<'de> for TimelineVisitor {
            type Value = TimelineDef;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a timeline object with `boards` or an array of board slots")
            }

            fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let boards = Vec::<Option<BoardDef>>::deserialize(
                    serde::de::value::SeqAccessDeserializer::new(seq),
                )?;
                Ok(TimelineDef { boards })
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                #[derive(Deserialize)]
                struct Obj {
                    boards: Vec<Option<BoardDef>>,
                }

                let obj = Obj::deserialize(serde::de::value::MapAccessDeserializer::new(map))?;
                Ok(TimelineDef { boards: obj.boards })
            }
        }

        deserializer.deserialize_any(TimelineVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardDef {
    pub(crate) turn_color: u32,
    pub(crate) pieces: Vec<Option<PieceDef>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct PieceDef {
    pub(crate) color: u32,
    #[serde(rename = "type")]
    pub(crate) kind: u32,
    pub(crate) x: u32,
    pub(crate) y: u32,
}
