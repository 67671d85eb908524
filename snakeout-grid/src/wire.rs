//! Serde records exchanged with the callers of the engine: obstacle and
//! snake inputs, and the level JSON items the encoder emits.

use crate::cell::Cell;

/// One `{row, col}` entry of a wire-format path or cell list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: i32,
    pub col: i32,
}

impl From<CellRef> for Cell {
    fn from(r: CellRef) -> Cell {
        Cell::new(r.row, r.col)
    }
}

impl From<Cell> for CellRef {
    fn from(c: Cell) -> CellRef {
        CellRef {
            row: c.row,
            col: c.col,
        }
    }
}

/// A tagged obstacle record as sent by the editor.
///
/// `type` is kept as a plain string so unknown tags surface as a typed input
/// error instead of a deserialization failure. Single-cell obstacles carry
/// `row`/`col`; multi-cell walls carry `cells`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<CellRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ObstacleRecord {
    /// Every cell this record names, whether given as `row`/`col` or `cells`.
    pub fn positions(&self) -> Vec<Cell> {
        if !self.cells.is_empty() {
            self.cells.iter().copied().map(Cell::from).collect()
        } else if let (Some(row), Some(col)) = (self.row, self.col) {
            vec![Cell::new(row, col)]
        } else {
            Vec::new()
        }
    }
}

/// A snake as sent to the validate / difficulty / fill entry points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnakeRecord {
    #[serde(default)]
    pub path: Vec<CellRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One position in the exported level, origin at the bounding-box centroid,
/// `y` growing upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPosition {
    pub x: i32,
    pub y: i32,
}

/// The per-item payload under `itemValueConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValueConfig {
    WallBreak { count: u32 },
    Tunnel {
        #[serde(rename = "directX")]
        direct_x: i32,
        #[serde(rename = "directY")]
        direct_y: i32,
    },
    Number(u32),
}

/// One record of the exported level JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelItem {
    #[serde(rename = "itemID")]
    pub item_id: u32,
    #[serde(rename = "itemType")]
    pub item_type: String,
    pub position: Vec<ClientPosition>,
    #[serde(rename = "colorID")]
    pub color_id: Option<i32>,
    #[serde(rename = "itemValueConfig")]
    pub item_value_config: Option<ItemValueConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_record_prefers_cells_over_row_col() {
        let rec: ObstacleRecord = serde_json::from_str(
            r#"{"type":"wall","row":9,"col":9,"cells":[{"row":1,"col":2},{"row":1,"col":3}]}"#,
        )
        .unwrap();
        assert_eq!(rec.positions(), vec![Cell::new(1, 2), Cell::new(1, 3)]);
    }

    #[test]
    fn level_item_serializes_with_client_field_names() {
        let item = LevelItem {
            item_id: 7,
            item_type: "tunel".to_owned(),
            position: vec![ClientPosition { x: -1, y: 2 }],
            color_id: None,
            item_value_config: Some(ItemValueConfig::Tunnel {
                direct_x: 1,
                direct_y: 0,
            }),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemID"], 7);
        assert_eq!(json["itemType"], "tunel");
        assert_eq!(json["itemValueConfig"]["directX"], 1);
        assert!(json["colorID"].is_null());
    }

    #[test]
    fn item_value_config_roundtrips_wall_break_counts() {
        let cfg = ItemValueConfig::WallBreak { count: 3 };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"count":3}"#);
        let back: ItemValueConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
