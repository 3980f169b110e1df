use crate::position::PositionCategory;
use serde::Serialize;
use std::collections::BTreeMap;

/// One player row: typed core fields plus whatever stat columns the table had.
///
/// Serializes to a flat object keyed by the dataset's column names.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerRecord {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Comp")]
    pub comp: String,
    #[serde(rename = "Pos")]
    pub pos: String,
    #[serde(rename = "Age")]
    pub age: Option<i64>,
    #[serde(rename = "Min")]
    pub minutes: Option<i64>,

    /// Role specific numeric columns (goals, tackles, saves...).
    #[serde(flatten)]
    pub stats: BTreeMap<String, f64>,

    /// Any other text columns, e.g. nation.
    #[serde(flatten)]
    pub labels: BTreeMap<String, String>,
}

impl PlayerRecord {
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied()
    }

    pub fn category(&self) -> PositionCategory {
        PositionCategory::of(&self.pos)
    }
}
