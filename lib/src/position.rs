use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Coarse role grouping used to pick which stat columns to compare.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    FromStr,
    Serialize,
    Deserialize,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionCategory {
    Attack,
    Defense,
    Goalkeeper,
}

impl PositionCategory {
    pub const ALL: [PositionCategory; 3] = [
        PositionCategory::Attack,
        PositionCategory::Defense,
        PositionCategory::Goalkeeper,
    ];

    /// Maps a raw position code to its category. Codes outside the table,
    /// compound ones like "DF,MF" included, count as attack.
    pub fn of(code: &str) -> Self {
        match code {
            "FW" | "MF" => PositionCategory::Attack,
            "DF" => PositionCategory::Defense,
            "GK" => PositionCategory::Goalkeeper,
            _ => PositionCategory::Attack,
        }
    }

    /// Stat columns compared for players of this category.
    pub fn stat_columns(&self) -> &'static [&'static str] {
        match self {
            PositionCategory::Attack => &["Min", "Gls", "Ast", "KP", "PrgC"],
            PositionCategory::Defense => &["Min", "Tkl", "TklW", "Blocks", "Int", "Clr"],
            PositionCategory::Goalkeeper => &["Min", "GA", "Saves", "Save%", "CS"],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PositionCategory::Attack => "Attacking Player Comparison",
            PositionCategory::Defense => "Defensive Player Comparison",
            PositionCategory::Goalkeeper => "Goalkeeper Comparison",
        }
    }
}

pub fn category_of(code: &str) -> PositionCategory {
    PositionCategory::of(code)
}

/// Human readable name for a stat column, or the column code itself.
pub fn stat_label(column: &str) -> &str {
    match column {
        "Min" => "Minutes Played",
        "Gls" => "Goals",
        "Ast" => "Assists",
        "KP" => "Key Passes",
        "PrgC" => "Progressive Carries",
        "Tkl" => "Tackles",
        "TklW" => "Tackles Won",
        "Blocks" => "Blocks",
        "Int" => "Interceptions",
        "Clr" => "Clearances",
        "GA" => "Goals Against",
        "Saves" => "Saves",
        "Save%" => "Save Percentage",
        "CS" => "Clean Sheets",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("FW", PositionCategory::Attack)]
    #[case("MF", PositionCategory::Attack)]
    #[case("DF", PositionCategory::Defense)]
    #[case("GK", PositionCategory::Goalkeeper)]
    #[case("DF,MF", PositionCategory::Attack)]
    #[case("gk", PositionCategory::Attack)]
    #[case("", PositionCategory::Attack)]
    fn maps_position_codes(#[case] code: &str, #[case] expected: PositionCategory) {
        assert_eq!(category_of(code), expected);
    }

    #[test]
    fn displays_and_parses_uppercase() {
        assert_eq!(PositionCategory::Goalkeeper.to_string(), "GOALKEEPER");
        assert_eq!(
            "DEFENSE".parse::<PositionCategory>().unwrap(),
            PositionCategory::Defense
        );
        assert!("defense".parse::<PositionCategory>().is_err());
    }

    #[test]
    fn every_category_compares_minutes() {
        for category in PositionCategory::ALL {
            assert_eq!(category.stat_columns()[0], "Min");
        }
    }

    #[test]
    fn labels_fall_back_to_code() {
        assert_eq!(stat_label("PrgC"), "Progressive Carries");
        assert_eq!(stat_label("xAG"), "xAG");
    }
}
