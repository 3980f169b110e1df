use crate::{columns, table::ColumnKind, Result, Table};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A string predicate over one column: a single value is compared for
/// equality, a list is tested for membership.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Equals(String),
    OneOf(Vec<String>),
}

impl Selection {
    fn expr(&self, column: &str) -> Expr {
        match self {
            Selection::Equals(value) => col(column).eq(lit(value.as_str())),
            Selection::OneOf(values) => col(column).is_in(lit(Series::new(column, values))),
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::Equals(value.to_owned())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::Equals(value)
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Selection::OneOf(values)
    }
}

impl From<Vec<&str>> for Selection {
    fn from(values: Vec<&str>) -> Self {
        Selection::OneOf(values.into_iter().map(str::to_owned).collect())
    }
}

/// Set of AND-combined predicates. Unset options do not filter; an unset
/// threshold behaves like the default of 0 for non-negative stats.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerQuery {
    pub min_goals: Option<f64>,
    pub min_assists: Option<f64>,
    pub competitions: Option<Selection>,
    pub squads: Option<Selection>,
    /// Inclusive on both ends.
    pub age_range: Option<(i64, i64)>,
    pub min_minutes: Option<f64>,
}

struct Predicate {
    option: &'static str,
    column: &'static str,
    kind: ColumnKind,
    expr: Expr,
}

impl PlayerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_goals(mut self, goals: f64) -> Self {
        self.min_goals = Some(goals);
        self
    }

    pub fn min_assists(mut self, assists: f64) -> Self {
        self.min_assists = Some(assists);
        self
    }

    pub fn competitions(mut self, competitions: impl Into<Selection>) -> Self {
        self.competitions = Some(competitions.into());
        self
    }

    pub fn squads(mut self, squads: impl Into<Selection>) -> Self {
        self.squads = Some(squads.into());
        self
    }

    pub fn age_range(mut self, low: i64, high: i64) -> Self {
        self.age_range = Some((low, high));
        self
    }

    pub fn min_minutes(mut self, minutes: f64) -> Self {
        self.min_minutes = Some(minutes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(goals) = self.min_goals {
            predicates.push(Predicate {
                option: "min_goals",
                column: columns::GOALS,
                kind: ColumnKind::Numeric,
                expr: col(columns::GOALS).gt_eq(lit(goals)),
            });
        }
        if let Some(assists) = self.min_assists {
            predicates.push(Predicate {
                option: "min_assists",
                column: columns::ASSISTS,
                kind: ColumnKind::Numeric,
                expr: col(columns::ASSISTS).gt_eq(lit(assists)),
            });
        }
        if let Some(competitions) = &self.competitions {
            predicates.push(Predicate {
                option: "competitions",
                column: columns::COMPETITION,
                kind: ColumnKind::Text,
                expr: competitions.expr(columns::COMPETITION),
            });
        }
        if let Some(squads) = &self.squads {
            predicates.push(Predicate {
                option: "squads",
                column: columns::SQUAD,
                kind: ColumnKind::Text,
                expr: squads.expr(columns::SQUAD),
            });
        }
        if let Some((low, high)) = self.age_range {
            predicates.push(Predicate {
                option: "age_range",
                column: columns::AGE,
                kind: ColumnKind::Numeric,
                expr: col(columns::AGE).is_between(lit(low), lit(high), ClosedInterval::Both),
            });
        }
        if let Some(minutes) = self.min_minutes {
            predicates.push(Predicate {
                option: "min_minutes",
                column: columns::MINUTES,
                kind: ColumnKind::Numeric,
                expr: col(columns::MINUTES).gt_eq(lit(minutes)),
            });
        }
        predicates
    }

    /// Builds the combined filter expression, checking every referenced
    /// column against the table first.
    pub fn build(&self, table: &Table) -> Result<Expr> {
        let mut filter_expr: Option<Expr> = None;
        for predicate in self.predicates() {
            table.require(predicate.column, predicate.option, predicate.kind)?;
            filter_expr = match filter_expr.take() {
                Some(existing_expr) => Some(existing_expr.and(predicate.expr)),
                None => Some(predicate.expr),
            };
        }
        Ok(filter_expr.unwrap_or_else(|| lit(true)))
    }
}

impl Table {
    /// Keeps the rows passing every predicate of `query`, in their original
    /// order. An empty result is not an error.
    pub fn filter(&self, query: &PlayerQuery) -> Result<Table> {
        log::trace!("table::filter {:?}", query);
        let filter = query.build(self)?;
        let df = self.lazy().filter(filter).collect()?;
        log::debug!("{} of {} players match", df.height(), self.height());
        Ok(Table::derived(df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, names};
    use crate::Error;

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let table = testing::players();
        let filtered = table.filter(&PlayerQuery::new()).unwrap();
        assert!(filtered.equals(&table));
    }

    #[test]
    fn min_goals_keeps_only_scorers() {
        let table = testing::players();
        let filtered = table.filter(&PlayerQuery::new().min_goals(5.0)).unwrap();
        assert_eq!(names(&filtered), vec!["Ben Okafor", "Emil Berg"]);
    }

    #[test]
    fn two_row_goal_threshold() {
        let df = df!(
            "Player" => &["Low", "High"],
            "Squad" => &["Arsenal", "Arsenal"],
            "Comp" => &["Premier League", "Premier League"],
            "Pos" => &["FW", "FW"],
            "Age" => &[22i64, 22],
            "Min" => &[600i64, 900],
            "Gls" => &[1i64, 10],
            "Ast" => &[0i64, 5],
        )
        .unwrap();
        let table = Table::new(df).unwrap();
        let filtered = table.filter(&PlayerQuery::new().min_goals(5.0)).unwrap();
        assert_eq!(names(&filtered), vec!["High"]);
    }

    #[test]
    fn threshold_keeps_every_qualifying_row() {
        let table = testing::players();
        let filtered = table.filter(&PlayerQuery::new().min_assists(1.0)).unwrap();
        let expected: Vec<String> = table
            .records()
            .unwrap()
            .into_iter()
            .filter(|r| r.stat("Ast").unwrap() >= 1.0)
            .map(|r| r.player)
            .collect();
        assert_eq!(names(&filtered), expected);
    }

    #[test]
    fn single_competition_is_equality() {
        let table = testing::players();
        let filtered = table
            .filter(&PlayerQuery::new().competitions("La Liga"))
            .unwrap();
        assert_eq!(names(&filtered), vec!["Ben Okafor", "Dani Ruiz"]);
    }

    #[test]
    fn competition_list_is_membership() {
        let table = testing::players();
        let query = PlayerQuery::new().competitions(vec!["Bundesliga", "Premier League"]);
        let filtered = table.filter(&query).unwrap();
        assert_eq!(
            names(&filtered),
            vec!["Ana Silva", "Carl Meyer", "Emil Berg"]
        );
    }

    #[test]
    fn empty_squad_list_matches_nothing() {
        let table = testing::players();
        let filtered = table
            .filter(&PlayerQuery::new().squads(Vec::<String>::new()))
            .unwrap();
        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn age_range_is_inclusive() {
        let table = testing::players();
        let filtered = table.filter(&PlayerQuery::new().age_range(18, 24)).unwrap();
        assert_eq!(
            names(&filtered),
            vec!["Ana Silva", "Ben Okafor", "Emil Berg"]
        );
    }

    #[test]
    fn predicates_combine_conjunctively() {
        let table = testing::players();
        let query = PlayerQuery::new()
            .squads(vec!["Arsenal", "Real Madrid"])
            .min_minutes(500.0)
            .min_goals(1.0);
        let filtered = table.filter(&query).unwrap();
        assert_eq!(names(&filtered), vec!["Ana Silva", "Ben Okafor"]);
        assert_eq!(table.height(), 5);
    }

    #[test]
    fn strict_filter_returns_empty_table() {
        let table = testing::players();
        let filtered = table.filter(&PlayerQuery::new().min_goals(99.0)).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.width(), table.width());
    }

    #[test]
    fn unknown_stat_column_fails_loudly() {
        let table = Table::derived(testing::players().drop("Gls").unwrap());
        match table.filter(&PlayerQuery::new().min_goals(1.0)) {
            Err(Error::UnknownColumn { option, column }) => {
                assert_eq!(option, "min_goals");
                assert_eq!(column, "Gls");
            }
            other => panic!("expected unknown column, got {:?}", other),
        }
    }

    #[test]
    fn unset_threshold_does_not_need_its_column() {
        let table = Table::derived(testing::players().drop_many(&["Gls", "Ast"]));
        let filtered = table.filter(&PlayerQuery::new().min_minutes(900.0)).unwrap();
        assert_eq!(
            names(&filtered),
            vec!["Ben Okafor", "Carl Meyer", "Dani Ruiz"]
        );
    }

    #[test]
    fn deserializes_scalar_and_list_selections() {
        let query: PlayerQuery = serde_json::from_str(
            r#"{"competitions": "La Liga", "squads": ["Arsenal"], "age_range": [18, 35]}"#,
        )
        .unwrap();
        assert_eq!(
            query.competitions,
            Some(Selection::Equals("La Liga".into()))
        );
        assert_eq!(query.squads, Some(Selection::OneOf(vec!["Arsenal".into()])));
        assert_eq!(query.age_range, Some((18, 35)));
        assert_eq!(query.min_goals, None);
    }

    #[test]
    fn rejects_unknown_query_options() {
        let result = serde_json::from_str::<PlayerQuery>(r#"{"min_tackles": 3}"#);
        assert!(result.is_err());
    }
}
