use crate::{
    columns, error::Error, table::ColumnKind, PlayerQuery, PositionCategory, Result, Table,
};
use itertools::Itertools;
use polars::prelude::*;
use serde::Serialize;

/// Distinct values of one column, sorted ascending.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UniqueValues {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

impl UniqueValues {
    pub fn len(&self) -> usize {
        match self {
            UniqueValues::Text(values) => values.len(),
            UniqueValues::Integer(values) => values.len(),
            UniqueValues::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_strings(&self) -> Vec<String> {
        match self {
            UniqueValues::Text(values) => values.clone(),
            UniqueValues::Integer(values) => values.iter().map(i64::to_string).collect(),
            UniqueValues::Float(values) => values.iter().map(f64::to_string).collect(),
        }
    }
}

impl Table {
    /// Distinct non-null values of `column`: lexical order for text,
    /// numeric order for numbers.
    pub fn unique_values(&self, column: &str) -> Result<UniqueValues> {
        let series = self.require(column, "unique_values", ColumnKind::Any)?;
        let values = match series.dtype() {
            DataType::String => UniqueValues::Text(
                series
                    .str()?
                    .into_iter()
                    .flatten()
                    .map(str::to_owned)
                    .sorted()
                    .dedup()
                    .collect(),
            ),
            dtype if dtype.is_integer() => UniqueValues::Integer(
                series
                    .cast(&DataType::Int64)?
                    .i64()?
                    .into_iter()
                    .flatten()
                    .sorted()
                    .dedup()
                    .collect(),
            ),
            dtype if dtype.is_float() => UniqueValues::Float(
                series
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .flatten()
                    .sorted_by(f64::total_cmp)
                    .dedup_by(|a, b| a == b || (a.is_nan() && b.is_nan()))
                    .collect(),
            ),
            dtype => {
                return Err(Error::TypeMismatch {
                    column: column.to_owned(),
                    expected: "a string or numeric column",
                    found: dtype.clone(),
                })
            }
        };
        Ok(values)
    }

    /// Minimum and maximum of a numeric column, truncated to integers.
    pub fn column_range(&self, column: &str) -> Result<(i64, i64)> {
        let values = self
            .require(column, "column_range", ColumnKind::Numeric)?
            .cast(&DataType::Float64)?;
        let values = values.f64()?;
        match (values.min(), values.max()) {
            (Some(min), Some(max)) => Ok((min as i64, max as i64)),
            _ => Err(Error::EmptyColumn(column.to_owned())),
        }
    }

    /// Squads playing in any of `competitions`, or every squad when the
    /// list is empty. Sorted and without duplicates.
    pub fn squads_for_competitions<S: AsRef<str>>(
        &self,
        competitions: &[S],
    ) -> Result<Vec<String>> {
        let table = if competitions.is_empty() {
            self.clone()
        } else {
            let competitions: Vec<String> = competitions
                .iter()
                .map(|comp| comp.as_ref().to_owned())
                .collect();
            self.filter(&PlayerQuery::new().competitions(competitions))?
        };
        match table.unique_values(columns::SQUAD)? {
            UniqueValues::Text(squads) => Ok(squads),
            other => Ok(other.to_strings()),
        }
    }

    /// `Pos` of the first row whose `Player` equals `player`, `None` when no
    /// row matches. A matching row with a blank `Pos` gives an empty string,
    /// as in [`Table::records`].
    pub fn position_of(&self, player: &str) -> Result<Option<String>> {
        let players = self.column(columns::PLAYER)?.str()?;
        let positions = self.column(columns::POSITION)?.str()?;
        let position = players
            .into_iter()
            .position(|name| name == Some(player))
            .map(|row| positions.get(row).unwrap_or_default().to_owned());
        Ok(position)
    }

    pub fn category_of_player(&self, player: &str) -> Result<Option<PositionCategory>> {
        let position = self.position_of(player)?;
        Ok(position.as_deref().map(PositionCategory::of))
    }
}
