use crate::{columns, error::Error, record::PlayerRecord, Result};
use derive_deref::Deref;
use polars::prelude::*;
use std::fmt;
use std::path::Path;

/// What a caller needs a column to hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Any,
    Numeric,
    Text,
}

/// Immutable season table of player stats.
///
/// Every operation hands back a new `Table`; the frame behind it is only ever
/// read. Construction validates that the core columns are present and typed.
#[derive(Clone, Debug, Deref)]
pub struct Table(DataFrame);

impl Table {
    pub fn new(df: DataFrame) -> Result<Self> {
        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|name| df.column(name).is_err())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        for name in columns::TEXT {
            check_kind(df.column(name)?, ColumnKind::Text)?;
        }
        for name in columns::NUMERIC {
            check_kind(df.column(name)?, ColumnKind::Numeric)?;
        }
        Ok(Table(df))
    }

    /// Loads a comma separated file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, b',')
    }

    pub fn load_with<P: AsRef<Path>>(path: P, separator: u8) -> Result<Self> {
        log::trace!("table::load {}", path.as_ref().display());
        let df = crate::load_csv(path, separator)?;
        let table = Self::new(df)?;
        log::debug!(
            "{} players loaded with {} columns",
            table.height(),
            table.width()
        );
        Ok(table)
    }

    /// Wraps a frame derived from an already validated table.
    pub(crate) fn derived(df: DataFrame) -> Self {
        Table(df)
    }

    pub(crate) fn lazy(&self) -> LazyFrame {
        self.0.clone().lazy()
    }

    /// Looks up a column on behalf of `option`, failing loudly when it is
    /// absent or holds the wrong kind of values.
    pub(crate) fn require(
        &self,
        column: &str,
        option: &'static str,
        kind: ColumnKind,
    ) -> Result<&Series> {
        let series = self.0.column(column).map_err(|_| Error::UnknownColumn {
            option,
            column: column.to_owned(),
        })?;
        check_kind(series, kind)?;
        Ok(series)
    }

    /// Converts every row into a typed record, preserving row order.
    pub fn records(&self) -> Result<Vec<PlayerRecord>> {
        let players = self.text_values(columns::PLAYER)?;
        let squads = self.text_values(columns::SQUAD)?;
        let comps = self.text_values(columns::COMPETITION)?;
        let positions = self.text_values(columns::POSITION)?;
        let ages = self.whole_values(columns::AGE)?;
        let minutes = self.whole_values(columns::MINUTES)?;

        let mut stats = Vec::new();
        let mut labels = Vec::new();
        for series in self.0.get_columns() {
            let name = series.name();
            if columns::REQUIRED.contains(&name) {
                continue;
            }
            if series.dtype().is_numeric() {
                let values: Vec<Option<f64>> = series
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .collect();
                stats.push((name.to_owned(), values));
            } else if series.dtype() == &DataType::String {
                labels.push((name.to_owned(), self.text_values(name)?));
            }
        }

        let records = (0..self.height())
            .map(|row| PlayerRecord {
                player: players[row].clone().unwrap_or_default(),
                squad: squads[row].clone().unwrap_or_default(),
                comp: comps[row].clone().unwrap_or_default(),
                pos: positions[row].clone().unwrap_or_default(),
                age: ages[row],
                minutes: minutes[row],
                stats: stats
                    .iter()
                    .filter_map(|(name, values)| values[row].map(|v| (name.clone(), v)))
                    .collect(),
                labels: labels
                    .iter()
                    .filter_map(|(name, values)| {
                        values[row].as_ref().map(|v| (name.clone(), v.clone()))
                    })
                    .collect(),
            })
            .collect();
        Ok(records)
    }

    fn text_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        let values = self
            .0
            .column(column)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect();
        Ok(values)
    }

    fn whole_values(&self, column: &str) -> Result<Vec<Option<i64>>> {
        let values = self
            .0
            .column(column)?
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .collect();
        Ok(values)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_kind(series: &Series, kind: ColumnKind) -> Result<()> {
    let dtype = series.dtype();
    let expected = match kind {
        ColumnKind::Numeric if !dtype.is_numeric() => "a numeric column",
        ColumnKind::Text if dtype != &DataType::String => "a string column",
        _ => return Ok(()),
    };
    Err(Error::TypeMismatch {
        column: series.name().to_owned(),
        expected,
        found: dtype.clone(),
    })
}
