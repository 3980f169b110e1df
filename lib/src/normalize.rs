use crate::{table::ColumnKind, Result, Table};
use itertools::Itertools;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Target range for [`Table::normalize`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear map of `[col_min, col_max]` onto this scale. A constant column
    /// lands on `self.min`.
    fn rescale(&self, column: &str, col_min: f64, col_max: f64) -> Expr {
        if col_max == col_min {
            return lit(self.min).alias(column);
        }
        ((col(column).cast(DataType::Float64) - lit(col_min)) / lit(col_max - col_min))
            * lit(self.max - self.min)
            + lit(self.min)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

impl Table {
    /// Rescales each listed column onto `scale` using the min and max of the
    /// rows in this table. Other columns pass through untouched.
    pub fn normalize<S: AsRef<str>>(&self, columns: &[S], scale: Scale) -> Result<Table> {
        log::trace!("table::normalize {:?}", scale);
        let mut exprs = Vec::new();
        for name in columns.iter().map(|name| name.as_ref()).unique() {
            let values = self
                .require(name, "normalize", ColumnKind::Numeric)?
                .cast(&DataType::Float64)?;
            let values = values.f64()?;
            match (values.min(), values.max()) {
                (Some(col_min), Some(col_max)) => {
                    log::debug!("normalizing {} from [{}, {}]", name, col_min, col_max);
                    exprs.push(scale.rescale(name, col_min, col_max));
                }
                // No values to scale against; keep the column as floats.
                _ => exprs.push(col(name).cast(DataType::Float64)),
            }
        }

        if exprs.is_empty() {
            return Ok(self.clone());
        }
        let df = self.lazy().with_columns(exprs).collect()?;
        Ok(Table::derived(df))
    }
}
