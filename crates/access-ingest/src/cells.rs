//! Typed column construction from loosely typed cells.
//!
//! Document exports and SQLite rows carry a type per value rather than per
//! column. Cells are collected per column and the narrowest Polars dtype
//! that holds every non-null value is chosen.

use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

use crate::polars_utils::format_numeric;

/// A single loosely typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(format_numeric(*v)),
            Self::Bool(v) => Some(v.to_string()),
            Self::Text(v) => Some(v.clone()),
        }
    }
}

/// Column type chosen for a set of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    /// Infers the kind from the non-null cells, or None when all are null.
    pub fn infer(cells: &[CellValue]) -> Option<Self> {
        let mut kind: Option<Self> = None;
        for cell in cells {
            let cell_kind = match cell {
                CellValue::Null => continue,
                CellValue::Int(_) => Self::Integer,
                CellValue::Float(_) => Self::Float,
                CellValue::Bool(_) => Self::Boolean,
                CellValue::Text(_) => Self::Text,
            };
            kind = Some(match (kind, cell_kind) {
                (None, next) => next,
                (Some(current), next) if current == next => current,
                (Some(Self::Integer), Self::Float) | (Some(Self::Float), Self::Integer) => {
                    Self::Float
                }
                _ => Self::Text,
            });
        }
        kind
    }
}

/// Builds a typed column. `fallback` is used when every cell is null.
pub fn build_column(name: &str, cells: &[CellValue], fallback: ColumnKind) -> Column {
    let kind = ColumnKind::infer(cells).unwrap_or(fallback);
    let series = match kind {
        ColumnKind::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    CellValue::Int(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    CellValue::Int(v) => Some(*v as f64),
                    CellValue::Float(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    CellValue::Bool(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Text => {
            let values: Vec<Option<String>> = cells.iter().map(CellValue::as_text).collect();
            Series::new(name.into(), values)
        }
    };
    series.into_column()
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn integers_and_floats_widen_to_float() {
        let cells = vec![CellValue::Int(4), CellValue::Null, CellValue::Float(2.5)];
        assert_eq!(ColumnKind::infer(&cells), Some(ColumnKind::Float));
        let column = build_column("satisfaction_score", &cells, ColumnKind::Text);
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn mixed_kinds_fall_back_to_text() {
        let cells = vec![CellValue::Int(1), CellValue::Text("two".into())];
        let column = build_column("value", &cells, ColumnKind::Integer);
        assert_eq!(column.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = column.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("1"), Some("two")]);
    }

    #[test]
    fn all_null_uses_fallback() {
        let cells = vec![CellValue::Null, CellValue::Null];
        assert_eq!(ColumnKind::infer(&cells), None);
        let column = build_column("age", &cells, ColumnKind::Integer);
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.len(), 2);
    }
}
