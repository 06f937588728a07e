//! Column type inference for the contributions table.
//!
//! A CSV cell is only text, but the dashboard expects amounts as JSON numbers.
//! Types are decided per column, looking at every cell of it:
//! - missing cells (empty or one of the usual "not available" markers) don't vote
//! - integers everywhere give an integer column, unless something is missing,
//!   in which case it's a float column (there is no integer `null` in a dataframe)
//! - numbers with at least one non-integer give a float column
//! - `true`/`false` in any of the usual spellings give a boolean column
//! - anything else makes it a text column, where cells are kept verbatim

use serde_json::Value;

/// Cell contents considered "not available"; they become `null`.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// No value at all in the column
    Empty,
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    /// Type of a single present cell.
    fn of_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.parse::<i64>().is_ok() {
            ColumnType::Integer
        } else if trimmed.parse::<f64>().is_ok() {
            ColumnType::Float
        } else if parse_bool(trimmed).is_some() {
            ColumnType::Boolean
        } else {
            ColumnType::Text
        }
    }

    /// Smallest type able to hold values of both `self` and `other`.
    fn widen(self, other: Self) -> Self {
        use ColumnType::*;
        match (self, other) {
            (Empty, t) | (t, Empty) => t,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Text,
        }
    }

    /// Infers the type of a column from all its cells, `None` being a missing one.
    pub fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut has_missing = false;
        let mut column_type = ColumnType::Empty;
        for cell in cells {
            match cell {
                Some(cell) => column_type = column_type.widen(Self::of_cell(cell)),
                None => has_missing = true,
            }
            if column_type == ColumnType::Text {
                break;
            }
        }
        if column_type == ColumnType::Integer && has_missing {
            ColumnType::Float
        } else {
            column_type
        }
    }

    /// Converts a cell of a column of this type into its JSON value.
    pub fn to_value(self, cell: Option<String>) -> Value {
        let Some(cell) = cell else {
            return Value::Null;
        };
        match self {
            ColumnType::Empty => Value::Null,
            ColumnType::Integer => cell
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(cell)),
            // non-finite floats have no JSON representation, `Value::from` turns them into null
            ColumnType::Float => cell
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or(Value::String(cell)),
            ColumnType::Boolean => parse_bool(cell.trim())
                .map(Value::Bool)
                .unwrap_or(Value::String(cell)),
            ColumnType::Text => Value::String(cell),
        }
    }
}
