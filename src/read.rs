use crate::{
    data::{ContributionRow, Error, SchemaError, SummaryRow, EXPENSE_COLUMN, INCOME_COLUMN},
    infer::{is_missing, ColumnType},
};
use rust_decimal::Decimal;
use std::{fs::File, io::ErrorKind, path::Path, str::FromStr};
use tracing::debug;

/// Trait for doing something with a `SummaryRow` read from a CSV file. Used by
/// the aggregation to accumulate totals, but also used in tests to check we
/// read the correct rows from a CSV stream.
pub(crate) trait SummaryUser {
    fn use_row(&mut self, row: SummaryRow) -> Result<(), SchemaError>;
}

/// Opens an input table, telling a missing file apart from other I/O errors.
pub(crate) fn open_input(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, SchemaError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
}

fn parse_amount(record: &csv::StringRecord, index: usize, column: &str) -> Result<Decimal, SchemaError> {
    let line = record.position().map_or(0, |p| p.line());
    let cell = record.get(index).unwrap_or_default();
    if cell.is_empty() {
        return Err(SchemaError::MissingValue {
            column: column.to_string(),
            line,
        });
    }
    let not_numeric = || SchemaError::NotNumeric {
        column: column.to_string(),
        line,
        value: cell.to_string(),
    };
    // `Decimal` happily skips `_` separators, a spreadsheet export never has them
    if cell.contains('_') {
        return Err(not_numeric());
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .map_err(|_| not_numeric())
}

/// Reads the financial summary, handing each period to `user`. The first
/// failing row stops the reading: a partial sum is of no use to anybody.
pub(crate) fn read_summary<R: std::io::Read, U: SummaryUser>(
    reader: R,
    user: &mut U,
) -> Result<(), SchemaError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let income = column_index(&headers, INCOME_COLUMN)?;
    let expense = column_index(&headers, EXPENSE_COLUMN)?;
    let mut count = 0usize;
    for result in rdr.records() {
        let record = result?;
        user.use_row(SummaryRow {
            income: parse_amount(&record, income, INCOME_COLUMN)?,
            expense: parse_amount(&record, expense, EXPENSE_COLUMN)?,
        })?;
        count += 1;
    }
    debug!("read {count} summary rows");
    Ok(())
}

/// Names blank columns `Unnamed: <index>` and gives duplicate column names a
/// `.1`, `.2`... suffix so that no field overwrites another one in the output
/// object.
fn unique_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let header = if header.is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };
        let mut name = header.clone();
        let mut n = 0;
        while names.contains(&name) {
            n += 1;
            name = format!("{header}.{n}");
        }
        names.push(name);
    }
    names
}

/// Reads the contributions table into records, in table order, with cell
/// values typed per column (see `infer`).
pub(crate) fn read_contributions<R: std::io::Read>(
    reader: R,
) -> Result<Vec<ContributionRow>, SchemaError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = unique_headers(rdr.headers()?);
    if headers.is_empty() {
        return Err(SchemaError::NoHeader);
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(SchemaError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(
            (0..headers.len())
                .map(|i| record.get(i).filter(|cell| !is_missing(cell)).map(str::to_owned))
                .collect(),
        );
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|i| ColumnType::infer(rows.iter().map(|row| row[i].as_deref())))
        .collect();
    debug!("contribution columns: {:?}", headers.iter().zip(&types).collect::<Vec<_>>());

    Ok(rows
        .into_iter()
        .map(|cells| ContributionRow {
            fields: headers
                .iter()
                .cloned()
                .zip(cells.into_iter().zip(&types).map(|(cell, t)| t.to_value(cell)))
                .collect(),
        })
        .collect())
}
