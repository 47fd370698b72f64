//! CSV helpers for the import dialog and for local rendering.
//!
//! The server owns parsing of imported files and the canonical export. The
//! client only shows the first few records of a file before uploading it, and
//! can render its in-memory matrix in the same column layout
//! (`Category, Type, <12 month names>`) for display.
use std::io::Read;

use csv::{ReaderBuilder, Writer};

use crate::{BudgetMatrix, Month, ResultEngine};

/// Number of records shown before an import is confirmed.
pub const PREVIEW_ROWS: usize = 5;

/// Raw first records of a CSV file, for visual confirmation only.
///
/// Records are split by a real CSV parser (quoted fields may contain commas)
/// but are not checked against the expected columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvPreview {
    pub rows: Vec<Vec<String>>,
}

impl CsvPreview {
    /// Reads at most `max_rows` records from `reader`.
    pub fn from_reader<R: Read>(reader: R, max_rows: usize) -> ResultEngine<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::with_capacity(max_rows);
        for record in reader.records().take(max_rows) {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn from_bytes(bytes: &[u8]) -> ResultEngine<Self> {
        Self::from_reader(bytes, PREVIEW_ROWS)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest record, to size preview tables.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Header row of the projection CSV layout.
pub fn csv_header() -> Vec<&'static str> {
    ["Category", "Type"]
        .into_iter()
        .chain(Month::all().map(Month::name))
        .collect()
}

/// Renders the matrix in the projection CSV layout, amounts in major units
/// with two decimals.
pub fn render_csv(matrix: &BudgetMatrix) -> ResultEngine<String> {
    let mut writer = Writer::from_writer(vec![]);
    writer.write_record(csv_header())?;

    for category in matrix
        .income_categories()
        .iter()
        .chain(matrix.expense_categories())
    {
        let mut record = vec![category.name.clone(), category.kind().as_str().to_string()];
        record.extend(
            category
                .months()
                .iter()
                .map(|amount| format!("{:.2}", amount.to_major())),
        );
        writer.write_record(&record)?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
