use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{Column, Table, Value};
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// TableFormat – the closed set of formats we read and write
// ---------------------------------------------------------------------------

/// Supported tabular formats. Used both as the decode hint derived from a
/// file name and as the conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    Xlsx,
}

impl TableFormat {
    pub const ALL: [TableFormat; 2] = [TableFormat::Csv, TableFormat::Xlsx];

    /// Pick a format by file extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" => Ok(TableFormat::Xlsx),
            other => Err(SweepError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TableFormat::Csv => "text/csv",
            TableFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Name shown next to the conversion radio buttons.
    pub fn label(self) -> &'static str {
        match self {
            TableFormat::Csv => "CSV",
            TableFormat::Xlsx => "Excel",
        }
    }

    /// `report.csv` → `report.xlsx`: the original stem plus this format's extension.
    pub fn output_file_name(self, original: &str) -> String {
        let stem = Path::new(original)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(original);
        format!("{stem}.{}", self.extension())
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Decode raw bytes into a [`Table`].
pub fn decode(bytes: &[u8], format: TableFormat) -> Result<Table> {
    match format {
        TableFormat::Csv => decode_csv(bytes),
        TableFormat::Xlsx => decode_xlsx(bytes),
    }
}

/// Encode a [`Table`] into bytes. No row-index column is ever written.
pub fn encode(table: &Table, format: TableFormat) -> Result<Vec<u8>> {
    match format {
        TableFormat::Csv => encode_csv(table),
        TableFormat::Xlsx => encode_xlsx(table),
    }
}

// ---------------------------------------------------------------------------
// Shared decoding helpers
// ---------------------------------------------------------------------------

/// Tokens read as missing values, matching the defaults dataframe tools use.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_field(field: &str) -> Value {
    if NA_TOKENS.contains(&field) {
        return Value::Missing;
    }
    match field.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => Value::Number(v),
        _ => Value::Text(field.to_string()),
    }
}

/// Type one CSV column from its raw fields (`None` for padding). A column
/// holding both numbers and text keeps every field exactly as written.
fn csv_column_values(fields: Vec<Option<String>>) -> Vec<Value> {
    let parsed: Vec<Value> = fields
        .iter()
        .map(|f| f.as_deref().map_or(Value::Missing, parse_field))
        .collect();

    let has_text = parsed.iter().any(|v| matches!(v, Value::Text(_)));
    let has_number = parsed.iter().any(|v| matches!(v, Value::Number(_)));
    if !(has_text && has_number) {
        return parsed;
    }

    fields
        .into_iter()
        .zip(parsed)
        .map(|(raw, value)| match (raw, value) {
            (Some(raw), Value::Number(_)) => Value::Text(raw),
            (_, value) => value,
        })
        .collect()
}

/// Make header names unique: blanks become `Unnamed: i`, repeats get `.1`, `.2`, …
fn unique_column_names(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

/// Assemble column-major data into a table.
fn build_table(headers: Vec<String>, columns: Vec<Vec<Value>>) -> Result<Table> {
    let columns = unique_column_names(headers)
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn decode_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(SweepError::NoColumns);
    }

    let width = headers.len();
    let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(SweepError::RowTooLong {
                row: row_no + 1,
                expected: width,
                found: record.len(),
            });
        }
        for (col_idx, column) in fields.iter_mut().enumerate() {
            // Short rows are padded with missing values.
            column.push(record.get(col_idx).map(str::to_string));
        }
    }

    let columns = fields.into_iter().map(csv_column_values).collect();
    let table = build_table(headers, columns)?;
    log::debug!(
        "Decoded CSV: {} rows × {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns().iter().map(Column::name))?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_field()))?;
    }
    writer.into_inner().map_err(|e| SweepError::Io(e.into_error()))
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) if f.is_nan() => Value::Missing,
        Data::Float(f) => Value::Number(*f),
        Data::String(s) if s.is_empty() => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(if *b { "True" } else { "False" }.to_string()),
        Data::Empty | Data::Error(_) => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) => Value::Number(*f).to_field(),
        other => other.to_string(),
    }
}

/// Read the first worksheet; its first row holds the column names.
fn decode_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SweepError::NoWorksheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_header).collect(),
        None => return Err(SweepError::NoColumns),
    };

    let width = headers.len();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); width];
    for row in rows {
        for (col_idx, values) in columns.iter_mut().enumerate() {
            values.push(row.get(col_idx).map_or(Value::Missing, cell_to_value));
        }
    }

    let table = build_table(headers, columns)?;
    log::debug!(
        "Decoded XLSX: {} rows × {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Rows in one Excel worksheet, header row included.
const XLSX_MAX_ROWS: usize = 1_048_576;
/// Columns in one Excel worksheet.
const XLSX_MAX_COLUMNS: usize = 16_384;

/// Write a single `Sheet1` worksheet with a bold header row.
fn encode_xlsx(table: &Table) -> Result<Vec<u8>> {
    if table.column_count() > XLSX_MAX_COLUMNS {
        return Err(SweepError::SheetLimit(format!(
            "{} columns, at most {XLSX_MAX_COLUMNS} fit",
            table.column_count()
        )));
    }
    if table.row_count() >= XLSX_MAX_ROWS {
        return Err(SweepError::SheetLimit(format!(
            "{} rows, at most {} fit below the header",
            table.row_count(),
            XLSX_MAX_ROWS - 1
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;
    let header_format = Format::new().set_bold();

    // Both indices are within the limits checked above.
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string_with_format(0, col, column.name(), &header_format)?;

        for (row_idx, value) in column.values().iter().enumerate() {
            let row = (row_idx + 1) as u32;
            match value {
                Value::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                Value::Missing => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
