use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain error – everything that can end one file's pipeline
// ---------------------------------------------------------------------------

/// Errors raised while decoding, transforming or encoding a single file.
///
/// None of these are fatal to the application: the pipeline records them
/// against the file that produced them and moves on to the next one.
#[derive(Debug, Error)]
pub enum SweepError {
    /// File extension is not one of the supported tabular formats.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Row {row}: expected {expected} fields, found {found}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' has {found} values but the table has {expected} rows")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    /// Table does not fit into a single worksheet.
    #[error("Table exceeds worksheet limits: {0}")]
    SheetLimit(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_extension() {
        let err = SweepError::UnsupportedFormat(".txt".to_owned());
        assert_eq!(err.to_string(), "Unsupported file type: .txt");
    }

    #[test]
    fn row_too_long_reports_counts() {
        let err = SweepError::RowTooLong {
            row: 3,
            expected: 2,
            found: 4,
        };
        assert_eq!(err.to_string(), "Row 3: expected 2 fields, found 4");
    }
}
