use crate::data::chart::{summarize, ChartSummary};
use crate::data::clean::CleaningAction;
use crate::data::format::{decode, encode, TableFormat};
use crate::data::model::{Table, UploadedFile};
use crate::data::project::project;
use crate::error::{Result, SweepError};

/// Number of rows shown in the preview of a freshly decoded file.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Inputs: the per-file controls, passed explicitly
// ---------------------------------------------------------------------------

/// Everything the user has chosen for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileControls {
    /// Cleaning opt-in. Actions are ignored while this is off.
    pub cleaning_enabled: bool,
    /// Cleaning actions in the order the user triggered them.
    pub cleaning_actions: Vec<CleaningAction>,
    /// Columns to keep, in order. `None` keeps every column.
    pub selected_columns: Option<Vec<String>>,
    pub show_chart: bool,
    pub target: TableFormat,
    /// Encode the result to `target` as part of the run.
    pub convert: bool,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// An encoded file ready to be saved.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of running one file through the pipeline.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_name: String,
    /// First rows of the table as decoded, before any cleaning.
    pub preview: Table,
    /// Columns of the decoded table; the choices for the column selection.
    pub available_columns: Vec<String>,
    pub applied: Vec<CleaningAction>,
    /// The cleaned and projected table.
    pub table: Table,
    pub chart: ChartSummary,
    pub artifact: Option<Artifact>,
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

/// Run one file through decode → clean → project → chart → (convert).
pub fn run_file(file: &UploadedFile, controls: &FileControls) -> Result<FileOutcome> {
    let format = TableFormat::from_file_name(file.name())?;
    let decoded = decode(file.bytes(), format)?;
    log::info!(
        "Loaded {} ({} rows, columns {:?})",
        file.name(),
        decoded.row_count(),
        decoded.column_names()
    );

    let preview = decoded.head(PREVIEW_ROWS);
    let available_columns = decoded.column_names();

    let applied = if controls.cleaning_enabled {
        controls.cleaning_actions.clone()
    } else {
        Vec::new()
    };
    let cleaned = applied
        .iter()
        .fold(decoded, |table, action| action.apply(table));

    let table = match &controls.selected_columns {
        Some(selected) => project(cleaned, selected)?,
        None => cleaned,
    };

    let chart = summarize(&table);
    if let ChartSummary::NotEnoughData { numeric_columns } = chart {
        log::debug!("{}: only {numeric_columns} numeric columns, no chart", file.name());
    }

    let artifact = if controls.convert {
        Some(convert(&table, file.name(), controls.target)?)
    } else {
        None
    };

    Ok(FileOutcome {
        file_name: file.name().to_string(),
        preview,
        available_columns,
        applied,
        table,
        chart,
        artifact,
    })
}

/// Encode `table` to `target`, naming the result after `original_name`.
pub fn convert(table: &Table, original_name: &str, target: TableFormat) -> Result<Artifact> {
    let bytes = encode(table, target)?;
    let file_name = target.output_file_name(original_name);
    log::info!("Converted {original_name} → {file_name} ({} bytes)", bytes.len());
    Ok(Artifact {
        file_name,
        mime_type: target.mime_type(),
        bytes,
    })
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct FileReport {
    pub file_name: String,
    pub result: Result<FileOutcome>,
}

/// Per-file results of a batch, in the order the files were supplied.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &SweepError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.file_name.as_str(), e)))
    }

    /// Shown once every file has been attempted.
    pub fn completion_message(&self) -> String {
        match self.failed() {
            0 => "All files processed successfully!".to_string(),
            n => format!(
                "All files processed: {} succeeded, {n} failed",
                self.succeeded()
            ),
        }
    }
}

/// Run every file independently. A failing file is recorded and the batch
/// carries on with the next one.
pub fn run_batch<'a, I>(files: I) -> BatchReport
where
    I: IntoIterator<Item = (&'a UploadedFile, &'a FileControls)>,
{
    let files = files
        .into_iter()
        .map(|(file, controls)| {
            let result = run_file(file, controls);
            if let Err(e) = &result {
                log::error!("Failed to process {}: {e}", file.name());
            }
            FileReport {
                file_name: file.name().to_string(),
                result,
            }
        })
        .collect();

    let report = BatchReport { files };
    log::info!("{}", report.completion_message());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    const WIDE_CSV: &[u8] = b"id,name,a,b,c\n1,x,1,2,3\n1,x,1,2,3\n2,y,4,,6\n3,z,7,8,\n";

    fn csv_file(name: &str, body: &[u8]) -> UploadedFile {
        UploadedFile::new(name, body.to_vec())
    }

    #[test]
    fn default_controls_keep_everything() -> anyhow::Result<()> {
        let outcome = run_file(&csv_file("wide.csv", WIDE_CSV), &FileControls::default())?;

        assert_eq!(outcome.table.row_count(), 4);
        assert_eq!(outcome.available_columns, vec!["id", "name", "a", "b", "c"]);
        assert!(outcome.applied.is_empty());
        assert!(outcome.artifact.is_none());
        // id, a, b are the first three numeric columns.
        assert!(matches!(&outcome.chart, ChartSummary::Series(s) if s.column == "b"));
        Ok(())
    }

    #[test]
    fn preview_is_first_five_rows_before_cleaning() -> anyhow::Result<()> {
        let body = b"n\n1\n1\n1\n1\n1\n1\n1\n";
        let controls = FileControls {
            cleaning_enabled: true,
            cleaning_actions: vec![CleaningAction::RemoveDuplicates],
            ..FileControls::default()
        };

        let outcome = run_file(&csv_file("ones.csv", body), &controls)?;
        assert_eq!(outcome.preview.row_count(), PREVIEW_ROWS);
        assert_eq!(outcome.table.row_count(), 1);
        Ok(())
    }

    #[test]
    fn cleaning_requires_opt_in() -> anyhow::Result<()> {
        let controls = FileControls {
            cleaning_enabled: false,
            cleaning_actions: vec![CleaningAction::RemoveDuplicates],
            ..FileControls::default()
        };

        let outcome = run_file(&csv_file("wide.csv", WIDE_CSV), &controls)?;
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.table.row_count(), 4);
        Ok(())
    }

    #[test]
    fn clean_project_convert() -> anyhow::Result<()> {
        let controls = FileControls {
            cleaning_enabled: true,
            cleaning_actions: vec![
                CleaningAction::RemoveDuplicates,
                CleaningAction::FillMissingNumeric,
            ],
            selected_columns: Some(vec!["c".into(), "id".into()]),
            target: TableFormat::Csv,
            convert: true,
            ..FileControls::default()
        };

        let outcome = run_file(&csv_file("wide.csv", WIDE_CSV), &controls)?;
        assert_eq!(outcome.table.column_names(), vec!["c", "id"]);
        assert_eq!(
            outcome.table.column("c").unwrap().values(),
            &[Value::Number(3.0), Value::Number(6.0), Value::Number(4.5)]
        );
        assert!(matches!(outcome.chart, ChartSummary::NotEnoughData { numeric_columns: 2 }));

        let artifact = outcome.artifact.expect("artifact");
        assert_eq!(artifact.file_name, "wide.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(String::from_utf8(artifact.bytes)?, "c,id\n3,1\n6,2\n4.5,3\n");
        Ok(())
    }

    #[test]
    fn unknown_column_fails_the_file() {
        let controls = FileControls {
            selected_columns: Some(vec!["nope".into()]),
            ..FileControls::default()
        };
        let err = run_file(&csv_file("wide.csv", WIDE_CSV), &controls).unwrap_err();
        assert!(matches!(err, SweepError::UnknownColumn(_)));
    }

    #[test]
    fn convert_names_output_after_target() -> anyhow::Result<()> {
        let table = decode(b"letter,n\na,1\nb,2\n", TableFormat::Csv)?;
        let artifact = convert(&table, "letters.csv", TableFormat::Xlsx)?;

        assert_eq!(artifact.file_name, "letters.xlsx");
        assert_eq!(artifact.mime_type, TableFormat::Xlsx.mime_type());
        assert_eq!(decode(&artifact.bytes, TableFormat::Xlsx)?, table);
        Ok(())
    }

    #[test]
    fn unsupported_file_does_not_stop_the_batch() {
        let bad = csv_file("data.txt", b"a,b\n1,2\n");
        let good = csv_file("good.csv", b"a,b\n1,2\n");
        let controls = FileControls::default();

        let report = run_batch([(&bad, &controls), (&good, &controls)]);

        assert_eq!(report.files.len(), 2);
        assert!(matches!(
            &report.files[0].result,
            Err(SweepError::UnsupportedFormat(ext)) if ext == ".txt"
        ));
        assert_eq!(report.files[1].result.as_ref().unwrap().table.row_count(), 1);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.errors().next().unwrap().0, "data.txt");
        assert_eq!(
            report.completion_message(),
            "All files processed: 1 succeeded, 1 failed"
        );
    }

    #[test]
    fn corrupt_spreadsheet_is_reported_per_file() {
        let report = run_batch([(
            &csv_file("broken.xlsx", b"PK not really"),
            &FileControls::default(),
        )]);
        assert_eq!(report.failed(), 1);
    }
}
