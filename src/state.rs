use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::clean::CleaningAction;
use crate::data::format::TableFormat;
use crate::data::model::UploadedFile;
use crate::error::SweepError;
use crate::pipeline::{self, Artifact, FileControls, FileOutcome};

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// One opened file, the controls chosen for it and its latest pipeline run.
pub struct FileSession {
    pub file: UploadedFile,
    pub controls: FileControls,
    pub outcome: Result<FileOutcome, SweepError>,
    /// Success message of the last cleaning action, if any.
    pub notice: Option<&'static str>,
    /// Result of the last convert click, waiting to be downloaded.
    pub artifact: Option<Artifact>,
}

impl FileSession {
    pub fn from_outcome(
        file: UploadedFile,
        controls: FileControls,
        outcome: Result<FileOutcome, SweepError>,
    ) -> Self {
        FileSession {
            file,
            controls,
            outcome,
            notice: None,
            artifact: None,
        }
    }

    /// Re-run the pipeline with the current controls. A pending conversion
    /// and the last cleaning notice describe the old table, so both are dropped.
    pub fn rerun(&mut self) {
        self.outcome = pipeline::run_file(&self.file, &self.controls);
        self.artifact = None;
        self.notice = None;
        if let Err(e) = &self.outcome {
            log::error!("Failed to process {}: {e}", self.file.name());
        }
    }

    /// Columns currently selected, in order (all columns by default).
    pub fn selected_columns(&self) -> Vec<String> {
        match (&self.controls.selected_columns, &self.outcome) {
            (Some(selected), _) => selected.clone(),
            (None, Ok(outcome)) => outcome.available_columns.clone(),
            (None, Err(_)) => Vec::new(),
        }
    }
}

/// A change requested from one file's panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FileAction {
    SetCleaning(bool),
    Clean(CleaningAction),
    SetColumn { name: String, keep: bool },
    SetShowChart(bool),
    SetTarget(TableFormat),
    Convert,
    Download,
    Close,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Opened files in the order they were added.
    pub sessions: Vec<FileSession>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Read and process the given paths. A file that cannot be read is
    /// reported and skipped; the others are still added.
    pub fn open_files(&mut self, paths: &[PathBuf]) {
        let mut problems = Vec::new();
        let files: Vec<UploadedFile> = paths
            .iter()
            .filter_map(|path| match read_upload(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::error!("{e:#}");
                    problems.push(format!("{e:#}"));
                    None
                }
            })
            .collect();

        let controls = FileControls::default();
        let report = pipeline::run_batch(files.iter().map(|file| (file, &controls)));

        problems.extend(report.errors().map(|(name, e)| format!("{name}: {e}")));
        self.status_message = Some(if problems.is_empty() {
            report.completion_message()
        } else {
            format!("Error: {}", problems.join("; "))
        });

        for (file, file_report) in files.into_iter().zip(report.files) {
            self.sessions.push(FileSession::from_outcome(
                file,
                controls.clone(),
                file_report.result,
            ));
        }
    }

    /// Apply a panel action to the session at `index`.
    pub fn apply(&mut self, index: usize, action: FileAction) {
        if action == FileAction::Close {
            if index < self.sessions.len() {
                let removed = self.sessions.remove(index);
                log::info!("Closed {}", removed.file.name());
            }
            return;
        }

        let Some(session) = self.sessions.get_mut(index) else {
            return;
        };

        match action {
            FileAction::SetCleaning(enabled) => {
                session.controls.cleaning_enabled = enabled;
                if !enabled {
                    session.controls.cleaning_actions.clear();
                }
                session.rerun();
            }
            FileAction::Clean(cleaning) => {
                if !session.controls.cleaning_enabled {
                    return;
                }
                session.controls.cleaning_actions.push(cleaning);
                session.rerun();
                if session.outcome.is_ok() {
                    session.notice = Some(cleaning.success_message());
                }
            }
            FileAction::SetColumn { name, keep } => {
                let mut selected = session.selected_columns();
                selected.retain(|c| *c != name);
                if keep {
                    selected.push(name);
                }
                session.controls.selected_columns = Some(selected);
                session.rerun();
            }
            FileAction::SetShowChart(show) => session.controls.show_chart = show,
            FileAction::SetTarget(target) => {
                session.controls.target = target;
                session.artifact = None;
            }
            FileAction::Convert => {
                let converted = match &session.outcome {
                    Ok(outcome) => {
                        pipeline::convert(&outcome.table, session.file.name(), session.controls.target)
                    }
                    Err(_) => return,
                };
                match converted {
                    Ok(artifact) => session.artifact = Some(artifact),
                    Err(e) => {
                        log::error!("Failed to convert {}: {e}", session.file.name());
                        self.status_message = Some(format!("Error: {e}"));
                    }
                }
            }
            FileAction::Download => {
                if let Some(artifact) = &session.artifact {
                    match save_artifact_dialog(artifact) {
                        Ok(Some(path)) => {
                            self.status_message = Some(format!("Saved {}", path.display()));
                        }
                        Ok(None) => {}
                        Err(e) => {
                            log::error!("{e:#}");
                            self.status_message = Some(format!("Error: {e:#}"));
                        }
                    }
                }
            }
            FileAction::Close => {}
        }
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    UploadedFile::from_path(path).with_context(|| format!("reading {}", path.display()))
}

/// Ask where to save `artifact` and write it there. `Ok(None)` when cancelled.
fn save_artifact_dialog(artifact: &Artifact) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&artifact.file_name)
        .save_file()
    else {
        return Ok(None);
    };

    write_artifact(artifact, &path)?;
    Ok(Some(path))
}

pub fn write_artifact(artifact: &Artifact, path: &Path) -> Result<()> {
    std::fs::write(path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Saved {} ({}, {} bytes)",
        path.display(),
        artifact.mime_type,
        artifact.bytes.len()
    );
    Ok(())
}
