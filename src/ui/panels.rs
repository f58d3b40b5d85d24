use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::chart::{ChartSummary, MIN_NUMERIC_COLUMNS};
use crate::data::clean::CleaningAction;
use crate::data::format::TableFormat;
use crate::data::model::{Table, Value};
use crate::state::{AppState, FileAction, FileSession};
use crate::ui::plot;

const SUCCESS: Color32 = Color32::from_rgb(42, 157, 143);
const WARNING: Color32 = Color32::from_rgb(233, 196, 106);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", state.sessions.len()));
        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                SUCCESS
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – opened files
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Files");
    ui.separator();

    if state.sessions.is_empty() {
        ui.label("No files loaded.");
        return;
    }

    for session in &state.sessions {
        match &session.outcome {
            Ok(outcome) => ui.label(format!(
                "✔ {}  ({} rows × {} cols)",
                outcome.file_name,
                outcome.table.row_count(),
                outcome.table.column_count()
            )),
            Err(_) => ui.colored_label(Color32::RED, format!("✖ {}", session.file.name())),
        };
    }
}

// ---------------------------------------------------------------------------
// Central panel – one collapsible section per file
// ---------------------------------------------------------------------------

/// Render every opened file, then apply whatever the user clicked.
pub fn file_sections(ui: &mut Ui, state: &mut AppState) {
    if state.sessions.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open CSV or Excel files to get started  (File → Open…)");
        });
        return;
    }

    let mut actions: Vec<(usize, FileAction)> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (index, session) in state.sessions.iter().enumerate() {
                egui::CollapsingHeader::new(RichText::new(session.file.name()).strong())
                    .id_salt(("file", index, session.file.name()))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        let requested = file_panel(ui, index, session);
                        actions.extend(requested.into_iter().map(|a| (index, a)));
                    });
                ui.add_space(8.0);
            }
        });

    // Highest index first so a `Close` never shifts a pending action.
    for (index, action) in actions.into_iter().rev() {
        state.apply(index, action);
    }
}

fn file_panel(ui: &mut Ui, index: usize, session: &FileSession) -> Vec<FileAction> {
    let mut actions = Vec::new();
    let name = session.file.name();

    let outcome = match &session.outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            ui.colored_label(Color32::RED, format!("❌ {e}"));
            if ui.small_button("Close").clicked() {
                actions.push(FileAction::Close);
            }
            return actions;
        }
    };

    // ---- Preview ----
    ui.strong("🔍 Data Preview");
    preview_grid(ui, index, &outcome.preview);
    ui.separator();

    // ---- Cleaning ----
    ui.strong("🧹 Data Cleaning Options");
    let mut cleaning = session.controls.cleaning_enabled;
    if ui
        .checkbox(&mut cleaning, format!("Clean data for {name}"))
        .changed()
    {
        actions.push(FileAction::SetCleaning(cleaning));
    }
    if session.controls.cleaning_enabled {
        ui.horizontal(|ui: &mut Ui| {
            for action in [
                CleaningAction::RemoveDuplicates,
                CleaningAction::FillMissingNumeric,
            ] {
                if ui.button(action.button_label()).clicked() {
                    actions.push(FileAction::Clean(action));
                }
            }
        });
        if let Some(notice) = session.notice {
            ui.colored_label(SUCCESS, format!("✔ {notice}"));
        }
        if !outcome.applied.is_empty() {
            let steps: Vec<&str> = outcome.applied.iter().map(|a| a.button_label()).collect();
            ui.weak(format!("Applied: {}", steps.join(" → ")));
        }
    }
    ui.separator();

    // ---- Column selection ----
    let selected = session.selected_columns();
    ui.strong(format!(
        "📌 Select Columns to Keep  ({}/{})",
        selected.len(),
        outcome.available_columns.len()
    ));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for column in &outcome.available_columns {
            let mut keep = selected.contains(column);
            if ui.checkbox(&mut keep, column.as_str()).changed() {
                actions.push(FileAction::SetColumn {
                    name: column.clone(),
                    keep,
                });
            }
        }
    });
    ui.separator();

    // ---- Chart ----
    ui.strong("📊 Data Visualization");
    match &outcome.chart {
        ChartSummary::Series(series) => {
            let mut show = session.controls.show_chart;
            if ui
                .checkbox(&mut show, format!("Show Visualization for {name}"))
                .changed()
            {
                actions.push(FileAction::SetShowChart(show));
            }
            if session.controls.show_chart {
                plot::series_chart(ui, ("chart", index), series);
            }
        }
        ChartSummary::NotEnoughData { numeric_columns } => {
            ui.colored_label(
                WARNING,
                format!(
                    "⚠ Not enough numeric columns for visualization! \
                     ({numeric_columns} found, {MIN_NUMERIC_COLUMNS} needed)"
                ),
            );
        }
    }
    ui.separator();

    // ---- Conversion ----
    ui.strong("🔄 Conversion Options");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {name} to:"));
        let mut target = session.controls.target;
        for format in TableFormat::ALL {
            ui.radio_value(&mut target, format, format.label());
        }
        if target != session.controls.target {
            actions.push(FileAction::SetTarget(target));
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.button(format!("💾 Convert {name}")).clicked() {
            actions.push(FileAction::Convert);
        }
        if let Some(artifact) = &session.artifact {
            let label = format!("⬇ Download {name} as {}", session.controls.target.label());
            if ui.button(label).clicked() {
                actions.push(FileAction::Download);
            }
            ui.weak(format!(
                "{} · {} · {} bytes",
                artifact.file_name,
                artifact.mime_type,
                artifact.bytes.len()
            ));
        }
        if ui.small_button("Close").clicked() {
            actions.push(FileAction::Close);
        }
    });

    actions
}

/// Grid of the preview rows, header first.
fn preview_grid(ui: &mut Ui, index: usize, table: &Table) {
    if table.column_count() == 0 {
        ui.label("No columns.");
        return;
    }

    ScrollArea::horizontal()
        .id_salt(("preview_scroll", index))
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new(("preview", index))
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for column in table.columns() {
                        ui.strong(column.name());
                    }
                    ui.end_row();

                    for row in table.rows() {
                        for value in row {
                            match value {
                                Value::Missing => ui.weak(value.to_string()),
                                other => ui.label(other.to_string()),
                            };
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open tabular files")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        log::info!("Opening {} file(s)", paths.len());
        state.open_files(&paths);
    }
}
