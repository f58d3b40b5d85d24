use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DataSweeperApp {
    pub state: AppState,
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: opened files ----
        egui::SidePanel::left("file_list")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: per-file pipeline ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::file_sections(ui, &mut self.state);
        });
    }
}
