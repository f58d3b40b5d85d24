use std::hash::Hash;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::chart::Series;

// ---------------------------------------------------------------------------
// Bar chart of the charted series
// ---------------------------------------------------------------------------

const BAR_COLOR: Color32 = Color32::from_rgb(244, 162, 97);

/// Render `series` as one bar per row. Missing values leave a gap.
pub fn series_chart(ui: &mut Ui, id_salt: impl Hash, series: &Series) {
    let bars: Vec<Bar> = series
        .values
        .iter()
        .enumerate()
        .filter_map(|(row, value)| value.map(|v| Bar::new(row as f64, v).width(0.8)))
        .collect();

    let chart = BarChart::new(bars)
        .name(series.column.as_str())
        .color(BAR_COLOR);

    Plot::new(id_salt)
        .legend(Legend::default())
        .height(240.0)
        .x_axis_label("Row")
        .y_axis_label(series.column.as_str())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
