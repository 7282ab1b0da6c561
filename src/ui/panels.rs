use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::config::Config;
use crate::data::loader;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – summary, date window, display options
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cumulative mass");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let source = dataset.source.to_string();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Source");
            ui.label(RichText::new(source).small());
            ui.separator();

            if let Some(series) = &state.series {
                let summary = series.summary();
                egui::Grid::new("summary_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.label("Rows");
                        ui.label(summary.rows.to_string());
                        ui.end_row();

                        ui.label("Total");
                        ui.label(format!("{:.2} kg", summary.total_mass));
                        ui.end_row();

                        if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
                            ui.label("Span");
                            ui.label(format!("{first} – {last}"));
                            ui.end_row();
                        }
                    });
                ui.separator();
            }

            // ---- Date window ----
            if let Some(window) = state.window {
                ui.strong("Date window");
                let mut from = window.from;
                let mut to = window.to;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut from).id_salt("window_from"));
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut to).id_salt("window_to"));
                });
                if from != window.from || to != window.to {
                    state.set_window(from, to);
                }
                if ui.small_button("Reset").clicked() {
                    state.reset_window();
                }
                ui.label(format!("{} points shown", state.visible_indices.len()));
                ui.separator();
            }

            // ---- Display options ----
            ui.strong("Display");
            ui.checkbox(&mut state.fill_area, "Fill area");
            ui.checkbox(&mut state.color_by_year, "Colour by year");
            ui.checkbox(&mut state.show_raw_table, "Raw data table");

            if state.color_by_year {
                ui.add_space(4.0);
                for (label, color) in state.year_colors.legend_entries() {
                    ui.label(RichText::new(label).color(color));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Render the rows exactly as loaded, every column, next to their running
/// total.
pub fn raw_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    ui.strong("Raw data");

    let text_height = egui::TextStyle::Body.resolve(ui.style()).size + 4.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(80.0), dataset.extra_columns.len())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Row");
            });
            header.col(|ui| {
                ui.strong("Date / YYYY-MM-DD");
            });
            header.col(|ui| {
                ui.strong("Mass / kg");
            });
            header.col(|ui| {
                ui.strong("Cumulative / kg");
            });
            for name in &dataset.extra_columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
            header.col(|_ui| {});
        })
        .body(|body| {
            body.rows(text_height, dataset.len(), |mut row| {
                let i = row.index();
                let rec = &dataset.records[i];
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui| {
                    ui.label(&rec.date);
                });
                row.col(|ui| {
                    ui.label(&rec.mass);
                });
                row.col(|ui| {
                    if let Some(p) = state.series.as_ref().and_then(|s| s.points.get(i)) {
                        ui.label(format!("{:.2}", p.cumulative_mass));
                    }
                });
                for j in 0..dataset.extra_columns.len() {
                    row.col(|ui| {
                        ui.label(rec.extra.get(j).map_or("", String::as_str));
                    });
                }
                row.col(|_ui| {});
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, config: &Config) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload from URL").clicked() {
                reload_from_url(state, config);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let shown = state.visible_indices.len();
            ui.label(format!("{} rows loaded, {shown} shown", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open mass data")
        .add_filter("Supported files", &["tsv", "txt", "csv", "json"])
        .add_filter("Aligned text", &["tsv", "txt"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} rows from {}", dataset.len(), dataset.source);
                state.set_dataset(dataset);
            }
            Err(e) => state.set_error("Failed to load file", &e),
        }
    }
}

/// One blocking fetch of the configured URL.
pub fn reload_from_url(state: &mut AppState, config: &Config) {
    match loader::load_url(&config.data_url, config.fetch_timeout) {
        Ok(dataset) => {
            log::info!("Loaded {} rows from {}", dataset.len(), dataset.source);
            state.set_dataset(dataset);
        }
        Err(e) => state.set_error("Failed to fetch data", &e),
    }
}
