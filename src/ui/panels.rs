use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use catalog_lens::data::model::ContentType;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(catalog) = &state.catalog else {
        ui.label("No catalog loaded.");
        return;
    };

    let types: Vec<ContentType> = catalog.types.iter().copied().collect();
    let bounds = catalog.year_bounds;
    let n_countries = catalog.countries.len();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Type ----
            ui.strong("Type");
            for t in types {
                let mut checked = state.selection.types.contains(&t);
                if ui.checkbox(&mut checked, t.label()).changed() {
                    state.toggle_type(t);
                }
            }
            if state.selection.types.is_empty() {
                ui.weak("none selected: all types shown");
            }
            ui.separator();

            // ---- Country ----
            let n_selected = state.selection.countries.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Country  ({n_selected}/{n_countries})")).strong(),
            )
            .id_salt("country_filter")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.country_search)
                        .hint_text("search…"),
                );
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_visible_countries();
                    }
                    if ui.small_button("None").clicked() {
                        state.clear_countries();
                    }
                });

                ScrollArea::vertical()
                    .id_salt("country_list")
                    .max_height(260.0)
                    .show(ui, |ui: &mut Ui| {
                        for country in state.visible_countries() {
                            let mut checked = state.selection.countries.contains(&country);
                            if ui.checkbox(&mut checked, country.as_str()).changed() {
                                state.toggle_country(&country);
                            }
                        }
                    });
            });
            ui.separator();

            // ---- Release year ----
            if let Some((min, max)) = bounds {
                ui.strong("Release year");
                let (mut lo, mut hi) = state.selection.years;
                let lo_changed = ui
                    .add(egui::Slider::new(&mut lo, min..=max).text("from"))
                    .changed();
                let hi_changed = ui
                    .add(egui::Slider::new(&mut hi, min..=max).text("to"))
                    .changed();
                if lo_changed || hi_changed {
                    // Dragging one end past the other drags both.
                    if lo_changed && lo > hi {
                        hi = lo;
                    } else if hi_changed && hi < lo {
                        lo = hi;
                    }
                    state.set_years(lo, hi);
                }
                ui.separator();
            }

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload source").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.results.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!("{} titles loaded from {}", catalog.len(), state.source));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Total / movie / show counters over the filtered rows.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(results) = &state.results else {
        return;
    };
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Titles", results.total);
        metric(&mut cols[1], "Movies Count", results.movies);
        metric(&mut cols[2], "TV Shows Count", results.tv_shows);
    });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value.to_string()).size(28.0).strong());
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path.to_string_lossy());
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard summary")
        .add_filter("JSON", &["json"])
        .set_file_name("catalog-summary.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_json(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
