use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::data::filter::{CountryFilter, TypeFilter};
use crate::data::model::ContentType;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn type_filter_label(filter: TypeFilter) -> &'static str {
    match filter {
        TypeFilter::All => "All",
        TypeFilter::Only(ContentType::Movie) => "Movies",
        TypeFilter::Only(ContentType::TvShow) => "TV Shows",
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Release year range ----
    ui.strong("Release Year");
    match state.dataset.year_bounds {
        Some(bounds) => {
            let mut min = state.filters.year_range.min;
            let mut max = state.filters.year_range.max;
            let min_changed = ui
                .add(Slider::new(&mut min, bounds.min..=bounds.max).text("from"))
                .changed();
            let max_changed = ui
                .add(Slider::new(&mut max, bounds.min..=bounds.max).text("to"))
                .changed();

            // Dragging one handle past the other pushes the other along.
            if min_changed && min > max {
                max = min;
            }
            if max_changed && max < min {
                min = max;
            }
            state.set_year_range(min, max);
        }
        None => {
            ui.label("No release years in the data.");
        }
    }
    ui.add_space(12.0);

    // ---- Content type ----
    ui.strong("Content Type");
    let mut content_type = state.filters.content_type;
    egui::ComboBox::from_id_salt("content_type")
        .selected_text(type_filter_label(content_type))
        .show_ui(ui, |ui: &mut Ui| {
            for option in [
                TypeFilter::All,
                TypeFilter::Only(ContentType::Movie),
                TypeFilter::Only(ContentType::TvShow),
            ] {
                ui.selectable_value(&mut content_type, option, type_filter_label(option));
            }
        });
    state.set_content_type(content_type);
    ui.add_space(12.0);

    // ---- Country (top 10 raw values) ----
    ui.strong("Country (Top 10)");
    let mut country = state.filters.country.clone();
    let selected_text = match &country {
        CountryFilter::All => "All".to_string(),
        CountryFilter::Containing(name) => name.clone(),
    };
    let dataset = state.dataset.clone();
    egui::ComboBox::from_id_salt("country")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut country, CountryFilter::All, "All");
            for name in &dataset.top_countries {
                ui.selectable_value(&mut country, CountryFilter::Containing(name.clone()), name);
            }
        });
    state.set_country(country);
    ui.add_space(12.0);

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }

    ui.separator();
    ui.label(format!("{} titles", dataset.len()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("Content Analysis Dashboard").strong());

        if state.is_recomputing() {
            ui.separator();
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart set")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        match state.export_charts(&path) {
            Ok(()) => {
                log::info!("Exported chart set to {}", path.display());
                state.status_message = Some(format!("Exported charts to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
