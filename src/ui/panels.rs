use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, ChartTab};

// ---------------------------------------------------------------------------
// Left side panel – controls & insights
// ---------------------------------------------------------------------------

/// Render the left panel: filter widgets followed by the insights block.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls & Insights");
    ui.separator();

    if ui.button("Reset All Filters").clicked() {
        state.reset_filters();
    }

    let mut global = state.filters.global_top_mode;
    if ui
        .checkbox(
            &mut global,
            format!("Show top {} locations globally", state.settings.top_n),
        )
        .on_hover_text(format!(
            "Ignores the 'Location(s)' filter to find the top {} across all data.",
            state.settings.top_n
        ))
        .changed()
    {
        state.set_global_top_mode(global);
    }
    ui.separator();

    // The domain is immutable; hold our own handle so `state` can be mutated in the loops.
    let dataset = Arc::clone(&state.dataset);
    let domain = &dataset.domain;

    ScrollArea::vertical()
        .id_salt("filters")
        .max_height(ui.available_height() * 0.6)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            // ---- Locations ----
            let header = format!(
                "Location(s)  ({}/{})",
                state.filters.locations.len(),
                domain.locations.len()
            );
            ui.add_enabled_ui(state.filters.locations_editable(), |ui: &mut Ui| {
                egui::CollapsingHeader::new(RichText::new(header).strong())
                    .id_salt("locations")
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all_locations();
                            }
                            if ui.small_button("None").clicked() {
                                state.select_no_locations();
                            }
                        });
                        ui.add(
                            egui::TextEdit::singleline(&mut state.location_query)
                                .hint_text("Search…"),
                        );

                        let query = state.location_query.to_lowercase();
                        for loc in domain
                            .locations
                            .iter()
                            .filter(|l| query.is_empty() || l.to_lowercase().contains(&query))
                        {
                            let mut checked = state.filters.locations.contains(loc);
                            if ui.checkbox(&mut checked, loc.as_str()).changed() {
                                state.toggle_location(loc);
                            }
                        }
                    });
            });

            // ---- Sexes ----
            let header = format!(
                "Sex(es)  ({}/{})",
                state.filters.sexes.len(),
                domain.sexes.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("sexes")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_sexes();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_sexes();
                        }
                    });
                    for sex in &domain.sexes {
                        let text = RichText::new(sex).color(state.sex_colors.color_for(sex));
                        let mut checked = state.filters.sexes.contains(sex);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_sex(sex);
                        }
                    }
                });

            // ---- Years ----
            let header = format!(
                "Year(s)  ({}/{})",
                state.filters.years.len(),
                domain.years.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("years")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_years();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_years();
                        }
                    });
                    for &year in &domain.years {
                        let mut checked = state.filters.years.contains(&year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(year);
                        }
                    }
                });
        });

    ui.separator();
    insights(ui, state);
}

/// Summary text block under the filters.
fn insights(ui: &mut Ui, state: &AppState) {
    let Some(overall) = state.views.overall else {
        ui.label(
            RichText::new("Please select at least one location to see data.")
                .color(Color32::from_rgb(0xe6, 0xa2, 0x3c)),
        );
        return;
    };

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Overall Mean Age:");
        ui.strong(format!("{:.2} years", overall.mean));
    });
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Age Range:");
        ui.strong(format!("{:.2} - {:.2}", overall.min, overall.max));
    });
    ui.label(RichText::new(format!("{} records", overall.count)).weak());
    ui.add_space(6.0);
    ui.strong("Mean Age by Sex:");
    for (sex, mean) in &state.views.by_sex {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(format!("{sex}:")).color(state.sex_colors.color_for(sex)));
            ui.strong(format!("{mean:.2} years"));
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the chart tabs and record counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Exploring the Mean Age of Suicide Mortality");
        ui.label(RichText::new("Data Source: IHME GBD 2021").italics());

        ui.separator();

        for (tab, label) in [
            (ChartTab::Overview, "Ranking & Map"),
            (ChartTab::Distribution, "Distribution"),
            (ChartTab::Trend, "Trend & Forecast"),
        ] {
            if ui.selectable_label(state.tab == tab, label).clicked() {
                state.tab = tab;
            }
        }

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));
    });
}
