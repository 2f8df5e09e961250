use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, LineStyle, Plot,
    PlotPoints, Points,
};

use crate::color::ViridisScale;
use crate::data::summary::Describe;
use crate::state::{AppState, ChartTab};

const WARNING_COLOR: Color32 = Color32::from_rgb(0xe6, 0xa2, 0x3c);

/// Render the chart area for the selected tab.
pub fn chart_area(ui: &mut Ui, state: &AppState) {
    match state.tab {
        ChartTab::Overview => {
            ui.columns(2, |cols| {
                ranked_bar_chart(&mut cols[0], state);
                location_map(&mut cols[1], state);
            });
        }
        ChartTab::Distribution => {
            ui.columns(2, |cols| {
                histogram(&mut cols[0], state);
                sex_boxplot(&mut cols[1], state);
                key_statistics(&mut cols[1], state);
            });
        }
        ChartTab::Trend => trend_chart(ui, state),
    }
}

fn title(ui: &mut Ui, text: &str) {
    ui.vertical_centered(|ui: &mut Ui| ui.strong(text));
}

fn no_data(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(WARNING_COLOR));
}

/// Plot axis labels for integer positions into a list of category names.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn category_label(names: &[String], mark: &GridMark) -> String {
    if mark.value < 0.0 || mark.value.fract() != 0.0 {
        return String::new();
    }
    names.get(mark.value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Ranked locations (horizontal bar)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn ranked_bar_chart(ui: &mut Ui, state: &AppState) {
    title(
        ui,
        &format!("Top {} Ranked Mean Age by Location", state.settings.top_n),
    );
    let ranked = &state.views.ranked;
    if ranked.is_empty() {
        no_data(ui, "No data for ranking chart. Please select a location.");
        return;
    }

    let Some(scale) = ViridisScale::spanning(ranked.iter().map(|(_, v)| *v)) else {
        return;
    };

    // Highest mean at the top of the chart.
    let names: Vec<String> = ranked.iter().rev().map(|(loc, _)| loc.clone()).collect();
    let bars: Vec<Bar> = ranked
        .iter()
        .rev()
        .enumerate()
        .map(|(i, (loc, mean))| {
            Bar::new(i as f64, *mean)
                .name(loc)
                .fill(scale.color_for(*mean))
                .width(0.7)
        })
        .collect();

    let height = (ranked.len() as f32 * 25.0 + 100.0).max(400.0);
    Plot::new("ranked_locations")
        .height(height)
        .x_axis_label("Mean Age")
        .y_axis_formatter(move |mark, _range| category_label(&names, &mark))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Mean Age"));
        });
}

// ---------------------------------------------------------------------------
// Mean age by location (colour-keyed map table)
// ---------------------------------------------------------------------------

fn location_map(ui: &mut Ui, state: &AppState) {
    title(ui, "Mean Age by Location (Map)");
    let by_location = &state.views.by_location;
    let Some(scale) = ViridisScale::spanning(by_location.iter().map(|(_, v)| *v)) else {
        no_data(ui, "No data for map. Please select a location.");
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(48.0))
        .column(Column::remainder().at_least(120.0))
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|_ui| {});
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Mean Age");
            });
        })
        .body(|mut body| {
            for (loc, mean) in by_location {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let (rect, _) = ui.allocate_exact_size(
                            egui::vec2(40.0, 14.0),
                            egui::Sense::hover(),
                        );
                        ui.painter().rect_filled(rect, 2.0, scale.color_for(*mean));
                    });
                    row.col(|ui| {
                        ui.label(loc.as_str());
                    });
                    row.col(|ui| {
                        ui.label(format!("{mean:.2}"));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram of mean ages
// ---------------------------------------------------------------------------

fn histogram(ui: &mut Ui, state: &AppState) {
    title(ui, "Distribution of Mean Age");
    let buckets = &state.views.histogram;
    if buckets.is_empty() {
        no_data(ui, "No data for histogram. Please select a location.");
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width().max(0.1))
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect();

    Plot::new("histogram")
        .x_axis_label("Mean Age")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(0x21, 0x91, 0x8c)));
        });
}

// ---------------------------------------------------------------------------
// Per-sex boxplot
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn sex_boxplot(ui: &mut Ui, state: &AppState) {
    title(ui, "Mean Age by Sex");
    let dists = &state.views.distributions;
    if dists.is_empty() {
        no_data(ui, "No data for boxplot. Please select a location.");
        return;
    }

    let names: Vec<String> = dists.iter().map(|(sex, _)| sex.clone()).collect();
    Plot::new("sex_boxplot")
        .height(ui.available_height() * 0.6)
        .legend(Legend::default())
        .y_axis_label("Mean Age")
        .x_axis_formatter(move |mark, _range| category_label(&names, &mark))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (sex, b)) in dists.iter().enumerate() {
                let color = state.sex_colors.color_for(sex);
                let x = i as f64;
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(sex)
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4))
                .stroke(egui::Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(sex));

                if !b.outliers.is_empty() {
                    let outliers: PlotPoints = b.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(Points::new(outliers).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Key statistics per sex
// ---------------------------------------------------------------------------

fn key_statistics(ui: &mut Ui, state: &AppState) {
    title(ui, "Key Statistics");
    let stats = &state.views.key_stats;
    if stats.is_empty() {
        return;
    }

    let columns: [(&str, fn(&Describe) -> String); 8] = [
        ("count", |d| d.count.to_string()),
        ("mean", |d| format!("{:.2}", d.mean)),
        ("std", |d| d.std.map_or_else(|| "–".to_string(), |s| format!("{s:.2}"))),
        ("min", |d| format!("{:.2}", d.min)),
        ("25%", |d| format!("{:.2}", d.q1)),
        ("50%", |d| format!("{:.2}", d.median)),
        ("75%", |d| format!("{:.2}", d.q3)),
        ("max", |d| format!("{:.2}", d.max)),
    ];

    ui.push_id("key_statistics", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(70.0))
            .columns(Column::auto().at_least(48.0), columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("sex_name");
                });
                for (name, _) in &columns {
                    header.col(|ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|mut body| {
                for (sex, d) in stats {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(sex).color(state.sex_colors.color_for(sex)));
                        });
                        for (_, cell) in &columns {
                            row.col(|ui| {
                                ui.label(cell(d));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// Collapsible table of every record passing the current filters.
pub fn raw_data(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new("🔍 Show Raw Data")
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let records = state.visible_records();
            if records.is_empty() {
                no_data(ui, "No rows match the current filters.");
                return;
            }

            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(240.0)
                .column(Column::remainder().at_least(160.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .header(20.0, |mut header| {
                    for name in ["location_name", "sex_name", "year_id", "val"] {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, records.len(), |mut row| {
                        let rec = records[row.index()];
                        row.col(|ui| {
                            ui.label(rec.location_name.as_str());
                        });
                        row.col(|ui| {
                            ui.label(rec.sex_name.as_str());
                        });
                        row.col(|ui| {
                            ui.label(rec.year_id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", rec.val));
                        });
                    });
                });
        });
}

// ---------------------------------------------------------------------------
// Trend lines and forecast
// ---------------------------------------------------------------------------

fn trend_chart(ui: &mut Ui, state: &AppState) {
    title(ui, "Mean Age over Time by Sex");
    if state.views.by_year_and_sex.is_empty() {
        no_data(ui, "No data for trend chart. Please select a location.");
        return;
    }

    // Forecast failures only affect this chart.
    let forecast = match &state.views.forecast {
        Some(Ok(fc)) => {
            ui.label(format!(
                "Linear trend: {:+.3} years per year, projected {} years ahead",
                fc.slope,
                fc.points.len()
            ));
            Some(fc)
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("⚠ Forecast unavailable: {e}")).color(WARNING_COLOR));
            None
        }
        None => None,
    };

    Plot::new("trend")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Mean Age")
        .show(ui, |plot_ui| {
            for sex in &state.dataset.domain.sexes {
                let points: PlotPoints = state
                    .views
                    .by_year_and_sex
                    .iter()
                    .filter(|(_, s, _)| s == sex)
                    .map(|(year, _, mean)| [f64::from(*year), *mean])
                    .collect();
                if points.points().is_empty() {
                    continue;
                }
                plot_ui.line(
                    Line::new(points)
                        .name(sex)
                        .color(state.sex_colors.color_for(sex))
                        .width(1.5),
                );
            }

            let overall: PlotPoints = state
                .views
                .by_year
                .iter()
                .map(|&(year, mean)| [f64::from(year), mean])
                .collect();
            plot_ui.line(
                Line::new(overall)
                    .name("All selected")
                    .color(Color32::LIGHT_GRAY)
                    .width(2.0),
            );

            if let (Some(fc), Some(&(last_year, last_mean))) = (forecast, state.views.by_year.last())
            {
                let projected: PlotPoints = std::iter::once([f64::from(last_year), last_mean])
                    .chain(fc.points.iter().map(|&(y, v)| [f64::from(y), v]))
                    .collect();
                plot_ui.line(
                    Line::new(projected)
                        .name("Forecast")
                        .color(Color32::LIGHT_GRAY)
                        .style(LineStyle::dashed_loose())
                        .width(2.0),
                );
            }
        });
}
