use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart as PlotBarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon,
    Text,
};

use crate::chart::spec::{
    BarChart, ChoroplethChart, DonutChart, LineChart, ScatterChart, ScatterPoint,
};
use crate::chart::{ChartBody, ChartId, ChartSet, ChartSpec};
use crate::color::{self, CategoryColors};
use crate::data::model::ContentType;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Dashboard layout (central panel)
// ---------------------------------------------------------------------------

/// Render the five charts: two per row, with the timeline spanning a full row.
pub fn dashboard(ui: &mut Ui, charts: &ChartSet) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                chart_frame(&mut cols[0], charts.get(ChartId::TypeComposition));
                chart_frame(&mut cols[1], charts.get(ChartId::TopGenres));
            });
            ui.add_space(12.0);
            chart_frame(ui, charts.get(ChartId::AdditionsOverTime));
            ui.add_space(12.0);
            ui.columns(2, |cols| {
                chart_frame(&mut cols[0], charts.get(ChartId::DurationTrend));
                chart_frame(&mut cols[1], charts.get(ChartId::CountryProduction));
            });
        });
}

fn chart_frame(ui: &mut Ui, spec: &ChartSpec) {
    ui.group(|ui: &mut Ui| {
        ui.strong(&spec.title);
        match &spec.body {
            ChartBody::NoData => no_data(ui),
            ChartBody::Donut(chart) => donut(ui, chart),
            ChartBody::Bars(chart) => genre_bars(ui, chart),
            ChartBody::Lines(chart) => timeline(ui, chart),
            ChartBody::Scatter(chart) => duration_scatter(ui, chart),
            ChartBody::Choropleth(chart) => country_table(ui, chart),
        }
    });
}

fn no_data(ui: &mut Ui) {
    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    ui.allocate_ui(size, |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("No data for the current filters").weak());
        });
    });
}

fn static_plot(id: &'static str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Donut
// ---------------------------------------------------------------------------

/// Quads approximating one ring segment between angles `from` and `to`.
/// Each quad is convex so the plot fills it correctly.
fn ring_quads(from: f64, to: f64, inner: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = ((from - to).abs() / 0.05).ceil().max(1.0) as usize;
    let at = |i: usize| from + (to - from) * i as f64 / steps as f64;
    (0..steps)
        .map(|i| {
            let (a, b) = (at(i), at(i + 1));
            vec![
                [a.cos(), a.sin()],
                [b.cos(), b.sin()],
                [inner * b.cos(), inner * b.sin()],
                [inner * a.cos(), inner * a.sin()],
            ]
        })
        .collect()
}

fn donut(ui: &mut Ui, chart: &DonutChart) {
    let hole = f64::from(chart.hole);
    static_plot("type_composition")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for slice in &chart.slices {
                let sweep = TAU * chart.percent(slice) / 100.0;
                let fill = color::named(&slice.color);
                for quad in ring_quads(start, start - sweep, hole) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(quad))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, fill))
                            .name(slice.kind.label()),
                    );
                }

                let mut text = Vec::new();
                if chart.show_label {
                    text.push(slice.kind.label().to_string());
                }
                if chart.show_percent {
                    text.push(format!("{:.1}%", chart.percent(slice)));
                }
                let mid = start - sweep / 2.0;
                let radius = (1.0 + hole) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(radius * mid.cos(), radius * mid.sin()),
                    RichText::new(text.join("\n")).color(Color32::WHITE).strong(),
                ));

                start -= sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Horizontal bars
// ---------------------------------------------------------------------------

fn genre_bars(ui: &mut Ui, chart: &BarChart) {
    let colors = CategoryColors::new(chart.bars.iter().map(|b| b.label.as_str()));
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let bar = Bar::new(i as f64, b.count as f64)
                .name(&b.label)
                .width(0.7);
            if chart.color_by_category {
                bar.fill(colors.color_for(&b.label))
            } else {
                bar
            }
        })
        .collect();

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    static_plot("top_genres")
        .x_axis_label(chart.value_label.as_str())
        .show_grid([true, false])
        .y_axis_formatter(move |mark, _range| {
            let index = mark.value.round();
            if (mark.value - index).abs() > 1e-6 || index < 0.0 {
                return String::new();
            }
            labels.get(index as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(PlotBarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

fn timeline(ui: &mut Ui, chart: &LineChart) {
    static_plot("additions_over_time")
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|&(year, count)| [f64::from(year), count as f64])
                    .collect();
                plot_ui.line(Line::new(points).name(series.kind.label()).width(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Faceted scatter
// ---------------------------------------------------------------------------

/// Title of the point closest to `at`, for hover labels.
fn nearest_title<'a>(points: &'a [ScatterPoint], at: &PlotPoint) -> Option<&'a str> {
    points
        .iter()
        .min_by(|a, b| {
            let da = (f64::from(a.release_year) - at.x).powi(2) + (a.duration as f64 - at.y).powi(2);
            let db = (f64::from(b.release_year) - at.x).powi(2) + (b.duration as f64 - at.y).powi(2);
            da.total_cmp(&db)
        })
        .map(|p| p.title.as_str())
}

fn duration_scatter(ui: &mut Ui, chart: &ScatterChart) {
    let palette = color::generate_palette(ContentType::ALL.len());
    ui.columns(chart.panels.len(), |cols| {
        for (ui, panel) in cols.iter_mut().zip(&chart.panels) {
            let base = ContentType::ALL
                .iter()
                .position(|k| *k == panel.kind)
                .and_then(|i| palette.get(i).copied())
                .unwrap_or(Color32::LIGHT_BLUE);

            ui.label(RichText::new(panel.kind.label()).small());
            let points: PlotPoints = panel
                .points
                .iter()
                .map(|p| [f64::from(p.release_year), p.duration as f64])
                .collect();

            let hover_points = panel.points.as_slice();
            Plot::new(format!("duration_trend_{}", panel.kind.label()))
                .height(CHART_HEIGHT)
                .x_axis_label(chart.x_label.as_str())
                .y_axis_label(panel.y_label.as_str())
                .label_formatter(move |_name, value| {
                    nearest_title(hover_points, value)
                        .map(|title| format!("{title}\n{:.0}, {:.0}", value.x, value.y))
                        .unwrap_or_default()
                })
                .show(ui, |plot_ui| {
                    plot_ui.points(
                        Points::new(points)
                            .radius(chart.marker_size / 2.0)
                            .color(color::with_opacity(base, chart.opacity))
                            .name(panel.kind.label()),
                    );
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Country production
// ---------------------------------------------------------------------------

/// Countries ranked by title count, each shaded on the chart's colour scale.
fn country_table(ui: &mut Ui, chart: &ChoroplethChart) {
    let max = chart.max_count().max(1) as f32;
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(CHART_HEIGHT)
        .column(Column::exact(18.0))
        .column(Column::remainder())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|_ui: &mut Ui| {});
            header.col(|ui: &mut Ui| {
                ui.strong("Country");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Titles");
            });
        })
        .body(|body| {
            body.rows(18.0, chart.regions.len(), |mut row| {
                let region = &chart.regions[row.index()];
                row.col(|ui: &mut Ui| {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 2.0, color::plasma(region.count as f32 / max));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&region.label);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(region.count.to_string());
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_quads_cover_the_sweep() {
        let quads = ring_quads(FRAC_PI_2, FRAC_PI_2 - TAU / 4.0, 0.3);
        assert!(!quads.is_empty());
        let first = quads.first().unwrap()[0];
        let last = quads.last().unwrap()[1];
        assert!((first[0] - 0.0).abs() < 1e-9 && (first[1] - 1.0).abs() < 1e-9);
        assert!((last[0] - 1.0).abs() < 1e-9 && last[1].abs() < 1e-9);
    }

    #[test]
    fn hover_picks_the_closest_point() {
        let points = vec![
            ScatterPoint { release_year: 2000, duration: 90, title: "Near".into() },
            ScatterPoint { release_year: 2010, duration: 150, title: "Far".into() },
        ];
        assert_eq!(nearest_title(&points, &PlotPoint::new(2001.0, 92.0)), Some("Near"));
        assert_eq!(nearest_title(&[], &PlotPoint::new(0.0, 0.0)), None);
    }
}
