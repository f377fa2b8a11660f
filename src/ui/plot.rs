use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use sales_dashboard::format::{format_currency, key_label};
use sales_dashboard::pipeline::ChartKind;
use sales_dashboard::SummaryTable;

use crate::color::{heat_color, ColorMap};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dashboard grid (central panel)
// ---------------------------------------------------------------------------

/// Render the six summary charts in a two-column grid.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales file to view the dashboard  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                for (i, table) in dashboard.summaries.iter().enumerate() {
                    chart_card(&mut cols[i % 2], table, state.show_tables);
                }
            });
        });
}

fn chart_card(ui: &mut Ui, table: &SummaryTable, show_table: bool) {
    let dimension = table.dimension();

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(RichText::new(dimension.title()).size(16.0).strong());

        if table.is_empty() {
            ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(RichText::new("No data").color(Color32::GRAY));
                });
            });
            return;
        }

        match dimension.chart_kind() {
            ChartKind::Line => line_chart(ui, table),
            ChartKind::Bar => bar_chart(ui, table),
            ChartKind::RegionMap => region_map(ui, table),
            ChartKind::Share => share_chart(ui, table),
        }

        if show_table {
            summary_table(ui, table);
        }
    });
    ui.add_space(8.0);
}

/// Label for an integer tick on a categorical axis, empty between bars.
fn index_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

/// Trend line over the numeric key (years).
fn line_chart(ui: &mut Ui, table: &SummaryTable) {
    let dimension = table.dimension();
    let points: Vec<[f64; 2]> = table
        .iter()
        .filter_map(|(k, v)| k.as_f64().map(|x| [x, v]))
        .collect();

    Plot::new(dimension.name())
        .height(CHART_HEIGHT)
        .x_axis_label(dimension.column().name())
        .y_axis_label("Sales")
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .label_formatter(|_name, p| format!("{:.0}\n{}", p.x, format_currency(p.y)))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Sales")
                    .color(Color32::from_rgb(52, 152, 219))
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.5)
                    .color(Color32::from_rgb(52, 152, 219)),
            );
        });
}

/// Vertical bars in key order, one colour per key.
fn bar_chart(ui: &mut Ui, table: &SummaryTable) {
    let dimension = table.dimension();
    let colors = ColorMap::new(table);
    let labels: Vec<String> = table.iter().map(|(k, _)| key_label(dimension, k)).collect();

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (k, v))| {
            Bar::new(i as f64, v)
                .name(format!("{}: {}", labels[i], format_currency(v)))
                .fill(colors.color_for(k))
                .width(0.6)
        })
        .collect();

    Plot::new(dimension.name())
        .height(CHART_HEIGHT)
        .x_axis_label(dimension.column().name())
        .y_axis_label("Sales")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(dimension.title()));
        });
}

/// Regions as horizontal bars shaded by sales intensity, the way a
/// choropleth shades areas.
fn region_map(ui: &mut Ui, table: &SummaryTable) {
    let dimension = table.dimension();
    let max = table.max_value();
    let labels: Vec<String> = table.iter().map(|(k, _)| key_label(dimension, k)).collect();

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (_, v))| {
            let intensity = if max > 0.0 { v / max } else { 0.0 };
            Bar::new(i as f64, v)
                .name(format!("{}: {}", labels[i], format_currency(v)))
                .fill(heat_color(intensity))
                .stroke(Stroke::new(1.0, Color32::from_gray(120)))
                .width(0.8)
        })
        .collect();

    Plot::new(dimension.name())
        .height(CHART_HEIGHT)
        .x_axis_label("Sales")
        .y_axis_label(dimension.column().name())
        .allow_drag(false)
        .allow_scroll(false)
        .y_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(dimension.title()));
        });

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Low").small());
        for step in 0..=4 {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 10.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, heat_color(step as f64 / 4.0));
        }
        ui.label(RichText::new("High").small());
    });
}

/// Pie of each key's share of total sales. Non-positive keys are left out.
fn share_chart(ui: &mut Ui, table: &SummaryTable) {
    let dimension = table.dimension();
    let total: f64 = table.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        ui.label(RichText::new("No positive sales to chart").color(Color32::GRAY));
        return;
    }

    let colors = ColorMap::new(table);
    let mut slices: Vec<Polygon> = Vec::new();
    let mut start = 0.0;

    for (k, v) in table.iter().filter(|(_, v)| *v > 0.0) {
        let sweep = v / total * TAU;
        let name = format!("{} ({:.1}%)", key_label(dimension, k), v / total * 100.0);
        let color = colors.color_for(k);

        // Wedges of at most 45° keep every polygon convex.
        let pieces = (sweep / FRAC_PI_4).ceil().max(1.0) as usize;
        for p in 0..pieces {
            let a0 = start + sweep * p as f64 / pieces as f64;
            let a1 = start + sweep * (p + 1) as f64 / pieces as f64;
            slices.push(
                Polygon::new(PlotPoints::from(wedge(a0, a1)))
                    .name(&name)
                    .fill_color(color)
                    .stroke(Stroke::new(1.0, Color32::WHITE)),
            );
        }
        start += sweep;
    }

    Plot::new(dimension.name())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for slice in slices {
                plot_ui.polygon(slice);
            }
        });
}

/// Unit-circle wedge from angle `a0` to `a1`, measured clockwise from 12 o'clock.
fn wedge(a0: f64, a1: f64) -> Vec<[f64; 2]> {
    let steps = ((a1 - a0) / TAU * 96.0).ceil().max(2.0) as usize;
    let mut pts = Vec::with_capacity(steps + 2);
    pts.push([0.0, 0.0]);
    for s in 0..=steps {
        let a = a0 + (a1 - a0) * s as f64 / steps as f64;
        let theta = FRAC_PI_2 - a;
        pts.push([theta.cos(), theta.sin()]);
    }
    pts
}

// ---------------------------------------------------------------------------
// Data table under a chart
// ---------------------------------------------------------------------------

fn summary_table(ui: &mut Ui, table: &SummaryTable) {
    let dimension = table.dimension();
    ui.add_space(6.0);
    ui.push_id(("summary_table", dimension.name()), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::remainder())
            .column(TableColumn::auto().at_least(110.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(dimension.column().name());
                });
                header.col(|ui| {
                    ui.strong("Sales");
                });
            })
            .body(|mut body| {
                for (k, v) in table.sorted_by_value() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(key_label(dimension, k));
                        });
                        row.col(|ui| {
                            ui.label(format_currency(v));
                        });
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_labels_only_on_whole_ticks() {
        let labels = vec!["Air".to_string(), "Ground".to_string()];
        assert_eq!(index_label(&labels, 1.0), "Ground");
        assert_eq!(index_label(&labels, 0.5), "");
        assert_eq!(index_label(&labels, 2.0), "");
        assert_eq!(index_label(&labels, -1.0), "");
    }

    #[test]
    fn wedge_starts_at_center_and_stays_on_unit_circle() {
        let pts = wedge(0.0, FRAC_PI_2);
        assert_eq!(pts[0], [0.0, 0.0]);
        // First rim point is straight up, last is at 3 o'clock.
        assert!((pts[1][0] - 0.0).abs() < 1e-9 && (pts[1][1] - 1.0).abs() < 1e-9);
        let last = pts[pts.len() - 1];
        assert!((last[0] - 1.0).abs() < 1e-9 && last[1].abs() < 1e-9);
        for p in &pts[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]) - 1.0).abs() < 1e-9);
        }
    }
}
