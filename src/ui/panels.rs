use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use sales_dashboard::format::kpi_labels;
use sales_dashboard::FilterColumn;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user did in one multi-select this frame.
enum FilterAction<T> {
    Toggle(T),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the options so we can mutate state inside the loop.
    let options = dataset.filter_options().clone();
    let regions: Vec<String> = options.regions.into_iter().collect();
    let segments: Vec<String> = options.segments.into_iter().collect();
    let years: Vec<i64> = options.years.into_iter().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let action = multiselect(ui, state, FilterColumn::Region, &regions, |s, r| {
                s.filters.regions.contains(r)
            });
            match action {
                Some(FilterAction::Toggle(region)) => state.toggle_region(&region),
                Some(FilterAction::Clear) => state.clear_filter(FilterColumn::Region),
                None => {}
            }

            let action = multiselect(ui, state, FilterColumn::Segment, &segments, |s, seg| {
                s.filters.segments.contains(seg)
            });
            match action {
                Some(FilterAction::Toggle(segment)) => state.toggle_segment(&segment),
                Some(FilterAction::Clear) => state.clear_filter(FilterColumn::Segment),
                None => {}
            }

            let action = multiselect(ui, state, FilterColumn::Year, &years, |s, y| {
                s.filters.years.contains(y)
            });
            match action {
                Some(FilterAction::Toggle(year)) => state.toggle_year(year),
                Some(FilterAction::Clear) => state.clear_filter(FilterColumn::Year),
                None => {}
            }

            ui.separator();
            ui.add_enabled_ui(!state.filters.is_unfiltered(), |ui: &mut Ui| {
                if ui.button("Clear all filters").clicked() {
                    state.clear_all_filters();
                }
            });
        });
}

/// One collapsible checkbox list. Nothing ticked means "no filter".
fn multiselect<T: Clone + ToString>(
    ui: &mut Ui,
    state: &AppState,
    column: FilterColumn,
    values: &[T],
    is_selected: impl Fn(&AppState, &T) -> bool,
) -> Option<FilterAction<T>> {
    let mut action = None;

    // Show count of selected / total in the header
    let n_selected = state.filters.selected_count(column);
    let header_text = if n_selected == 0 {
        format!("{}  (all)", column.label())
    } else {
        format!("{}  ({n_selected}/{})", column.label(), values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                action = Some(FilterAction::Clear);
            }

            for val in values {
                let mut checked = is_selected(state, val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    action = Some(FilterAction::Toggle(val.clone()));
                }
            }
        });

    action
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Render the three headline metrics above the charts.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        for (label, value) in kpi_labels(&dashboard.kpis) {
            egui::Frame::group(ui.style())
                .inner_margin(10.0)
                .show(ui, |ui: &mut Ui| {
                    ui.set_min_width(180.0);
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(24.0).strong());
                    });
                });
        }
    });

    if dashboard.is_empty_view() {
        ui.label(
            RichText::new("No records match the current filters.")
                .color(Color32::from_rgb(220, 160, 40)),
        );
    }
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
            if ui
                .add_enabled(state.data_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui.button("Clear cache").clicked() {
                state.cache.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let name = state
                .data_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        ui.checkbox(&mut state.show_tables, "Show data tables");

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "txt", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "tab", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
