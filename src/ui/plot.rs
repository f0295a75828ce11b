use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points, Polygon,
};

use catalog_lens::data::aggregate::{HistogramBin, Pivot};
use catalog_lens::data::dashboard::DashboardResults;
use catalog_lens::data::model::ContentType;

use crate::color::{heat_color, ColorMap};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current results, top to bottom.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(err).color(Color32::RED));
        });
        return;
    }
    let Some(results) = &state.results else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to view the dashboard  (File → Open…)");
        });
        return;
    };

    chart_section(ui, "Movies vs TV Shows", |ui| type_pie(ui, results));
    chart_section(ui, "Content Added Over the Years", |ui| year_line(ui, results));
    chart_section(ui, "Top 10 Genres", |ui| genre_bars(ui, results));
    chart_section(ui, "Movie Duration Distribution (Minutes)", |ui| {
        duration_box(ui, results)
    });
    chart_section(ui, "Release Year Distribution", |ui| {
        year_histogram(ui, &results.year_histogram)
    });
    chart_section(ui, "Top 10 Countries by Content", |ui| country_bars(ui, results));
    chart_section(ui, "Genre Treemap", |ui| genre_treemap(ui, &results.top_genres));
    chart_section(ui, "Heatmap: Country vs Release Year", |ui| {
        country_year_heatmap(ui, &results.pivot)
    });
}

fn chart_section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.add_space(8.0);
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        add_contents(ui);
    });
}

// ---------------------------------------------------------------------------
// 1. Pie
// ---------------------------------------------------------------------------

fn type_pie(ui: &mut Ui, results: &DashboardResults) {
    if results.total == 0 {
        ui.weak("No titles match the current filters.");
        return;
    }
    let colors = ColorMap::new(ContentType::ALL.iter());
    let total = results.total as f64;

    Plot::new("type_pie")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for (t, n) in &results.type_counts {
                let sweep = TAU * (*n as f64 / total);
                let steps = ((sweep / TAU) * 128.0).ceil().max(2.0) as usize;
                let mut points = vec![[0.0, 0.0]];
                points.extend((0..=steps).map(|s| {
                    let a = start - sweep * s as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));
                start -= sweep;

                let share = 100.0 * *n as f64 / total;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(points))
                        .fill_color(colors.color_for(t))
                        .name(format!("{t} ({share:.1}%)")),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// 2. Titles per year
// ---------------------------------------------------------------------------

fn year_line(ui: &mut Ui, results: &DashboardResults) {
    let points: Vec<[f64; 2]> = results
        .year_counts
        .iter()
        .map(|&(year, n)| [year as f64, n as f64])
        .collect();

    Plot::new("year_line")
        .height(CHART_HEIGHT)
        .x_axis_label("year")
        .y_axis_label("count")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::new(points.clone())).name("titles").width(2.0));
            plot_ui.points(Points::new(PlotPoints::new(points)).radius(2.5));
        });
}

// ---------------------------------------------------------------------------
// 3 / 6. Top-N bars
// ---------------------------------------------------------------------------

/// Axis formatter that shows `labels[i]` at integer position `i`.
fn label_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn genre_bars(ui: &mut Ui, results: &DashboardResults) {
    let labels: Vec<String> = results.top_genres.iter().map(|(g, _)| g.clone()).collect();
    let bars: Vec<Bar> = results
        .top_genres
        .iter()
        .enumerate()
        .map(|(i, (genre, n))| Bar::new(i as f64, *n as f64).name(genre).width(0.7))
        .collect();

    Plot::new("genre_bars")
        .height(CHART_HEIGHT)
        .x_axis_formatter(label_formatter(labels))
        .y_axis_label("count")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(99, 110, 250)));
        });
}

fn country_bars(ui: &mut Ui, results: &DashboardResults) {
    // Most frequent country on top.
    let n = results.top_countries.len();
    let labels: Vec<String> = results
        .top_countries
        .iter()
        .rev()
        .map(|(c, _)| c.clone())
        .collect();
    let bars: Vec<Bar> = results
        .top_countries
        .iter()
        .enumerate()
        .map(|(i, (country, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .name(country)
                .width(0.7)
        })
        .collect();

    Plot::new("country_bars")
        .height(CHART_HEIGHT)
        .y_axis_formatter(label_formatter(labels))
        .x_axis_label("count")
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(Color32::from_rgb(239, 85, 59)),
            );
        });
}

// ---------------------------------------------------------------------------
// 4. Duration box plot
// ---------------------------------------------------------------------------

fn duration_box(ui: &mut Ui, results: &DashboardResults) {
    let summary = match &results.durations {
        Ok(summary) => summary,
        Err(e) => {
            ui.label(RichText::new(format!("Duration chart unavailable: {e}")).color(Color32::RED));
            return;
        }
    };

    if let Some(stats) = results.duration_stats {
        let elem = BoxElem::new(
            0.0,
            BoxSpread::new(stats.min, stats.q1, stats.median, stats.q3, stats.max),
        )
        .name("Movies")
        .box_width(0.5);

        Plot::new("duration_box")
            .height(CHART_HEIGHT)
            .show_x(false)
            .y_axis_label("minutes")
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(vec![elem]).color(Color32::from_rgb(0, 204, 150)));
            });
    } else {
        ui.weak("No movie durations to show.");
    }

    ui.weak(format!(
        "{} movies plotted, {} skipped (unparsable), {} without duration",
        summary.minutes.len(),
        summary.skipped,
        summary.missing
    ));
}

// ---------------------------------------------------------------------------
// 5. Release-year histogram
// ---------------------------------------------------------------------------

fn year_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.0}–{:.0}", b.start, b.end))
        })
        .collect();

    Plot::new("year_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("release_year")
        .y_axis_label("count")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(171, 99, 250)));
        });
}

// ---------------------------------------------------------------------------
// 7. Treemap
// ---------------------------------------------------------------------------

/// Split `rect` between `items` proportionally to their weight, cutting
/// along the longer side each time.
fn treemap_layout(items: &[(usize, f64)], rect: Rect, out: &mut Vec<(usize, Rect)>) {
    match items {
        [] => {}
        [(idx, _)] => out.push((*idx, rect)),
        _ => {
            let total: f64 = items.iter().map(|(_, w)| w).sum();
            let mut acc = 0.0;
            let mut split = 1;
            for (k, (_, w)) in items.iter().enumerate() {
                acc += w;
                if acc >= total / 2.0 {
                    split = (k + 1).clamp(1, items.len() - 1);
                    break;
                }
            }
            let left_sum: f64 = items[..split].iter().map(|(_, w)| w).sum();
            let frac = if total > 0.0 { (left_sum / total) as f32 } else { 0.5 };

            let (a, b) = if rect.width() >= rect.height() {
                let x = rect.min.x + rect.width() * frac;
                (
                    Rect::from_min_max(rect.min, Pos2::new(x, rect.max.y)),
                    Rect::from_min_max(Pos2::new(x, rect.min.y), rect.max),
                )
            } else {
                let y = rect.min.y + rect.height() * frac;
                (
                    Rect::from_min_max(rect.min, Pos2::new(rect.max.x, y)),
                    Rect::from_min_max(Pos2::new(rect.min.x, y), rect.max),
                )
            };
            treemap_layout(&items[..split], a, out);
            treemap_layout(&items[split..], b, out);
        }
    }
}

fn genre_treemap(ui: &mut Ui, genres: &[(String, usize)]) {
    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let area = response.rect;

    let names: Vec<String> = genres.iter().map(|(g, _)| g.clone()).collect();
    let colors = ColorMap::new(names.iter());
    let items: Vec<(usize, f64)> = genres
        .iter()
        .enumerate()
        .map(|(i, (_, n))| (i, *n as f64))
        .collect();

    let mut cells = Vec::with_capacity(items.len());
    treemap_layout(&items, area, &mut cells);

    let mut hovered = None;
    for (idx, rect) in cells {
        let (genre, count) = &genres[idx];
        let cell = rect.shrink(1.0);
        painter.rect_filled(cell, 2.0, colors.color_for(genre));
        if cell.width() > 40.0 && cell.height() > 16.0 {
            painter.text(
                cell.left_top() + Vec2::new(4.0, 4.0),
                Align2::LEFT_TOP,
                format!("{genre}\n{count}"),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
        if response.hover_pos().is_some_and(|p| cell.contains(p)) {
            hovered = Some(format!("{genre}: {count}"));
        }
    }
    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}

// ---------------------------------------------------------------------------
// 8. Heatmap
// ---------------------------------------------------------------------------

fn country_year_heatmap(ui: &mut Ui, pivot: &Pivot) {
    if pivot.is_empty() {
        ui.weak("No rows with a country.");
        return;
    }

    const LABEL_W: f32 = 150.0;
    const ROW_H: f32 = 12.0;
    const AXIS_H: f32 = 18.0;

    let n_rows = pivot.countries.len();
    let n_cols = pivot.years.len();
    let size = Vec2::new(ui.available_width(), n_rows as f32 * ROW_H + AXIS_H);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let area = response.rect;

    let grid = Rect::from_min_max(
        Pos2::new(area.min.x + LABEL_W, area.min.y),
        Pos2::new(area.max.x, area.max.y - AXIS_H),
    );
    let cell_w = grid.width() / n_cols as f32;
    let max = pivot.max_count().max(1) as f32;
    let text_color = ui.visuals().text_color();

    for (ci, country) in pivot.countries.iter().enumerate() {
        let y = grid.min.y + ci as f32 * ROW_H;
        painter.text(
            Pos2::new(grid.min.x - 4.0, y + ROW_H / 2.0),
            Align2::RIGHT_CENTER,
            country,
            FontId::proportional(9.0),
            text_color,
        );
        for (yi, count) in pivot.counts[ci].iter().enumerate() {
            let cell = Rect::from_min_size(
                Pos2::new(grid.min.x + yi as f32 * cell_w, y),
                Vec2::new(cell_w, ROW_H),
            );
            painter.rect_filled(cell, 0.0, heat_color(*count as f32 / max));
        }
    }

    // Year ticks, roughly one every 60 px.
    let every = ((60.0 / cell_w).ceil() as usize).max(1);
    for (yi, year) in pivot.years.iter().enumerate().step_by(every) {
        painter.text(
            Pos2::new(grid.min.x + (yi as f32 + 0.5) * cell_w, grid.max.y + 2.0),
            Align2::CENTER_TOP,
            year.to_string(),
            FontId::proportional(10.0),
            text_color,
        );
    }

    let hovered = response.hover_pos().filter(|p| grid.contains(*p)).and_then(|p| {
        let ci = ((p.y - grid.min.y) / ROW_H) as usize;
        let yi = ((p.x - grid.min.x) / cell_w) as usize;
        let country = pivot.countries.get(ci)?;
        let year = pivot.years.get(yi)?;
        Some(format!("{country}, {year}: {}", pivot.counts[ci][yi]))
    });
    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}
