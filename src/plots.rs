//! Chart rendering with [`plotters`].
//!
//! Every chart is a 1200x800 PNG drawn on the bitmap backend and flushed with
//! `present()` before the function returns. Input is validated before the
//! output file is created, so bad data never leaves a half-written image.

use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1200, 800);

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// A named series of values, one per group on the x axis
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A named density curve
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Axis descriptions and title shared by the cartesian charts
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::pick(index).to_backend_color().rgb;
    RGBColor(r, g, b)
}

/// Upper bound for a value axis: a bit of headroom above the largest value
fn value_axis_max<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let max = values.copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Draws one bar per label and saves the chart as PNG
pub fn draw_bar_chart(bars: &[(String, f64)], labels: ChartLabels, output_path: &Path) -> Result<()> {
    if bars.is_empty() {
        return Err(PlotError::InvalidData("Bar chart needs at least one bar".to_string()));
    }
    let series = [BarSeries {
        name: labels.y_label.to_string(),
        values: bars.iter().map(|(_, v)| *v).collect(),
    }];
    let groups: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
    render_bars(&groups, &series, labels, false, output_path)
}

/// Draws side-by-side bars for several series over the same groups
pub fn draw_grouped_bar_chart(
    groups: &[String],
    series: &[BarSeries],
    labels: ChartLabels,
    output_path: &Path,
) -> Result<()> {
    if groups.is_empty() || series.is_empty() {
        return Err(PlotError::InvalidData(
            "Grouped bar chart needs at least one group and one series".to_string(),
        ));
    }
    if let Some(bad) = series.iter().find(|s| s.values.len() != groups.len()) {
        return Err(PlotError::InvalidData(format!(
            "Series {} has {} values for {} groups",
            bad.name,
            bad.values.len(),
            groups.len()
        )));
    }
    render_bars(groups, series, labels, true, output_path)
}

fn render_bars(
    groups: &[String],
    series: &[BarSeries],
    labels: ChartLabels,
    with_legend: bool,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let y_max = value_axis_max(series.iter().flat_map(|s| s.values.iter()));

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(85)
        .build_cartesian_2d((0..groups.len()).into_segmented(), 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_formatter = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => groups.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len())
        .x_label_formatter(&x_formatter)
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Bars of one group share the group's segment; split it by pixel margins.
    let plot_width = chart.plotting_area().dim_in_pixel().0 as f64;
    let segment = plot_width / groups.len() as f64;
    let padding = segment * 0.1;
    let bar_width = (segment - 2.0 * padding) / series.len() as f64;

    for (s, bars) in series.iter().enumerate() {
        let color = palette_color(s);
        let left = (padding + bar_width * s as f64).round() as u32;
        let right = (segment - padding - bar_width * (s + 1) as f64).max(0.0).round() as u32;

        let anno = chart
            .draw_series(bars.values.iter().enumerate().map(|(i, value)| {
                let fill = if with_legend { color } else { palette_color(i) };
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                    fill.filled(),
                );
                bar.set_margin(0, 0, left, right);
                bar
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        if with_legend {
            anno.label(bars.name.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 20))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Draws a pie chart of label shares with percentage annotations
pub fn draw_pie_chart(slices: &[(String, f64)], title: &str, output_path: &Path) -> Result<()> {
    if slices.is_empty() {
        return Err(PlotError::InvalidData("Pie chart needs at least one slice".to_string()));
    }
    if slices.iter().any(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(PlotError::InvalidData("Pie slices must be non-negative".to_string()));
    }
    if slices.iter().map(|(_, v)| v).sum::<f64>() <= 0.0 {
        return Err(PlotError::InvalidData("Pie slices sum to zero".to_string()));
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let area = root
        .titled(title, ("sans-serif", 36))
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let sizes: Vec<f64> = slices.iter().map(|(_, v)| *v).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(palette_color).collect();
    let names: Vec<String> = slices.iter().map(|(name, _)| name.clone()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &names);
    pie.start_angle(30.0);
    pie.label_style(("sans-serif", 20).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    area.draw(&pie)
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Draws overlaid line curves with a legend
pub fn draw_density_chart(curves: &[Curve], labels: ChartLabels, output_path: &Path) -> Result<()> {
    let points = || curves.iter().flat_map(|c| c.points.iter());
    if curves.is_empty() || points().next().is_none() {
        return Err(PlotError::InvalidData("Density chart needs at least one curve".to_string()));
    }

    let x_min = points().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let mut x_max = points().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    if x_min >= x_max {
        x_max = x_min + 1.0;
    }
    let y_max = value_axis_max(points().map(|(_, y)| y));

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (i, curve) in curves.iter().enumerate() {
        let color = palette_color(i);
        chart
            .draw_series(LineSeries::new(curve.points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(curve.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
