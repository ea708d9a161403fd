use crate::{
    error::ReportError,
    models::BestFundsView,
    utils::{log_report, Logger},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

const WIDTH: i32 = 960;
const HEIGHT: i32 = 540;
const PADDING: f64 = 40.0;
const LEFT_MARGIN: f64 = 70.0;
const BOTTOM_MARGIN: f64 = 80.0;
const Y_TICKS: usize = 6;
const MAX_DATE_LABELS: usize = 12;
const POSITIVE_COLOR: &str = "blue";
const NEGATIVE_COLOR: &str = "red";
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Destination for the performance chart
pub trait ChartSink {
    /// Render the view. Returns where the chart ended up, if it is a file.
    fn render(&mut self, view: &BestFundsView) -> Result<Option<PathBuf>, ReportError>;
}

/// Writes the chart as a standalone SVG file
pub struct SvgChart {
    path: PathBuf,
    logger: Logger,
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: Logger::new("SVG_CHART"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for SvgChart {
    fn render(&mut self, view: &BestFundsView) -> Result<Option<PathBuf>, ReportError> {
        if view.is_empty() {
            self.logger.warn("Nothing to plot");
            return Ok(None);
        }

        let svg = render_svg(view);
        fs::write(&self.path, svg).map_err(|source| ReportError::ChartWrite {
            path: self.path.clone(),
            source,
        })?;

        log_report(&format!(
            "Chart with {} series written to {}",
            view.series.len(),
            self.path.display()
        ));
        Ok(Some(self.path.clone()))
    }
}

/// Keeps nothing, for runs that only want the printed ranking
#[derive(Debug, Default)]
pub struct NoChart;

impl ChartSink for NoChart {
    fn render(&mut self, _view: &BestFundsView) -> Result<Option<PathBuf>, ReportError> {
        Ok(None)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_percent_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

fn extent(view: &BestFundsView) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;

    for value in view.series.iter().flat_map(|s| s.values.iter().flatten()) {
        if value.is_finite() {
            min_v = min_v.min(*value);
            max_v = max_v.max(*value);
        }
    }

    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }

    // Headroom for the final-point annotations
    let span = (max_v - min_v).max(1.0);
    Some((min_v - span * 0.05, max_v + span * 0.1))
}

fn scale_value(value: f64, min_v: f64, max_v: f64) -> f64 {
    let height = HEIGHT as f64;
    if (max_v - min_v).abs() < f64::EPSILON {
        return height / 2.0;
    }

    let inner_height = height - PADDING - BOTTOM_MARGIN;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize) -> Vec<f64> {
    let width = WIDTH as f64;
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![(LEFT_MARGIN + width - PADDING) / 2.0];
    }

    let inner_width = width - LEFT_MARGIN - PADDING;
    (0..len)
        .map(|i| LEFT_MARGIN + inner_width * (i as f64 / (len - 1) as f64))
        .collect()
}

fn svg_header() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#333}}</style><rect width="100%" height="100%" fill="white" />"#,
        w = WIDTH,
        h = HEIGHT
    )
}

fn draw_y_axis(svg: &mut String, min_v: f64, max_v: f64) {
    let width = WIDTH as f64;
    let step = (max_v - min_v) / (Y_TICKS - 1) as f64;

    for i in 0..Y_TICKS {
        let value = min_v + step * i as f64;
        let y = scale_value(value, min_v, max_v);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#e5e5e5" stroke-width="0.5" />"##,
            x1 = LEFT_MARGIN,
            x2 = width - PADDING,
            y = y
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = LEFT_MARGIN - 6.0,
            y = y + 4.0,
            label = format_percent_tick(value, step)
        ));
    }

    svg.push_str(&format!(
        r#"<text transform="translate(16,{y:.2}) rotate(-90)" text-anchor="middle">Performance(%)</text>"#,
        y = (PADDING + HEIGHT as f64 - BOTTOM_MARGIN) / 2.0
    ));
}

fn draw_time_axis(svg: &mut String, view: &BestFundsView, xs: &[f64]) {
    let width = WIDTH as f64;
    let axis_y = HEIGHT as f64 - BOTTOM_MARGIN;

    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = LEFT_MARGIN,
        x2 = width - PADDING,
        y = axis_y
    ));

    let stride = view.dates.len().div_ceil(MAX_DATE_LABELS).max(1);
    for (idx, date) in view.dates.iter().enumerate().step_by(stride) {
        let x = xs[idx];
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#ccc" stroke-width="1" />"##,
            x = x,
            y1 = axis_y,
            y2 = axis_y + 4.0
        ));
        svg.push_str(&format!(
            r#"<text transform="translate({x:.2},{y:.2}) rotate(45)" text-anchor="start">{label}</text>"#,
            x = x,
            y = axis_y + 12.0,
            label = date.format("%Y-%m-%d")
        ));
    }
}

fn draw_legend(svg: &mut String, labels: &[(String, &str)]) {
    let x = LEFT_MARGIN + 10.0;
    let mut y = PADDING + 14.0;
    for (label, color) in labels {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="2" />"#,
            x1 = x,
            x2 = x + 20.0,
            y = y - 4.0,
            color = color
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="start">{label}</text>"#,
            x = x + 26.0,
            y = y,
            label = escape_xml(label)
        ));
        y += 16.0;
    }
}

/// Line chart of every series with its last point marked and annotated
pub fn render_svg(view: &BestFundsView) -> String {
    let mut svg = svg_header();
    let Some((min_v, max_v)) = extent(view) else {
        svg.push_str("</svg>");
        return svg;
    };
    let xs = x_positions(view.dates.len());

    draw_y_axis(&mut svg, min_v, max_v);
    draw_time_axis(&mut svg, view, &xs);

    let mut legend = Vec::with_capacity(view.series.len());
    let mut markers = String::new();
    for (idx, series) in view.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        legend.push((series.ticker.to_string(), color));

        // Missing values break the line into separate segments
        let mut segment: Vec<(f64, f64)> = Vec::new();
        let mut segments = Vec::new();
        for (row, value) in series.values.iter().enumerate() {
            match value.filter(|v| v.is_finite()) {
                Some(v) => segment.push((xs[row], scale_value(v, min_v, max_v))),
                None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
                None => {}
            }
        }
        if !segment.is_empty() {
            segments.push(segment);
        }

        for points in segments {
            let coords = points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            svg.push_str(&format!(
                r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{coords}" />"#,
                color = color,
                coords = coords
            ));
        }

        if let Some((row, value)) = series.final_point() {
            let x = xs[row];
            let y = scale_value(value, min_v, max_v);
            let marker_color = if value >= 0.0 { POSITIVE_COLOR } else { NEGATIVE_COLOR };
            markers.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{marker_color}" />"#
            ));
            markers.push_str(&format!(
                r#"<text x="{x:.2}" y="{ty:.2}" text-anchor="middle">{value:.2}%</text>"#,
                ty = y - 10.0
            ));
        }
    }

    svg.push_str(&markers);
    draw_legend(&mut svg, &legend);
    svg.push_str("</svg>");
    svg
}
