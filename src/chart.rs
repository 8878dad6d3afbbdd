//! Trend chart
//!
//! Three stacked panels sharing the x axis: weight, blood sugar and BMI with
//! the ideal band shaded. Rendered with plotters into an RGB buffer and
//! encoded as PNG.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};

use crate::health::{calculate_bmi, IDEAL_BMI_RANGE};
use crate::models::HealthEntry;

const COLOR_WEIGHT: RGBColor = RGBColor(0, 0, 255);
const COLOR_SUGAR: RGBColor = RGBColor(0, 128, 0);
const COLOR_BMI: RGBColor = RGBColor(255, 165, 0);
const COLOR_IDEAL: RGBColor = RGBColor(0, 176, 80);

/// Per-entry values for the chart, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub weight: Vec<f64>,
    pub blood_sugar: Vec<f64>,
    /// `None` where no usable height is known
    pub bmi: Vec<Option<f64>>,
}

impl TrendSeries {
    pub fn from_entries(entries: &[HealthEntry], height_cm: Option<f64>) -> Self {
        let mut series = Self::default();
        for entry in entries {
            series.labels.push(entry.timestamp.format("%m/%d").to_string());
            series.weight.push(entry.weight);
            series.blood_sugar.push(entry.blood_sugar);
            series
                .bmi
                .push(height_cm.and_then(|h| calculate_bmi(entry.weight, h)));
        }
        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn has_bmi(&self) -> bool {
        self.bmi.iter().any(Option::is_some)
    }
}

/// Padded y range over `values`; `0..1` when there are none
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max - min < 1e-9 { 1.0 } else { (max - min) * 0.05 };
    (min - pad)..(max + pad)
}

fn indexed(values: &[f64]) -> Vec<(i32, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as i32, *v))
        .collect()
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &TrendSeries,
    label: &str,
    points: Vec<(i32, f64)>,
    y_range: Range<f64>,
    color: RGBColor,
    band: Option<(f64, f64)>,
) -> Result<(), String> {
    let x_max = series.len().max(1) as i32;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..x_max, y_range)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_labels(series.len().clamp(1, 10))
        .x_label_formatter(&|x| {
            series
                .labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc(label)
        .draw()
        .map_err(|e| e.to_string())?;

    if let Some((lo, hi)) = band {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0, lo), (x_max, hi)],
                COLOR_IDEAL.mix(0.15).filled(),
            )))
            .map_err(|e| e.to_string())?
            .label("Ideal range")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], COLOR_IDEAL.mix(0.15).filled())
            });
    }

    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
        .map_err(|e| e.to_string())?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    chart
        .draw_series(points.iter().map(|(x, y)| Circle::new((*x, *y), 3, color.filled())))
        .map_err(|e| e.to_string())?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Largest chart accepted, in pixels (a 10000 x 10000 image)
const MAX_CHART_PIXELS: usize = 100_000_000;

/// RGB buffer length for a `width` x `height` image
fn buffer_len(width: u32, height: u32) -> Result<usize, String> {
    if width == 0 || height == 0 {
        return Err("chart dimensions must be non-zero".to_string());
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|pixels| *pixels <= MAX_CHART_PIXELS)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| "chart dimensions too large".to_string())
}

/// Render the three-panel chart as PNG bytes. An empty series gives empty panels.
pub fn render_trend_chart(
    series: &TrendSeries,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    let mut buffer = vec![0u8; buffer_len(width, height)?];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let panels = root.split_evenly((3, 1));

        draw_panel(
            &panels[0],
            series,
            "Weight (kg)",
            indexed(&series.weight),
            value_range(series.weight.iter().copied()),
            COLOR_WEIGHT,
            None,
        )?;

        draw_panel(
            &panels[1],
            series,
            "Sugar (mg/dL)",
            indexed(&series.blood_sugar),
            value_range(series.blood_sugar.iter().copied()),
            COLOR_SUGAR,
            None,
        )?;

        let bmi_points: Vec<(i32, f64)> = series
            .bmi
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as i32, v)))
            .collect();
        let band = series.has_bmi().then_some(IDEAL_BMI_RANGE);
        let bmi_range = value_range(
            bmi_points
                .iter()
                .map(|(_, v)| *v)
                .chain(band.into_iter().flat_map(|(lo, hi)| [lo, hi])),
        );
        draw_panel(&panels[2], series, "BMI", bmi_points, bmi_range, COLOR_BMI, band)?;

        root.present().map_err(|e| e.to_string())?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}
