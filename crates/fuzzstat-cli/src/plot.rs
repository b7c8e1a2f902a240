//! Comparison chart of two mean curves

use std::path::Path;

use anyhow::Context;
use fuzzstat_analysis::curve::Curve;
use plotters::prelude::*;

use crate::util;

/// Output size in pixels: a 6.4 x 4.8 inch figure at 300 DPI.
pub const CHART_SIZE: (u32, u32) = (1920, 1440);

/// A labeled curve drawn as one series.
pub struct Series<'a> {
    pub label: &'a str,
    pub curve: &'a Curve,
}

/// Draws both series as lines on one chart with a legend and writes a PNG.
pub fn render_comparison(
    path: &Path,
    first: &Series<'_>,
    second: &Series<'_>,
    x_desc: &str,
    y_desc: &str,
) -> anyhow::Result<()> {
    util::ensure_parent_dir(path)?;
    draw(path, first, second, x_desc, y_desc)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Failed to render chart: {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved chart");
    Ok(())
}

fn draw(
    path: &Path,
    first: &Series<'_>,
    second: &Series<'_>,
    x_desc: &str,
    y_desc: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = axis_ranges([first.curve, second.curve]);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .x_label_area_size(90)
        .y_label_area_size(120)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(("sans-serif", 32))
        .axis_desc_style(("sans-serif", 36))
        .draw()?;

    for (series, color) in [(first, BLUE), (second, RED)] {
        chart
            .draw_series(LineSeries::new(
                series.curve.points().iter().copied(),
                color.stroke_width(3),
            ))?
            .label(series.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(3))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font(("sans-serif", 36))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Axis ranges covering every sample, with a little headroom above the
/// largest value. Degenerate ranges are widened so the chart stays drawable.
fn axis_ranges<'a>(
    curves: impl IntoIterator<Item = &'a Curve>,
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in curves.into_iter().flat_map(Curve::points) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_min > x_max {
        return (0.0..1.0, 0.0..1.0);
    }

    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };
    let y_min = y_min.min(0.0);
    let y_max = if y_max > y_min { y_max * 1.05 } else { y_min + 1.0 };
    (x_min..x_max, y_min..y_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Curve {
        Curve::new(points.to_vec()).unwrap()
    }

    #[test]
    fn test_axis_ranges_cover_both_curves() {
        let a = curve(&[(0.0, 3.0), (10.0, 5.0)]);
        let b = curve(&[(0.0, 2.0), (20.0, 6.0)]);
        let (x, y) = axis_ranges([&a, &b]);
        assert_eq!(x, 0.0..20.0);
        assert_eq!(y.start, 0.0);
        assert!(y.end >= 6.0);
    }

    #[test]
    fn test_axis_ranges_degenerate() {
        let empty = Curve::default();
        assert_eq!(axis_ranges([&empty]), (0.0..1.0, 0.0..1.0));

        let single = curve(&[(0.0, 0.0)]);
        assert_eq!(axis_ranges([&single]), (0.0..1.0, 0.0..1.0));
    }
}
