//! Coordinate mapping for the hourly temperature chart.

use std::fmt::Write as _;

use crate::model::{HOURLY_POINTS, HourlyForecast};

/// Degrees added below the minimum and above the maximum so the line never
/// touches the plot edge.
pub const TEMP_PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
    pub padding_right: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 100.0,
            padding_top: 10.0,
            padding_bottom: 20.0,
            padding_left: 0.0,
            padding_right: 0.0,
        }
    }
}

impl ChartGeometry {
    /// A geometry without padding, e.g. for a character grid.
    pub fn plain(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding_top: 0.0,
            padding_bottom: 0.0,
            padding_left: 0.0,
            padding_right: 0.0,
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding_left - self.padding_right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding_top - self.padding_bottom
    }

    fn baseline(&self) -> f64 {
        self.height - self.padding_bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub temp: f64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyChart {
    geometry: ChartGeometry,
    temp_min: f64,
    temp_max: f64,
    points: Vec<ChartPoint>,
}

impl HourlyChart {
    /// Maps at most the first ten hourly entries, in order, left to right.
    pub fn new(hourly: &[HourlyForecast], geometry: ChartGeometry) -> Self {
        let shown = &hourly[..hourly.len().min(HOURLY_POINTS)];

        let (lo, hi) = shown.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h.temp), hi.max(h.temp))
        });
        let (temp_min, temp_max) = if shown.is_empty() {
            (0.0, 0.0)
        } else {
            (lo - TEMP_PADDING, hi + TEMP_PADDING)
        };
        let range = temp_max - temp_min;

        let last = shown.len().saturating_sub(1);
        let points = shown
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let fraction = if last == 0 { 0.0 } else { i as f64 / last as f64 };
                let x = geometry.padding_left + fraction * geometry.plot_width();
                let y = geometry.baseline() - ((h.temp - temp_min) / range) * geometry.plot_height();
                ChartPoint {
                    x,
                    y,
                    temp: h.temp,
                    time: h.time.clone(),
                }
            })
            .collect();

        Self {
            geometry,
            temp_min,
            temp_max,
            points,
        }
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    pub fn temp_range(&self) -> (f64, f64) {
        (self.temp_min, self.temp_max)
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One x-axis label per point.
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.time.as_str()).collect()
    }

    /// Straight segments through every point: `M x y L x y ...`.
    pub fn line_path(&self) -> String {
        let mut path = String::new();
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                path.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{cmd} {} {}", p.x, p.y);
        }
        path
    }

    /// The line path closed down to the bottom edge of the chart.
    pub fn area_path(&self) -> String {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return String::new();
        };
        format!(
            "{} L {} {} L {} {} Z",
            self.line_path(),
            last.x,
            self.geometry.height,
            first.x,
            self.geometry.height
        )
    }

    /// Index of the point horizontally closest to `x`; ties go to the
    /// earlier point.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| {
                let dist = (p.x - x).abs();
                match best {
                    Some((_, best_dist)) if best_dist <= dist => best,
                    _ => Some((i, dist)),
                }
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::hourly;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn maps_extremes_inside_padded_range() {
        let chart = HourlyChart::new(&hourly(&[10.0, 20.0]), ChartGeometry::plain(100.0, 50.0));

        assert_eq!(chart.temp_range(), (8.0, 22.0));
        let pts = chart.points();
        assert!(approx(pts[0].x, 0.0));
        assert!(approx(pts[1].x, 100.0));
        // 10 sits 2/14 of the way up, 20 sits 12/14 of the way up.
        assert!(approx(pts[0].y, 50.0 - 50.0 * 2.0 / 14.0));
        assert!(approx(pts[1].y, 50.0 - 50.0 * 12.0 / 14.0));
    }

    #[test]
    fn default_geometry_respects_vertical_padding() {
        let chart = HourlyChart::new(&hourly(&[5.0, 5.0, 5.0]), ChartGeometry::default());

        // Flat line sits halfway within the plot area (top 10, bottom 20).
        for p in chart.points() {
            assert!(approx(p.y, 80.0 - 35.0));
        }
        assert!(approx(chart.points()[1].x, 250.0));
    }

    #[test]
    fn keeps_only_first_ten_points() {
        let temps: Vec<f64> = (0..14).map(f64::from).collect();
        let chart = HourlyChart::new(&hourly(&temps), ChartGeometry::default());

        assert_eq!(chart.points().len(), 10);
        assert_eq!(chart.labels().len(), 10);
        assert_eq!(chart.labels()[0], "09:00");
        assert!(approx(chart.points()[9].x, 500.0));
    }

    #[test]
    fn single_point_does_not_divide_by_zero() {
        let chart = HourlyChart::new(&hourly(&[12.0]), ChartGeometry::default());

        let p = &chart.points()[0];
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(approx(p.x, 0.0));
    }

    #[test]
    fn empty_input_yields_empty_chart() {
        let chart = HourlyChart::new(&[], ChartGeometry::default());

        assert!(chart.is_empty());
        assert_eq!(chart.line_path(), "");
        assert_eq!(chart.area_path(), "");
        assert_eq!(chart.nearest(10.0), None);
    }

    #[test]
    fn paths_trace_points_and_close_to_bottom() {
        let chart = HourlyChart::new(&hourly(&[10.0, 20.0]), ChartGeometry::plain(100.0, 50.0));
        let line = chart.line_path();

        assert!(line.starts_with("M 0 "));
        assert!(line.contains(" L 100 "));
        assert!(chart.area_path().ends_with("L 100 50 L 0 50 Z"));
    }

    #[test]
    fn hover_picks_closest_point() {
        let chart = HourlyChart::new(&hourly(&[1.0, 2.0, 3.0, 4.0, 5.0]), ChartGeometry::plain(400.0, 10.0));

        assert_eq!(chart.nearest(-30.0), Some(0));
        assert_eq!(chart.nearest(140.0), Some(1));
        assert_eq!(chart.nearest(160.0), Some(2));
        // Midway between points 0 and 1 resolves to the earlier one.
        assert_eq!(chart.nearest(50.0), Some(0));
        assert_eq!(chart.nearest(1000.0), Some(4));
    }
}
