//! Text rendering for the terminal: dashboard, hourly chart, inspector,
//! alerts and the error dialog.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;

use forecast_core::{
    DashboardView, ErrorDialog, Theme, WeatherAlert,
    chart::{ChartGeometry, HourlyChart},
    inspector::{self, TokenClass},
    map::{MapView, Transition},
    model::HourlyForecast,
};

/// Columns used by the ASCII hourly chart plot area.
pub const CHART_WIDTH: usize = 60;
/// Rows used by the ASCII hourly chart plot area.
pub const CHART_HEIGHT: usize = 8;

/// ANSI escapes for one theme. Every field is a prefix; `reset` ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub reset: &'static str,
    pub bold: &'static str,
    pub accent: &'static str,
    pub muted: &'static str,
    pub error: &'static str,
    pub key: &'static str,
    pub string: &'static str,
    pub number: &'static str,
    pub boolean: &'static str,
    pub null: &'static str,
    pub brace: &'static str,
}

impl Palette {
    pub const DARK: Palette = Palette {
        reset: "\x1b[0m",
        bold: "\x1b[1m",
        accent: "\x1b[96m",
        muted: "\x1b[90m",
        error: "\x1b[91m",
        key: "\x1b[94m",
        string: "\x1b[92m",
        number: "\x1b[93m",
        boolean: "\x1b[95m",
        null: "\x1b[91m",
        brace: "\x1b[37m",
    };

    pub const LIGHT: Palette = Palette {
        reset: "\x1b[0m",
        bold: "\x1b[1m",
        accent: "\x1b[34m",
        muted: "\x1b[2m",
        error: "\x1b[31m",
        key: "\x1b[34m",
        string: "\x1b[32m",
        number: "\x1b[33m",
        boolean: "\x1b[35m",
        null: "\x1b[31m",
        brace: "\x1b[30m",
    };

    pub const PLAIN: Palette = Palette {
        reset: "",
        bold: "",
        accent: "",
        muted: "",
        error: "",
        key: "",
        string: "",
        number: "",
        boolean: "",
        null: "",
        brace: "",
    };

    /// Honours `NO_COLOR`.
    pub fn for_theme(theme: Theme) -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            return Self::PLAIN;
        }
        match theme {
            Theme::Dark => Self::DARK,
            Theme::Light => Self::LIGHT,
        }
    }

    fn token(&self, class: TokenClass) -> &'static str {
        match class {
            TokenClass::Key => self.key,
            TokenClass::String => self.string,
            TokenClass::Number => self.number,
            TokenClass::Boolean => self.boolean,
            TokenClass::Null => self.null,
            TokenClass::Brace => self.brace,
            TokenClass::Plain => "",
        }
    }
}

pub fn loading_line(location: &str) -> String {
    format!("Fetching the forecast for {location}...")
}

pub fn dashboard(
    view: &DashboardView<'_>,
    map: &MapView,
    fetched_at: Option<DateTime<Utc>>,
    p: &Palette,
) -> String {
    let record = view.record;
    let current = &record.current;
    let mut out = String::new();

    let _ = writeln!(out, "{}{}{}  {}{}{}", p.bold, view.headline, p.reset, p.muted, record.location, p.reset);
    let _ = writeln!(out, "{}{}{}", p.muted, record.date, p.reset);
    let _ = write!(
        out,
        "{}{}{}°C{}  {}",
        p.bold,
        p.accent,
        view.current_temp(),
        p.reset,
        current.condition
    );
    if let Some(at) = fetched_at {
        let _ = write!(
            out,
            "  {}(updated {}){}",
            p.muted,
            at.with_timezone(&Local).format("%H:%M"),
            p.reset
        );
    }
    out.push_str("\n\n");

    for pair in view.highlights.chunks(2) {
        let mut line = String::from(" ");
        for h in pair {
            let _ = write!(line, " {}{:<11}{} {:<18}", p.muted, h.label, p.reset, h.value);
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(out, "\n{}Hourly{}", p.bold, p.reset);
    out.push_str(&ascii_chart(&record.hourly, p));

    let _ = writeln!(out, "\n{}Next {} days{}", p.bold, record.daily.len(), p.reset);
    for day in &record.daily {
        let _ = writeln!(
            out,
            "  {:<24} {:<16} {}{}°{} / {}°",
            day.day, day.condition, p.muted, day.low, p.reset, day.high
        );
    }

    let _ = writeln!(out, "\n{}", map_status(map, p));
    out
}

pub fn map_status(map: &MapView, p: &Palette) -> String {
    let pan = map.pan();
    format!(
        "{}Map{}  {} · zoom {:.1}x · centre {:.1}%, {:.1}%",
        p.bold,
        p.reset,
        map.overlay().active(),
        map.zoom(),
        pan.x,
        pan.y
    )
}

pub fn transition(t: &Transition) -> String {
    format!(
        "Fading to {} (layer {} -> {}, {} ms)",
        t.to,
        t.from_layer,
        t.to_layer,
        t.duration.as_millis()
    )
}

/// Plot of up to ten hourly temperatures with one x-axis label per point.
pub fn ascii_chart(hourly: &[HourlyForecast], p: &Palette) -> String {
    let geometry = ChartGeometry::plain((CHART_WIDTH - 1) as f64, (CHART_HEIGHT - 1) as f64);
    let chart = HourlyChart::new(hourly, geometry);
    if chart.is_empty() {
        return format!("  {}No hourly data.{}\n", p.muted, p.reset);
    }

    let row = |y: f64| (y.round().max(0.0) as usize).min(CHART_HEIGHT - 1);
    let col = |x: f64| (x.round().max(0.0) as usize).min(CHART_WIDTH - 1);

    let mut grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
    for pair in chart.points().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (x0, x1) = (col(a.x), col(b.x));
        for c in x0..=x1 {
            let t = if x1 == x0 {
                0.0
            } else {
                (c - x0) as f64 / (x1 - x0) as f64
            };
            grid[row(a.y + (b.y - a.y) * t)][c] = '·';
        }
    }
    for point in chart.points() {
        grid[row(point.y)][col(point.x)] = '●';
    }

    let (lo, hi) = chart.temp_range();
    let mut out = String::new();
    for (i, cells) in grid.iter().enumerate() {
        let axis = match i {
            0 => format!("{hi:>5.1}°"),
            _ if i == CHART_HEIGHT - 1 => format!("{lo:>5.1}°"),
            _ => " ".repeat(6),
        };
        let line: String = cells.iter().collect();
        let _ = writeln!(
            out,
            "{}{axis}{} │{}{}{}",
            p.muted,
            p.reset,
            p.accent,
            line.trim_end(),
            p.reset
        );
    }

    let _ = writeln!(out, "        {}", axis_labels(&chart));
    out
}

/// Labels centred under their points, shifted right where they would
/// otherwise overlap.
fn axis_labels(chart: &HourlyChart) -> String {
    let mut row: Vec<char> = Vec::new();
    let mut next_free = 0;

    for point in chart.points() {
        let label: Vec<char> = point.time.chars().collect();
        let centred = (point.x.round() as usize).saturating_sub(label.len() / 2);
        let start = centred.max(next_free);
        if row.len() < start {
            row.resize(start, ' ');
        }
        row.extend(&label);
        next_free = row.len() + 1;
    }
    row.into_iter().collect::<String>()
}

/// Tooltip text for the point nearest to `x` in chart coordinates.
pub fn hover(chart: &HourlyChart, x: f64) -> Option<String> {
    let point = &chart.points()[chart.nearest(x)?];
    Some(format!("{}  {}°C", point.time, point.temp))
}

pub fn svg_chart(chart: &HourlyChart) -> String {
    let g = chart.geometry();
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = g.width,
        h = g.height
    );
    svg.push_str(
        "  <defs>\n    <linearGradient id=\"area\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\n      \
         <stop offset=\"0%\" stop-color=\"#38bdf8\" stop-opacity=\"0.4\"/>\n      \
         <stop offset=\"100%\" stop-color=\"#38bdf8\" stop-opacity=\"0\"/>\n    \
         </linearGradient>\n  </defs>\n",
    );
    let _ = writeln!(svg, r#"  <path d="{}" fill="url(#area)"/>"#, chart.area_path());
    let _ = writeln!(
        svg,
        r##"  <path d="{}" fill="none" stroke="#38bdf8" stroke-width="2"/>"##,
        chart.line_path()
    );
    for point in chart.points() {
        let _ = writeln!(
            svg,
            r##"  <circle cx="{}" cy="{}" r="2.5" fill="#38bdf8"/>"##,
            point.x, point.y
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" font-size="8" text-anchor="middle">{}</text>"#,
            point.x,
            g.height - 5.0,
            escape_xml(&point.time)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Colour JSON text token by token.
pub fn json(text: &str, p: &Palette) -> String {
    let mut out = String::with_capacity(text.len());
    for token in inspector::highlight(text) {
        let colour = p.token(token.class);
        if colour.is_empty() {
            out.push_str(token.text);
        } else {
            let _ = write!(out, "{colour}{}{}", token.text, p.reset);
        }
    }
    out
}

pub fn alerts(alerts: &[WeatherAlert], p: &Palette) -> String {
    if alerts.is_empty() {
        return "No active alerts\n".to_string();
    }

    let mut out = String::new();
    for alert in alerts {
        let _ = writeln!(
            out,
            "{}[{}]{} {}{}{} ({})",
            p.error, alert.severity, p.reset, p.bold, alert.title, p.reset, alert.source
        );
        let _ = writeln!(out, "    {}", alert.description);
    }
    out
}

pub fn error_dialog(dialog: &ErrorDialog, p: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}╭ {}{}", p.error, dialog.title, p.reset);
    let _ = writeln!(out, "│ {}", dialog.message);
    let _ = writeln!(out, "│");
    let _ = writeln!(out, "│ {}", dialog.heading);
    for tip in dialog.suggestions {
        let _ = writeln!(out, "│   • {tip}");
    }
    if dialog.detail != dialog.message {
        let _ = writeln!(out, "│");
        let _ = writeln!(out, "│ {}Details: {}{}", p.muted, dialog.detail, p.reset);
    }
    let _ = writeln!(out, "╰ [{}]", dialog.retry_label);
    out
}
