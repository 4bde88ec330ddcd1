//! Price-chart cell.
//!
//! Window statistics are computed over the series snapshot and the cell is
//! painted as a standalone SVG document: area fills above/below the
//! window-start price, a one-pixel-per-sample polyline, a left-pointing
//! arrow at the current price, and the numeric overlays (percent change,
//! high/low, centered current price + absolute change).

use std::fmt::Write as _;

use mosaic_core::PriceSample;

/// Monero logo, drawn in the cell corner.
const MONERO_LOGO_PATHS: &str = concat!(
    r##"<path d="M4128,2249.81C4128,3287,3287.26,4127.86,2250,4127.86S372,3287,372,2249.81,1212.76,371.75,2250,371.75,4128,1212.54,4128,2249.81Z" transform="translate(-371.96 -371.75)" fill="#fff"/>"##,
    r##"<path d="M2250,371.75c-1036.89,0-1879.12,842.06-1877.8,1878,0.26,207.26,33.31,406.63,95.34,593.12h561.88V1263L2250,2483.57,3470.52,1263v1579.9h562c62.12-186.48,95-385.85,95.37-593.12C4129.66,1212.76,3287,372,2250,372Z" transform="translate(-371.96 -371.75)" fill="#f26822"/>"##,
    r##"<path d="M1969.3,2764.17l-532.67-532.7v994.14H1029.38l-384.29.07c329.63,540.8,925.35,902.56,1604.91,902.56S3525.31,3766.4,3855,3225.6H3063.25V2231.47l-532.7,532.7-280.61,280.61-280.62-280.61h0Z" transform="translate(-371.96 -371.75)" fill="#4d4d4d"/>"##,
);

/// Statistics over the visible window of the price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStats {
    pub start: f64,
    pub current: f64,
    pub low: f64,
    pub high: f64,
}

impl ChartStats {
    /// `None` for an empty window.
    pub fn from_window(samples: &[PriceSample]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        let mut low = first.close;
        let mut high = first.close;
        for s in samples {
            low = low.min(s.close);
            high = high.max(s.close);
        }
        Some(Self { start: first.close, current: last.close, low, high })
    }

    /// The window has no price variation at all.
    pub fn is_flat(&self) -> bool {
        self.high <= self.low
    }

    pub fn change_pct(&self) -> f64 {
        (self.current - self.start) / self.start * 100.0
    }

    pub fn change_abs(&self) -> f64 {
        self.current - self.start
    }
}

/// Direction of the current price relative to the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(current: f64, start: f64) -> Self {
        if current > start {
            Self::Up
        } else if current < start {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Up => "#00b300",
            Self::Down => "#b30000",
            Self::Flat => "#000000",
        }
    }

    pub fn sign(self) -> char {
        match self {
            Self::Up => '+',
            Self::Down => '-',
            Self::Flat => ' ',
        }
    }
}

/// Paint the chart cell. `cap` is the series capacity, which fixes the chart
/// width so a filling series grows rightward instead of rescaling.
pub fn chart_cell_svg(samples: &[PriceSample], cap: usize, label: &str, w: u32, h: u32) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#);
    let _ = write!(svg, r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##);
    let _ = write!(
        svg,
        r#"<svg x="3" y="3" width="40" height="40" viewBox="0 0 3756.09 3756.49">{MONERO_LOGO_PATHS}</svg>"#
    );
    let _ = write!(svg, r##"<text x="46" y="16" font-size="13" fill="#000000">{label}</text>"##);

    if let Some(stats) = ChartStats::from_window(samples) {
        let chart_x = 1.0;
        let chart_y = 50.0;
        let chart_height = h as f64 / 2.0;
        let chart_width = cap as f64;
        let flat = stats.is_flat();

        // A flat window still plots at mid-height; only fills and the
        // percent/high/low overlays need real variation.
        let fit = |price: f64| -> f64 {
            if flat {
                return chart_height * 0.5;
            }
            let norm = (price - stats.low) / (stats.high - stats.low);
            chart_height - norm * chart_height
        };

        if !flat {
            let split = fit(stats.start);
            let _ = write!(
                svg,
                r##"<rect x="{chart_x}" y="{chart_y}" width="{chart_width}" height="{split:.2}" fill="#00ff80" fill-opacity="0.2"/>"##
            );
            let _ = write!(
                svg,
                r##"<rect x="{chart_x}" y="{:.2}" width="{chart_width}" height="{:.2}" fill="#ff0000" fill-opacity="0.2"/>"##,
                chart_y + split,
                chart_height - split,
            );

            let trend = Trend::of(stats.current, stats.start);
            let _ = write!(
                svg,
                r#"<text x="50" y="43" font-size="22" fill="{}">{}{:.2}%</text>"#,
                trend.color(),
                trend.sign(),
                stats.change_pct().abs(),
            );
            let _ = write!(
                svg,
                r##"<text x="{}" y="50" font-size="9" fill="#000000">{:.2}</text>"##,
                chart_width + 6.0,
                stats.high,
            );
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" font-size="9" fill="#000000">{:.2}</text>"##,
                chart_width + 6.0,
                h - 24,
                stats.low,
            );
        }

        let mut points = String::with_capacity(samples.len() * 12);
        for (i, sample) in samples.iter().enumerate() {
            let _ = write!(points, "{},{:.2} ", chart_x + i as f64, chart_y + fit(sample.close));
        }
        let _ = write!(
            svg,
            r##"<polyline points="{}" fill="none" stroke="#0000ff" stroke-width="1"/>"##,
            points.trim_end(),
        );

        // Left-pointing arrow just right of the newest sample.
        let arrow_x = chart_x + samples.len() as f64 + 1.0;
        let arrow_y = chart_y + fit(stats.current);
        let _ = write!(
            svg,
            r##"<polygon points="{arrow_x:.2},{arrow_y:.2} {:.2},{:.2} {:.2},{:.2}" fill="#ffffff" stroke="#000000" stroke-width="1"/>"##,
            arrow_x + 16.0,
            arrow_y - 5.0,
            arrow_x + 16.0,
            arrow_y + 5.0,
        );

        let trend = Trend::of(stats.current, stats.start);
        let _ = write!(
            svg,
            concat!(
                r#"<text x="{}" y="{}" font-size="17" text-anchor="middle">"#,
                r##"<tspan fill="#000000">{:.2}</tspan>"##,
                r#"<tspan dx="5" fill="{}">{}{:.2}</tspan>"#,
                r#"</text>"#
            ),
            w / 2,
            h - 5,
            stats.current,
            trend.color(),
            trend.sign(),
            stats.change_abs().abs(),
        );
    }

    let _ = write!(
        svg,
        r##"<rect x="0.5" y="0.5" width="{}" height="{}" fill="none" stroke="#808080" stroke-width="1"/>"##,
        w - 1,
        h - 1,
    );
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> Vec<PriceSample> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceSample::new(i as i64 * 600_000, c))
            .collect()
    }

    #[test]
    fn stats_over_window() {
        let s = series(&[100.0, 140.0, 90.0, 120.0]);
        let stats = ChartStats::from_window(&s).unwrap();
        assert_eq!(stats.start, 100.0);
        assert_eq!(stats.current, 120.0);
        assert_eq!(stats.low, 90.0);
        assert_eq!(stats.high, 140.0);
        assert!(!stats.is_flat());
        assert!((stats.change_pct() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn stats_empty_window_is_none() {
        assert!(ChartStats::from_window(&[]).is_none());
    }

    #[test]
    fn trend_is_three_way() {
        assert_eq!(Trend::of(2.0, 1.0), Trend::Up);
        assert_eq!(Trend::of(1.0, 2.0), Trend::Down);
        assert_eq!(Trend::of(1.0, 1.0), Trend::Flat);
        assert_eq!(Trend::of(2.0, 1.0).sign(), '+');
        assert_eq!(Trend::of(1.0, 2.0).color(), "#b30000");
    }

    #[test]
    fn varied_series_paints_fills_and_percent() {
        let svg = chart_cell_svg(&series(&[100.0, 110.0, 105.0]), 144, "XMR/USDT", 187, 154);
        assert!(svg.contains(r##"fill="#00ff80" fill-opacity="0.2""##));
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.2""##));
        assert!(svg.contains('%'));
        assert!(svg.contains("polyline"));
        assert!(svg.contains("polygon"));
    }

    #[test]
    fn flat_series_keeps_polyline_drops_overlays() {
        let svg = chart_cell_svg(&series(&[100.0, 100.0, 100.0]), 144, "XMR/USDT", 187, 154);
        assert!(!svg.contains('%'));
        assert!(!svg.contains("fill-opacity"));
        // Base polyline at mid-height (chart y 50 + 154/2 * 0.5 = 88.5).
        assert!(svg.contains("polyline"));
        assert!(svg.contains("88.50"));
    }

    #[test]
    fn empty_series_still_draws_logo_and_frame() {
        let svg = chart_cell_svg(&[], 144, "XMR/USDT", 187, 154);
        assert!(svg.contains("XMR/USDT"));
        assert!(svg.contains("#808080"));
        assert!(!svg.contains("polyline"));
    }
}
