//! Balance and pool cells.
//!
//! Both are painted as standalone SVG documents, like the chart cell. Absent
//! values skip their part of the cell rather than painting placeholders, so a
//! cell that has never received data shows only its background and frame.

use std::fmt::Write as _;

use mosaic_core::{AccountSnapshot, PoolStatus, WalletBalance};

use crate::chart::Trend;

fn open_cell(w: u32, h: u32) -> String {
    let mut svg = String::with_capacity(1024);
    let _ = write!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#);
    let _ = write!(svg, r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##);
    svg
}

fn close_cell(svg: &mut String, w: u32, h: u32) {
    let _ = write!(
        svg,
        r##"<rect x="0.5" y="0.5" width="{}" height="{}" fill="none" stroke="#808080" stroke-width="1"/>"##,
        w - 1,
        h - 1,
    );
    svg.push_str("</svg>");
}

/// Futures account cell: equity on top, unrealized PnL below. Either field
/// may be absent independently.
pub fn balance_cell_svg(account: AccountSnapshot, w: u32, h: u32) -> String {
    let mut svg = open_cell(w, h);

    if let Some(eq) = account.equity {
        let _ = write!(
            svg,
            r##"<text x="3" y="13" font-size="12" fill="#000000">Futures equity</text>"##
        );
        let _ = write!(
            svg,
            r##"<text x="{}" y="42" font-size="22" text-anchor="end" fill="#000000">{eq:.2} USD</text>"##,
            w - 4,
        );
    }
    if let Some(upl) = account.unrealized_pnl {
        let _ = write!(
            svg,
            r##"<text x="3" y="68" font-size="16" fill="#000000">Unrealized PnL</text>"##
        );
        let trend = Trend::of(upl, 0.0);
        let _ = write!(
            svg,
            r#"<text x="{}" y="100" font-size="28" text-anchor="end" fill="{}">{}{:.2} USD</text>"#,
            w - 4,
            trend.color(),
            trend.sign(),
            upl.abs(),
        );
    }

    close_cell(&mut svg, w, h);
    svg
}

/// One sparkline: one pixel per slot, scaled against the window maximum.
/// An all-zero window draws a flat line along the chart bottom.
fn sparkline(svg: &mut String, data: &[u64], x: f64, y: f64, height: f64, color: &str) {
    if data.is_empty() {
        return;
    }
    let max = data.iter().copied().max().unwrap_or(0);
    let mut points = String::with_capacity(data.len() * 10);
    for (i, &d) in data.iter().enumerate() {
        let fit = if max == 0 { height } else { height - d as f64 / max as f64 * height };
        let _ = write!(points, "{},{:.2} ", x + i as f64, y + fit);
    }
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1"/>"#,
        points.trim_end(),
    );
}

/// Mining-pool cell: three stacked sparklines (shares, uncles, payouts) and
/// the wallet balance in the bottom-right corner. A `+` suffix marks funds
/// still locked (total above unlocked).
pub fn pool_cell_svg(
    pool: Option<&PoolStatus>,
    wallet: Option<WalletBalance>,
    w: u32,
    h: u32,
) -> String {
    let mut svg = open_cell(w, h);

    if let Some(pool) = pool {
        let chart_height = h as f64 / 5.0;
        let mut cy = 3.0;
        sparkline(&mut svg, &pool.shares, 1.0, cy, chart_height, "#0000ff");
        cy += chart_height + 3.0;
        sparkline(&mut svg, &pool.uncles, 1.0, cy, chart_height, "#008080");
        cy += chart_height + 3.0;
        sparkline(&mut svg, &pool.payouts, 1.0, cy, chart_height, "#ff0000");
    }

    if let Some(wallet) = wallet {
        let pending = if wallet.total_xmr > wallet.unlocked_xmr { "+" } else { "" };
        let _ = write!(
            svg,
            r##"<text x="{}" y="{}" font-size="12" text-anchor="end" fill="#000000">{:.4}{pending} XMR</text>"##,
            w - 4,
            h - 3,
            wallet.unlocked_xmr,
        );
    }

    close_cell(&mut svg, w, h);
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_cell_skips_absent_fields() {
        let svg = balance_cell_svg(AccountSnapshot::default(), 187, 114);
        assert!(!svg.contains("Futures equity"));
        assert!(!svg.contains("Unrealized PnL"));
        assert!(svg.contains("#808080"));
    }

    #[test]
    fn balance_cell_colors_pnl_three_way() {
        let up = balance_cell_svg(
            AccountSnapshot { equity: Some(1234.5), unrealized_pnl: Some(12.3) },
            187,
            114,
        );
        assert!(up.contains("1234.50 USD"));
        assert!(up.contains("+12.30 USD"));
        assert!(up.contains("#00b300"));

        let down = balance_cell_svg(
            AccountSnapshot { equity: None, unrealized_pnl: Some(-12.3) },
            187,
            114,
        );
        assert!(down.contains("-12.30 USD"));
        assert!(down.contains("#b30000"));
        assert!(!down.contains("Futures equity"));
    }

    #[test]
    fn pool_cell_draws_three_sparklines() {
        let pool = PoolStatus {
            shares: vec![0, 1, 2, 3],
            uncles: vec![1, 1, 1, 1],
            payouts: vec![0, 0, 2, 0],
        };
        let svg = pool_cell_svg(Some(&pool), None, 122, 64);
        assert_eq!(svg.matches("polyline").count(), 3);
        assert!(svg.contains("#0000ff"));
        assert!(svg.contains("#008080"));
        assert!(svg.contains("#ff0000"));
        assert!(!svg.contains("XMR"));
    }

    #[test]
    fn pool_cell_marks_locked_funds() {
        let locked = pool_cell_svg(
            None,
            Some(WalletBalance { total_xmr: 2.0, unlocked_xmr: 1.2345 }),
            122,
            64,
        );
        assert!(locked.contains("1.2345+ XMR"));

        let unlocked = pool_cell_svg(
            None,
            Some(WalletBalance { total_xmr: 1.2345, unlocked_xmr: 1.2345 }),
            122,
            64,
        );
        assert!(unlocked.contains("1.2345 XMR"));
        assert!(!unlocked.contains('+'));
    }

    #[test]
    fn all_zero_sparkline_sits_on_the_baseline() {
        let pool = PoolStatus { shares: vec![0, 0, 0], uncles: vec![], payouts: vec![] };
        let svg = pool_cell_svg(Some(&pool), None, 122, 64);
        // height h/5 = 12.8 at y 3 puts the flat line at 15.8.
        assert!(svg.contains("15.80"));
    }
}
