// In app/src/report.rs

use std::fmt::Write;

use engine::{IndicatorRow, Snapshot};

/// Renders one pass for the terminal: warning (if any), signal banner,
/// latest bar summary and the indicator table.
pub fn render(snapshot: &Snapshot, rows: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n--- {} | {} | last {} ---",
        snapshot.symbol, snapshot.interval, snapshot.lookback
    );

    if let Some(warning) = &snapshot.warning {
        let _ = writeln!(out, "Warning: {warning}");
    }
    let _ = writeln!(out, "Current signal: {}", snapshot.signal);

    let Some(latest) = snapshot.series.latest() else {
        return out;
    };

    let bar = &latest.bar;
    let _ = writeln!(
        out,
        "Latest bar {}: O {:.2}  H {:.2}  L {:.2}  C {:.2}  V {:.0}",
        bar.timestamp.format("%Y-%m-%d %H:%M"),
        bar.open,
        bar.high,
        bar.low,
        bar.close,
        bar.volume
    );

    let _ = writeln!(
        out,
        "\n{:<17} {:>12} {:>12} {:>12} {:>8} {:>10}",
        "Time", "Close", "SMA 50", "SMA 200", "RSI", "MACD"
    );
    for row in snapshot.table_tail(rows) {
        let _ = writeln!(out, "{}", table_line(&row));
    }
    out
}

fn table_line(row: &IndicatorRow) -> String {
    format!(
        "{:<17} {:>12.2} {:>12} {:>12} {:>8} {:>10}",
        row.timestamp.format("%Y-%m-%d %H:%M"),
        row.close,
        cell(row.sma_50),
        cell(row.sma_200),
        cell(row.rsi),
        cell(row.macd),
    )
}

/// Missing values render as a dash.
fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::{AugmentedBar, AugmentedSeries, Bar, Interval, Signal, Symbol};

    fn snapshot(bars: Vec<AugmentedBar>, signal: Signal, warning: Option<&str>) -> Snapshot {
        Snapshot {
            symbol: Symbol("ETH-USD".into()),
            interval: Interval::OneHour,
            lookback: Interval::OneHour.lookback(),
            signal,
            series: AugmentedSeries::new(bars),
            warning: warning.map(str::to_string),
        }
    }

    fn bar(i: i64, close: f64) -> AugmentedBar {
        AugmentedBar::new(Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::hours(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 42.0,
        })
    }

    #[test]
    fn empty_pass_prints_warning_and_no_table() {
        let text = render(&snapshot(Vec::new(), Signal::NoData, Some("No data available.")), 10);

        assert!(text.contains("ETH-USD | 1h | last 60d"));
        assert!(text.contains("Warning: No data available."));
        assert!(text.contains("Current signal: NO DATA"));
        assert!(!text.contains("Latest bar"));
    }

    #[test]
    fn table_is_limited_to_requested_rows() {
        let mut bars: Vec<AugmentedBar> = (0..5).map(|i| bar(i, 100.0 + i as f64)).collect();
        bars[4].rsi = Some(55.5);

        let text = render(&snapshot(bars, Signal::Hold, None), 3);

        assert!(text.contains("Current signal: HOLD"));
        assert!(text.contains("Latest bar 2024-03-01 04:00"));
        assert!(!text.contains("Warning"));
        let table_lines = text.lines().filter(|l| l.starts_with("2024-")).count();
        assert_eq!(table_lines, 3);
        assert!(text.contains("55.50"));
        assert!(!text.contains("2024-03-01 01:00 "));
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(cell(None), "-");
        assert_eq!(cell(Some(1.234)), "1.23");
    }
}
