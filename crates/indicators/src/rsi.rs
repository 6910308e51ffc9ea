// In crates/indicators/src/rsi.rs

/// Wilder's RSI over a close series.
///
/// Average gain and loss are seeded with the simple mean of the first
/// `period` close-to-close changes and then smoothed with
/// `avg = (prev * (period - 1) + current) / period`. The first defined value
/// is at index `period`; everything before it is `None`.
///
/// A window with no losses reads 100, except a window where nothing moved at
/// all, which reads 50 rather than 100.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return rsi;
    }

    let n = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let (gain, loss) = split_change(closes[i] - closes[i - 1]);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= n;
    avg_loss /= n;
    rsi[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in period + 1..closes.len() {
        let (gain, loss) = split_change(closes[i] - closes[i - 1]);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        rsi[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }
    rsi
}

fn split_change(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // No losses in the window: fully bullish, or neutral if nothing moved.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}
