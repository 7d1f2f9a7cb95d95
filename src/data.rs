use chrono::{Datelike, Duration, NaiveDate};
use rand::prelude::*;
use serde::Serialize;

/// Record count advertised by the preview panel. Cosmetic, like everything
/// else in this module.
pub const TOTAL_RECORDS: usize = 1_247;

#[derive(Clone, Debug, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// Abbreviated volume in the "25.2M" form used by the preview table.
    pub fn volume_label(&self) -> String {
        let millions = self.volume as f64 / 1_000_000.0;
        format!("{:.1}M", millions)
    }
}

fn candle(day: u32, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Candle {
    let date = NaiveDate::from_ymd_opt(2024, 1, day).expect("valid literal date");
    Candle { date, open, high, low, close, volume }
}

/// The five hard-coded rows shown by the Data Preview table.
pub fn sample_rows() -> Vec<Candle> {
    vec![
        candle(1, 248.42, 251.83, 247.11, 250.08, 25_200_000),
        candle(2, 250.08, 253.45, 249.85, 252.17, 27_800_000),
        candle(3, 252.17, 254.92, 251.33, 253.18, 24_100_000),
        candle(4, 253.18, 255.67, 252.44, 254.25, 26_500_000),
        candle(5, 254.25, 256.89, 253.12, 255.73, 28_900_000),
    ]
}

/// Fixed seed so every launch draws the same illustrative charts.
const MOCK_SEED: u64 = 20_240_101;

/// Simulated daily history backing the chart panels. A seeded random walk
/// shaped to look like a year of TSLA closes; never sourced from anywhere.
pub fn mock_history(days: usize) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(MOCK_SEED);
    let mut history = Vec::with_capacity(days);

    let mut date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut close = 215.0_f64;

    while history.len() < days {
        // Trading days only.
        if matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
            date += Duration::days(1);
            continue;
        }

        let drift = 0.0006;
        let shock = rng.gen_range(-0.028..0.028);
        let open = close;
        close = (close * (1.0 + drift + shock)).max(5.0);

        let hi_pad = rng.gen_range(0.001..0.015);
        let lo_pad = rng.gen_range(0.001..0.015);
        let high = open.max(close) * (1.0 + hi_pad);
        let low = open.min(close) * (1.0 - lo_pad);
        let volume = rng.gen_range(18_000_000..42_000_000);

        history.push(Candle { date, open, high, low, close, volume });
        date += Duration::days(1);
    }

    history
}

/// Simple moving average; positions without a full window are skipped, so
/// the overlay starts `window - 1` points into the series.
pub fn moving_average(closes: &[f64], window: usize) -> Vec<(f64, f64)> {
    if window == 0 || closes.len() < window {
        return Vec::new();
    }
    closes
        .windows(window)
        .enumerate()
        .map(|(i, w)| {
            let mean = w.iter().sum::<f64>() / window as f64;
            ((i + window - 1) as f64, mean)
        })
        .collect()
}

/// "Predicted" closes for the actual-vs-predicted panel: the actual series
/// lagged one day and damped toward its running mean. Pure illustration.
pub fn predicted_closes(closes: &[f64]) -> Vec<f64> {
    let mut running_sum = 0.0;
    closes
        .iter()
        .enumerate()
        .map(|(i, &actual)| {
            running_sum += actual;
            let running_mean = running_sum / (i + 1) as f64;
            let lagged = if i == 0 { actual } else { closes[i - 1] };
            0.82 * lagged + 0.18 * running_mean
        })
        .collect()
}

/// Up-vs-down day split for the sentiment panel.
pub fn sentiment_split(history: &[Candle]) -> (usize, usize) {
    let mut up = 0;
    let mut down = 0;
    for pair in history.windows(2) {
        if pair[1].close >= pair[0].close {
            up += 1;
        } else {
            down += 1;
        }
    }
    (up, down)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

pub struct Metric {
    pub title: &'static str,
    pub value: &'static str,
    pub trend: Trend,
    pub description: &'static str,
}

/// The three model-performance cards. Values are fixed; no model ever runs.
pub fn metric_cards() -> [Metric; 3] {
    [
        Metric {
            title: "Mean Squared Error",
            value: "0.0043",
            trend: Trend::Down,
            description: "Lower is better",
        },
        Metric {
            title: "Root Mean Squared Error",
            value: "0.0656",
            trend: Trend::Down,
            description: "Model accuracy",
        },
        Metric {
            title: "R² Score",
            value: "0.9234",
            trend: Trend::Up,
            description: "Variance explained",
        },
    ]
}

/// Hard-coded model metrics included in the export summary.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ModelMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

pub const MODEL_METRICS: ModelMetrics = ModelMetrics {
    mse: 0.0043,
    rmse: 0.0656,
    r2: 0.9234,
};

pub struct Recommendation {
    pub signal: &'static str,
    pub price: f64,
    pub confidence_pct: u8,
    pub target_price: f64,
    pub stop_loss: f64,
    pub direction_pct: f64,
    pub basis: &'static str,
}

/// The static trading-recommendation panel contents.
pub fn recommendation() -> Recommendation {
    Recommendation {
        signal: "BUY",
        price: 267.50,
        confidence_pct: 84,
        target_price: 275.20,
        stop_loss: 258.90,
        direction_pct: 2.9,
        basis: "Random Forest",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rows_are_the_documented_literals() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].date.to_string(), "2024-01-01");
        assert_eq!(rows[0].close, 250.08);
        assert_eq!(rows[4].close, 255.73);
        assert_eq!(rows[0].volume_label(), "25.2M");
        assert_eq!(rows[4].volume_label(), "28.9M");
    }

    #[test]
    fn test_mock_history_is_deterministic_and_sane() {
        let a = mock_history(120);
        let b = mock_history(120);
        assert_eq!(a, b, "seeded history must be identical across calls");
        assert_eq!(a.len(), 120);

        for pair in a.windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
        for c in &a {
            assert!(c.low > 0.0);
            assert!(c.high >= c.low);
            assert!(c.high >= c.close && c.low <= c.close);
            assert!(c.high >= c.open && c.low <= c.open);
            assert!(!matches!(
                c.date.weekday(),
                chrono::Weekday::Sat | chrono::Weekday::Sun
            ));
        }
    }

    #[test]
    fn test_moving_average_window_alignment() {
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ma = moving_average(&closes, 3);
        assert_eq!(ma.len(), 3);
        assert_eq!(ma[0], (2.0, 2.0));
        assert_eq!(ma[2], (4.0, 4.0));

        assert!(moving_average(&closes, 0).is_empty());
        assert!(moving_average(&closes, 6).is_empty());
    }

    #[test]
    fn test_predicted_closes_matches_input_length() {
        let closes: Vec<f64> = mock_history(60).iter().map(|c| c.close).collect();
        let predicted = predicted_closes(&closes);
        assert_eq!(predicted.len(), closes.len());
        assert!(predicted.iter().all(|p| p.is_finite() && *p > 0.0));
    }

    #[test]
    fn test_sentiment_split_covers_every_transition() {
        let history = mock_history(90);
        let (up, down) = sentiment_split(&history);
        assert_eq!(up + down, history.len() - 1);
    }
}
