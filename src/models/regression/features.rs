//! Calendar, lag and rolling-window features for the regression model.

use chrono::{DateTime, Datelike, Utc};

/// Number of past values a feature row looks back over.
pub const WINDOW: usize = 12;

/// Lag offsets, in periods.
pub const LAGS: [usize; 5] = [1, 2, 3, 6, 12];

/// Column names of a feature row, in order.
pub const FEATURE_NAMES: [&str; 12] = [
    "year",
    "month",
    "quarter",
    "day_of_year",
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_6",
    "lag_12",
    "rolling_mean_3",
    "rolling_mean_6",
    "rolling_std_3",
];

pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

/// Fixed-size ring buffer of the most recent values.
///
/// Pushing into a full window evicts the oldest value.
#[derive(Debug, Clone, PartialEq)]
pub struct LagWindow {
    buf: [f64; WINDOW],
    /// Slot the next push writes to.
    head: usize,
    len: usize,
}

impl Default for LagWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl LagWindow {
    pub fn new() -> Self {
        Self {
            buf: [0.0; WINDOW],
            head: 0,
            len: 0,
        }
    }

    /// Window holding the trailing `WINDOW` values of `history`.
    pub fn from_history(history: &[f64]) -> Self {
        let mut window = Self::new();
        let start = history.len().saturating_sub(WINDOW);
        for &v in &history[start..] {
            window.push(v);
        }
        window
    }

    pub fn push(&mut self, value: f64) {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % WINDOW;
        self.len = (self.len + 1).min(WINDOW);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == WINDOW
    }

    /// Value `k` periods back (`k = 1` is the most recent).
    pub fn lag(&self, k: usize) -> Option<f64> {
        if k == 0 || k > self.len {
            return None;
        }
        Some(self.buf[(self.head + WINDOW - k) % WINDOW])
    }

    /// The `n` most recent values, newest first.
    fn recent(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        (1..=n.min(self.len)).filter_map(move |k| self.lag(k))
    }

    /// Values in chronological order.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.recent(self.len).collect();
        values.reverse();
        values
    }

    fn rolling_mean(&self, n: usize) -> f64 {
        let count = n.min(self.len);
        if count == 0 {
            return f64::NAN;
        }
        self.recent(n).sum::<f64>() / count as f64
    }

    /// Sample standard deviation (n-1) of the `n` most recent values.
    fn rolling_std(&self, n: usize) -> f64 {
        let count = n.min(self.len);
        if count < 2 {
            return f64::NAN;
        }
        let mean = self.rolling_mean(n);
        let ss: f64 = self.recent(n).map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    }
}

/// Feature row for the period dated `date`, given the values preceding it.
///
/// Returns `None` until the window is full.
pub fn feature_row(date: DateTime<Utc>, window: &LagWindow) -> Option<[f64; NUM_FEATURES]> {
    if !window.is_full() {
        return None;
    }
    let month = date.month();
    let mut row = [0.0; NUM_FEATURES];
    row[0] = date.year() as f64;
    row[1] = month as f64;
    row[2] = ((month - 1) / 3 + 1) as f64;
    row[3] = date.ordinal() as f64;
    for (slot, &k) in row[4..9].iter_mut().zip(LAGS.iter()) {
        *slot = window.lag(k)?;
    }
    row[9] = window.rolling_mean(3);
    row[10] = window.rolling_mean(6);
    row[11] = window.rolling_std(3);
    Some(row)
}

/// Training design: one row per observation with a complete window.
pub fn training_rows(dates: &[DateTime<Utc>], values: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut window = LagWindow::new();
    let mut rows = Vec::with_capacity(values.len().saturating_sub(WINDOW));
    let mut targets = Vec::with_capacity(rows.capacity());

    for (&date, &value) in dates.iter().zip(values.iter()) {
        if let Some(row) = feature_row(date, &window) {
            rows.push(row.to_vec());
            targets.push(value);
        }
        window.push(value);
    }
    (rows, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut window = LagWindow::new();
        for v in 1..=15 {
            window.push(v as f64);
        }
        assert!(window.is_full());
        assert_eq!(window.lag(1), Some(15.0));
        assert_eq!(window.lag(12), Some(4.0));
        assert_eq!(window.lag(13), None);
        assert_eq!(window.lag(0), None);
        assert_eq!(window.to_vec(), (4..=15).map(|v| v as f64).collect::<Vec<_>>());
    }

    #[test]
    fn from_history_keeps_tail() {
        let history: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let window = LagWindow::from_history(&history);
        assert_eq!(window.to_vec(), history[8..].to_vec());

        let short = LagWindow::from_history(&history[..5]);
        assert_eq!(short.len(), 5);
        assert!(!short.is_full());
    }

    #[test]
    fn feature_row_layout() {
        let window = LagWindow::from_history(&(1..=12).map(|v| v as f64).collect::<Vec<_>>());
        let date = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        let row = feature_row(date, &window).unwrap();

        assert_eq!(row[0], 2024.0);
        assert_eq!(row[1], 5.0);
        assert_eq!(row[2], 2.0);
        assert_eq!(row[3], 152.0); // leap year
        assert_eq!(&row[4..9], &[12.0, 11.0, 10.0, 7.0, 1.0]);
        assert_relative_eq!(row[9], 11.0, epsilon = 1e-12);
        assert_relative_eq!(row[10], 9.5, epsilon = 1e-12);
        assert_relative_eq!(row[11], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn feature_row_needs_full_window() {
        let window = LagWindow::from_history(&[1.0; 11]);
        let date = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert!(feature_row(date, &window).is_none());
    }

    #[test]
    fn training_rows_skip_incomplete_windows() {
        let dates: Vec<_> = (0..15)
            .map(|d| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(d))
            .collect();
        let values: Vec<f64> = (0..15).map(|v| v as f64).collect();

        let (rows, targets) = training_rows(&dates, &values);

        assert_eq!(rows.len(), 3);
        assert_eq!(targets, vec![12.0, 13.0, 14.0]);
        // lag_1 of the first training row is the value just before it
        assert_eq!(rows[0][4], 11.0);
        assert_eq!(rows[0][8], 0.0);
        assert_eq!(rows[0].len(), NUM_FEATURES);
    }
}
