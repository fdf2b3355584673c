//! Calendar cadence of a series and future-date generation.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::fmt;

/// Sampling cadence of a demand series.
///
/// Monthly and longer cadences step by calendar months from the last date. How
/// the day of month is chosen is a [`DayAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// Day-of-month rule for monthly and longer cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayAnchor {
    /// Keep the anchor's day, clamped in shorter months (Jan 30, Feb 29, Mar 30).
    #[default]
    SameDay,
    /// Land on the last day of every month (Jan 31, Feb 29, Mar 31).
    MonthEnd,
}

impl DayAnchor {
    /// `MonthEnd` when there are at least two dates and every one is the last day
    /// of its month.
    pub fn infer(timestamps: &[DateTime<Utc>]) -> DayAnchor {
        if timestamps.len() >= 2 && timestamps.iter().all(|t| is_month_end(t.date_naive())) {
            DayAnchor::MonthEnd
        } else {
            DayAnchor::SameDay
        }
    }
}

impl Frequency {
    /// Infer the cadence from the modal spacing between consecutive dates.
    ///
    /// Returns `None` when there are fewer than two dates or the modal spacing
    /// does not look like any supported cadence.
    pub fn infer(timestamps: &[DateTime<Utc>]) -> Option<Frequency> {
        if timestamps.len() < 2 {
            return None;
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_days()).or_insert(0) += 1;
        }

        // Ties resolve towards the shorter spacing so the result is deterministic.
        let (modal_days, _) = counts
            .into_iter()
            .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then(db.cmp(da)))?;

        match modal_days {
            1 => Some(Frequency::Daily),
            7 => Some(Frequency::Weekly),
            28..=31 => Some(Frequency::Monthly),
            89..=92 => Some(Frequency::Quarterly),
            365 | 366 => Some(Frequency::Yearly),
            _ => None,
        }
    }

    /// Infer the cadence, falling back to monthly.
    pub fn infer_or_default(timestamps: &[DateTime<Utc>]) -> Frequency {
        Self::infer(timestamps).unwrap_or_default()
    }

    /// Date `steps` periods after `anchor`, keeping its day of month.
    pub fn advance(&self, anchor: DateTime<Utc>, steps: u32) -> Result<DateTime<Utc>> {
        self.advance_anchored(anchor, steps, DayAnchor::SameDay)
    }

    /// Date `steps` periods after `anchor` under the given day-of-month rule.
    pub fn advance_anchored(
        &self,
        anchor: DateTime<Utc>,
        steps: u32,
        day: DayAnchor,
    ) -> Result<DateTime<Utc>> {
        let next = match self {
            Frequency::Daily => anchor.checked_add_signed(Duration::days(steps as i64)),
            Frequency::Weekly => anchor.checked_add_signed(Duration::weeks(steps as i64)),
            Frequency::Monthly => add_months(anchor, steps, day),
            Frequency::Quarterly => steps.checked_mul(3).and_then(|m| add_months(anchor, m, day)),
            Frequency::Yearly => steps.checked_mul(12).and_then(|m| add_months(anchor, m, day)),
        };
        next.ok_or_else(|| {
            ForecastError::Timestamp(format!(
                "cannot advance {} by {} {} periods",
                anchor, steps, self
            ))
        })
    }

    /// The `periods` consecutive dates strictly after `last`, same day of month.
    pub fn future_dates(&self, last: DateTime<Utc>, periods: usize) -> Result<Vec<DateTime<Utc>>> {
        self.future_dates_anchored(last, periods, DayAnchor::SameDay)
    }

    /// The `periods` consecutive dates strictly after `last` under `day`.
    ///
    /// Every date is stepped from `last` itself, so a clamped month does not
    /// shift the ones after it.
    pub fn future_dates_anchored(
        &self,
        last: DateTime<Utc>,
        periods: usize,
        day: DayAnchor,
    ) -> Result<Vec<DateTime<Utc>>> {
        (1..=periods)
            .map(|step| {
                let step = u32::try_from(step).map_err(|_| {
                    ForecastError::Configuration(format!("horizon {} is too large", periods))
                })?;
                self.advance_anchored(last, step, day)
            })
            .collect()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

fn add_months(anchor: DateTime<Utc>, months: u32, day: DayAnchor) -> Option<DateTime<Utc>> {
    let shifted = anchor.date_naive().checked_add_months(Months::new(months))?;
    let shifted = match day {
        DayAnchor::SameDay => shifted,
        DayAnchor::MonthEnd => last_day_of_month(shifted)?,
    };
    Some(Utc.from_utc_datetime(&shifted.and_time(anchor.time())))
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map(|next| next.month() != date.month()).unwrap_or(true)
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}
