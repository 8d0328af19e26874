use chrono::{DateTime, TimeZone};

pub const SECONDS_PER_DAY: f64 = 86400.0;
pub const UNIT_SUFFIX: &str = " 天";

/// Whole seconds from `now` until `target`, clamped at zero once the target has passed.
pub fn seconds_left<Tz: TimeZone>(now: &DateTime<Tz>, target: &DateTime<Tz>) -> i64 {
    target.clone().signed_duration_since(now.clone()).num_seconds().max(0)
}

pub fn days_left(seconds_left: i64) -> f64 {
    (seconds_left.max(0) as f64 / SECONDS_PER_DAY).max(0.0)
}

/// Remaining days formatted to six decimals and split at the decimal point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaysText {
    /// Digits before the decimal point.
    pub integer: String,
    /// The decimal point and the six digits after it.
    pub decimal: String,
}

impl DaysText {
    pub fn new(days_left: f64) -> Self {
        let formatted = format!("{days_left:.6}");
        let (integer, decimal) = match formatted.find('.') {
            Some(idx) => formatted.split_at(idx),
            None => (formatted.as_str(), ""),
        };
        Self {
            integer: integer.to_owned(),
            decimal: decimal.to_owned(),
        }
    }

    pub fn between<Tz: TimeZone>(now: &DateTime<Tz>, target: &DateTime<Tz>) -> Self {
        Self::new(days_left(seconds_left(now, target)))
    }

    /// Everything the label shows, as plain text. Used for width measurement.
    pub fn plain(&self) -> String {
        format!("{}{}{UNIT_SUFFIX}", self.integer, self.decimal)
    }
}
