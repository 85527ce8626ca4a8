use chrono::{Duration, Months, NaiveDate};
use serde::Deserialize;
use std::fmt;

/// Spacing between two scenes of a batch run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStep {
    #[default]
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl TimeStep {
    /// Next date in the series. Monthly steps clamp to the end of shorter
    /// months (Jan 31 -> Feb 28).
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeStep::Daily => date.checked_add_signed(Duration::days(1)),
            TimeStep::Weekly => date.checked_add_signed(Duration::weeks(1)),
            TimeStep::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeStep::Daily => write!(f, "daily"),
            TimeStep::Weekly => write!(f, "weekly"),
            TimeStep::Monthly => write!(f, "monthly"),
        }
    }
}
