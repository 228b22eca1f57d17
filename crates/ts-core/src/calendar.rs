//! Calendar quarters and the policy dates that partition them.
//!
//! The policy era of an observation is a function of its quarter and the
//! [`EraBoundary`]; it is never read from input data.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::PolicyEra;
use crate::{Error, Result};

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid calendar literal"),
    }
}

/// Section 232 steel tariffs took effect.
pub const TARIFF_IMPLEMENTED: NaiveDate = ymd(2018, 3, 23);

/// Change of administration; start of the `biden_era` policy period.
pub const ADMINISTRATION_CHANGE: NaiveDate = ymd(2021, 1, 20);

/// A calendar quarter (`2019Q3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quarter {
    year: i32,
    qtr: u8,
    start: NaiveDate,
    end: NaiveDate,
}

impl Quarter {
    /// Create a quarter; `qtr` must be in `1..=4`.
    pub fn new(year: i32, qtr: u8) -> Result<Self> {
        if !(1..=4).contains(&qtr) {
            return Err(Error::Validation(format!("quarter must be 1..=4, got {qtr}")));
        }
        let month = 3 * (qtr as u32 - 1) + 1;
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::Validation(format!("year {year} out of range")))?;
        let next = if qtr == 4 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 3, 1)
        };
        let end = next
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| Error::Validation(format!("year {year} out of range")))?;
        Ok(Self { year, qtr, start, end })
    }

    /// Quarter containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), (date.month0() / 3 + 1) as u8)
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Quarter number (1–4).
    pub fn qtr(&self) -> u8 {
        self.qtr
    }

    /// First day of the quarter; the period timestamp used for plotting.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the quarter.
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.qtr)
    }
}

impl FromStr for Quarter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, qtr) = s
            .trim()
            .split_once(['Q', 'q'])
            .ok_or_else(|| Error::Validation(format!("expected quarter like 2019Q3, got `{s}`")))?;
        let year: i32 =
            year.parse().map_err(|_| Error::Validation(format!("invalid year in `{s}`")))?;
        let qtr: u8 =
            qtr.parse().map_err(|_| Error::Validation(format!("invalid quarter in `{s}`")))?;
        Self::new(year, qtr)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quarter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Date splitting `pre` from `biden_era`.
///
/// A quarter belongs to the later era when its last day falls on or after the
/// boundary, so the quarter containing the boundary date is already post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraBoundary {
    /// First day of the later era.
    pub date: NaiveDate,
}

impl Default for EraBoundary {
    fn default() -> Self {
        Self { date: ADMINISTRATION_CHANGE }
    }
}

impl EraBoundary {
    /// Boundary at `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Policy era of a quarter.
    pub fn era_of(&self, quarter: &Quarter) -> PolicyEra {
        if quarter.end_date() >= self.date { PolicyEra::BidenEra } else { PolicyEra::Pre }
    }
}

/// Literal policy dates used for era derivation and plot annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDates {
    /// Tariff implementation date.
    pub tariff_implemented: NaiveDate,
    /// Administration change date (era boundary).
    pub administration_change: NaiveDate,
}

impl Default for PolicyDates {
    fn default() -> Self {
        Self { tariff_implemented: TARIFF_IMPLEMENTED, administration_change: ADMINISTRATION_CHANGE }
    }
}

impl PolicyDates {
    /// Era boundary implied by the administration change.
    pub fn era_boundary(&self) -> EraBoundary {
        EraBoundary::new(self.administration_change)
    }
}
