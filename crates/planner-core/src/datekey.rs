use std::fmt;
use std::str::FromStr;

use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  TimeZone
};
use serde::{
  Deserialize,
  Serialize
};

use crate::error::{
  PlannerError,
  PlannerResult
};

const MIN_KEY_YEAR: i32 = 0;
const MAX_KEY_YEAR: i32 = 9999;

/// Canonical `YYYY-MM-DD` form of a
/// calendar date.
///
/// This is the only join criterion
/// between grid cells and tasks. Keys
/// sort lexicographically in calendar
/// order because the year is always four
/// digits.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(
  try_from = "String",
  into = "String"
)]
pub struct DateKey {
  text: String,
  date: NaiveDate
}

impl DateKey {
  pub fn from_date(
    date: NaiveDate
  ) -> PlannerResult<Self> {
    let year = date.year();
    if !(MIN_KEY_YEAR..=MAX_KEY_YEAR)
      .contains(&year)
    {
      return Err(
        PlannerError::out_of_range(
          format!(
            "year {year} has no \
             four-digit date key"
          )
        )
      );
    }

    Ok(Self {
      text: format!(
        "{:04}-{:02}-{:02}",
        year,
        date.month(),
        date.day()
      ),
      date
    })
  }

  /// Key of the wall-clock date carried
  /// by `value` in its own zone.
  pub fn from_datetime<Tz: TimeZone>(
    value: &DateTime<Tz>
  ) -> PlannerResult<Self> {
    Self::from_date(value.date_naive())
  }

  /// Parses an already canonical key.
  /// Anything but zero-padded
  /// `YYYY-MM-DD` naming a real date is
  /// rejected.
  pub fn parse(
    raw: &str
  ) -> PlannerResult<Self> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
      && bytes[4] == b'-'
      && bytes[7] == b'-'
      && bytes.iter().enumerate().all(
        |(idx, b)| {
          idx == 4
            || idx == 7
            || b.is_ascii_digit()
        }
      );
    if !shaped {
      return Err(PlannerError::invalid(
        format!(
          "expected YYYY-MM-DD, got \
           {raw:?}"
        )
      ));
    }

    let year = parse_digits(&raw[0..4])?;
    let month =
      parse_digits(&raw[5..7])?;
    let day = parse_digits(&raw[8..10])?;

    let date = NaiveDate::from_ymd_opt(
      year as i32,
      month,
      day
    )
    .ok_or_else(|| {
      PlannerError::invalid(format!(
        "{raw} is not a calendar date"
      ))
    })?;

    Self::from_date(date)
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }
}

fn parse_digits(
  raw: &str
) -> PlannerResult<u32> {
  raw.parse::<u32>().map_err(|err| {
    PlannerError::invalid(format!(
      "bad date component {raw:?}: \
       {err}"
    ))
  })
}

impl fmt::Display for DateKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.text)
  }
}

impl AsRef<str> for DateKey {
  fn as_ref(&self) -> &str {
    &self.text
  }
}

impl FromStr for DateKey {
  type Err = PlannerError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for DateKey {
  type Error = PlannerError;

  fn try_from(
    value: String
  ) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl TryFrom<NaiveDate> for DateKey {
  type Error = PlannerError;

  fn try_from(
    value: NaiveDate
  ) -> Result<Self, Self::Error> {
    Self::from_date(value)
  }
}

impl From<DateKey> for String {
  fn from(value: DateKey) -> Self {
    value.text
  }
}
