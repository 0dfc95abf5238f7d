use std::fmt;

use chrono::{
  Datelike,
  Duration,
  Months,
  NaiveDate,
  Weekday
};
use regex::Regex;

use crate::error::{
  PlannerError,
  PlannerResult
};

const MONTH_REF_PATTERN: &str = r"^(?P<year>\d{4})-(?P<month>\d{2})(?:-(?P<day>\d{2}))?$";

/// A calendar month. Only year and
/// month of a reference date matter to
/// the grid, so this is what callers
/// navigate with.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct YearMonth {
  first: NaiveDate
}

impl YearMonth {
  pub fn new(
    year: i32,
    month: u32
  ) -> PlannerResult<Self> {
    if !(1..=12).contains(&month) {
      return Err(PlannerError::invalid(
        format!(
          "month must be 1-12, got \
           {month}"
        )
      ));
    }
    if !(1..=9999).contains(&year) {
      return Err(
        PlannerError::out_of_range(
          format!(
            "year {year} outside \
             1-9999"
          )
        )
      );
    }

    let first = NaiveDate::from_ymd_opt(
      year, month, 1
    )
    .ok_or_else(|| {
      PlannerError::out_of_range(
        format!(
          "{year}-{month:02} is not \
           representable"
        )
      )
    })?;
    Ok(Self { first })
  }

  /// The month containing `date`.
  pub fn of(
    date: NaiveDate
  ) -> PlannerResult<Self> {
    Self::new(date.year(), date.month())
  }

  /// Accepts `YYYY-MM` or a full
  /// `YYYY-MM-DD` reference date.
  pub fn parse(
    raw: &str
  ) -> PlannerResult<Self> {
    let month_re =
      Regex::new(MONTH_REF_PATTERN)
        .map_err(|err| {
          PlannerError::invalid(format!(
            "month pattern failed to \
             compile: {err}"
          ))
        })?;

    let caps = month_re
      .captures(raw.trim())
      .ok_or_else(|| {
        PlannerError::invalid(format!(
          "expected YYYY-MM or \
           YYYY-MM-DD, got {raw:?}"
        ))
      })?;

    let number = |name: &str| {
      caps
        .name(name)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .parse::<u32>()
        .map_err(|err| {
          PlannerError::invalid(
            format!(
              "bad {name} in {raw:?}: \
               {err}"
            )
          )
        })
    };

    let year = number("year")? as i32;
    let month = number("month")?;
    let parsed = Self::new(year, month)?;

    if caps.name("day").is_some() {
      let day = number("day")?;
      if day == 0
        || day > parsed.days_in_month()
      {
        return Err(PlannerError::invalid(
          format!(
            "{raw} is not a calendar \
             date"
          )
        ));
      }
    }

    Ok(parsed)
  }

  pub fn year(self) -> i32 {
    self.first.year()
  }

  pub fn month(self) -> u32 {
    self.first.month()
  }

  pub fn first_day(self) -> NaiveDate {
    self.first
  }

  /// Day 0 of the following month.
  pub fn last_day(
    self
  ) -> PlannerResult<NaiveDate> {
    self
      .first
      .checked_add_months(Months::new(1))
      .and_then(|next| next.pred_opt())
      .ok_or_else(|| {
        PlannerError::out_of_range(
          format!(
            "end of {self} is not \
             representable"
          )
        )
      })
  }

  pub fn days_in_month(self) -> u32 {
    match self.month() {
      | 1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
      | 4 | 6 | 9 | 11 => 30,
      | _ => {
        if is_leap_year(self.year()) {
          29
        } else {
          28
        }
      }
    }
  }

  pub fn contains(
    self,
    date: NaiveDate
  ) -> bool {
    date.year() == self.year()
      && date.month() == self.month()
  }

  /// Moves by `months`, rolling the
  /// year over in either direction.
  pub fn shift(
    self,
    months: i32
  ) -> PlannerResult<Self> {
    let index = i64::from(self.year())
      * 12
      + i64::from(self.month())
      - 1
      + i64::from(months);
    let year = index.div_euclid(12);
    let month =
      index.rem_euclid(12) as u32 + 1;
    let year =
      i32::try_from(year).map_err(|_| {
        PlannerError::out_of_range(
          format!(
            "shifting {self} by \
             {months} months overflows"
          )
        )
      })?;
    Self::new(year, month)
  }

  pub fn previous(
    self
  ) -> PlannerResult<Self> {
    self.shift(-1)
  }

  pub fn next(self) -> PlannerResult<Self> {
    self.shift(1)
  }
}

impl fmt::Display for YearMonth {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}",
      self.year(),
      self.month()
    )
  }
}

fn is_leap_year(year: i32) -> bool {
  (year % 4 == 0 && year % 100 != 0)
    || year % 400 == 0
}

/// First column of every grid week.
///
/// Indexed like `weekStartsOn`: 0 is
/// Sunday, 6 is Saturday.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub struct WeekStart(Weekday);

impl Default for WeekStart {
  fn default() -> Self {
    Self::SUNDAY
  }
}

impl WeekStart {
  pub const MONDAY: Self =
    Self(Weekday::Mon);
  pub const SUNDAY: Self =
    Self(Weekday::Sun);

  pub fn new(weekday: Weekday) -> Self {
    Self(weekday)
  }

  pub fn from_index(
    index: u8
  ) -> PlannerResult<Self> {
    let weekday = match index {
      | 0 => Weekday::Sun,
      | 1 => Weekday::Mon,
      | 2 => Weekday::Tue,
      | 3 => Weekday::Wed,
      | 4 => Weekday::Thu,
      | 5 => Weekday::Fri,
      | 6 => Weekday::Sat,
      | other => {
        return Err(PlannerError::invalid(
          format!(
            "week start must be 0-6, \
             got {other}"
          )
        ));
      }
    };
    Ok(Self(weekday))
  }

  /// Accepts an index (`0`-`6`) or a
  /// weekday name such as `monday` or
  /// `sun`.
  pub fn parse(
    raw: &str
  ) -> PlannerResult<Self> {
    let token =
      raw.trim().to_ascii_lowercase();
    if let Ok(index) = token.parse::<u8>()
    {
      return Self::from_index(index);
    }

    parse_weekday_name(&token)
      .map(Self)
      .ok_or_else(|| {
        PlannerError::invalid(format!(
          "unknown week start {raw:?}"
        ))
      })
  }

  pub fn index(self) -> u8 {
    self.0.num_days_from_sunday() as u8
  }

  pub fn weekday(self) -> Weekday {
    self.0
  }

  /// Weekdays in grid column order.
  pub fn days(self) -> [Weekday; 7] {
    let mut days = [self.0; 7];
    for slot in 1..7 {
      days[slot] = days[slot - 1].succ();
    }
    days
  }

  /// Column of `date` in a week that
  /// starts on this day.
  pub fn column_of(
    self,
    date: NaiveDate
  ) -> usize {
    let day_idx = date
      .weekday()
      .num_days_from_sunday()
      as i64;
    let start_idx = self
      .0
      .num_days_from_sunday()
      as i64;
    ((7 + day_idx - start_idx) % 7)
      as usize
  }

  pub fn start_of_week(
    self,
    day: NaiveDate
  ) -> PlannerResult<NaiveDate> {
    add_days(
      day,
      -(self.column_of(day) as i64)
    )
  }

  pub fn end_of_week(
    self,
    day: NaiveDate
  ) -> PlannerResult<NaiveDate> {
    add_days(
      day,
      6 - self.column_of(day) as i64
    )
  }
}

impl fmt::Display for WeekStart {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub(crate) fn add_days(
  date: NaiveDate,
  days: i64
) -> PlannerResult<NaiveDate> {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .ok_or_else(|| {
      PlannerError::out_of_range(
        format!(
          "{date} {days:+} days is not \
           representable"
        )
      )
    })
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    Weekday
  };

  use super::{
    WeekStart,
    YearMonth
  };
  use crate::error::PlannerError;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn last_day_handles_month_lengths() {
    let cases = [
      (2024, 2, 29),
      (2023, 2, 28),
      (1900, 2, 28),
      (2000, 2, 29),
      (2024, 4, 30),
      (2024, 12, 31)
    ];
    for (year, month, last) in cases {
      let ym = YearMonth::new(year, month)
        .expect("month");
      assert_eq!(
        ym.last_day().expect("last day"),
        date(year, month, last)
      );
      assert_eq!(ym.days_in_month(), last);
    }
  }

  #[test]
  fn parse_accepts_month_and_full_date() {
    let short = YearMonth::parse("2024-02")
      .expect("short form");
    let long =
      YearMonth::parse("2024-02-29")
        .expect("long form");
    assert_eq!(short, long);
    assert_eq!(short.to_string(), "2024-02");
  }

  #[test]
  fn parse_rejects_garbage() {
    for raw in [
      "2024-13",
      "2024-00",
      "2024-2",
      "Feb 2024",
      "2023-02-29",
      "2024-04-31"
    ] {
      let err = YearMonth::parse(raw)
        .expect_err("invalid month ref");
      assert!(
        matches!(
          err,
          PlannerError::InvalidInput(_)
        ),
        "{raw:?} -> {err:?}"
      );
    }
  }

  #[test]
  fn shift_rolls_years() {
    let jan = YearMonth::new(2024, 1)
      .expect("month");
    assert_eq!(
      jan.previous().expect("prev"),
      YearMonth::new(2023, 12)
        .expect("month")
    );
    assert_eq!(
      jan.shift(23).expect("shift"),
      YearMonth::new(2025, 12)
        .expect("month")
    );
    assert_eq!(
      jan.shift(-25).expect("shift"),
      YearMonth::new(2021, 12)
        .expect("month")
    );

    let last = YearMonth::new(9999, 12)
      .expect("month");
    assert!(matches!(
      last.next(),
      Err(PlannerError::OutOfRangeDate(_))
    ));
  }

  #[test]
  fn week_start_indices_and_names() {
    assert_eq!(
      WeekStart::default(),
      WeekStart::SUNDAY
    );
    assert_eq!(
      WeekStart::from_index(1)
        .expect("monday"),
      WeekStart::MONDAY
    );
    assert_eq!(
      WeekStart::parse("Sat")
        .expect("saturday")
        .index(),
      6
    );
    assert_eq!(
      WeekStart::parse("3")
        .expect("index")
        .weekday(),
      Weekday::Wed
    );
    assert!(WeekStart::from_index(7).is_err());
    assert!(WeekStart::parse("someday").is_err());
  }

  #[test]
  fn days_follow_start() {
    assert_eq!(
      WeekStart::MONDAY.days(),
      [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun
      ]
    );
    assert_eq!(
      WeekStart::SUNDAY.days()[6],
      Weekday::Sat
    );
  }

  #[test]
  fn week_bounds() {
    // 2024-02-01 is a Thursday.
    let day = date(2024, 2, 1);
    assert_eq!(
      WeekStart::SUNDAY
        .start_of_week(day)
        .expect("start"),
      date(2024, 1, 28)
    );
    assert_eq!(
      WeekStart::MONDAY
        .start_of_week(day)
        .expect("start"),
      date(2024, 1, 29)
    );
    assert_eq!(
      WeekStart::SUNDAY
        .end_of_week(day)
        .expect("end"),
      date(2024, 2, 3)
    );
    let thursday = WeekStart::from_index(4)
      .expect("thursday");
    assert_eq!(
      thursday
        .start_of_week(day)
        .expect("start"),
      day
    );
  }
}
