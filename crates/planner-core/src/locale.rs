//! Date formatting handed to the rendering side.
//!
//! The calendar never decides how a month or a weekday is spelled. Callers
//! pick a [`DateFormatter`]; the stock one is [`LocaleFormatter`].

use chrono::{
    DateTime, Locale, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use tracing::debug;

use crate::error::{PlannerError, PlannerResult};
use crate::month::{WeekStart, YearMonth};

pub const DEFAULT_LOCALE: &str = "en_US";

const MONTH_TITLE: &str = "%B %Y";
const WEEKDAY_SHORT: &str = "%a";
const WEEKDAY_LABEL_CHARS: usize = 2;
const DAY_HEADING: &str = "%A, %-d %B %Y";

pub trait DateFormatter {
    /// Navbar title, e.g. "February 2024".
    fn month_title(&self, month: YearMonth) -> String;

    /// Two-letter weekday names in grid column order.
    fn weekday_labels(&self, week_start: WeekStart) -> [String; 7];

    /// Long heading of the day-detail panel, first letter capitalized.
    fn day_heading(&self, date: NaiveDate) -> String;
}

/// chrono's localized formatting for one POSIX-style tag (`es_ES`, `en-US`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormatter {
    locale: Locale,
}

impl LocaleFormatter {
    pub fn new(tag: &str) -> PlannerResult<Self> {
        let normalized = tag.trim().replace('-', "_");
        let locale = Locale::try_from(normalized.as_str())
            .map_err(|_| PlannerError::invalid(format!("unknown locale {tag:?}")))?;
        debug!(locale = %normalized, "using locale");
        Ok(Self { locale })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn format(&self, date: NaiveDate, pattern: &str) -> String {
        midnight(date)
            .format_localized(pattern, self.locale)
            .to_string()
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::en_US,
        }
    }
}

impl DateFormatter for LocaleFormatter {
    fn month_title(&self, month: YearMonth) -> String {
        self.format(month.first_day(), MONTH_TITLE)
    }

    fn weekday_labels(&self, week_start: WeekStart) -> [String; 7] {
        week_start
            .days()
            .map(|weekday| {
                let short = match sample_day(weekday) {
                    Some(date) => self.format(date, WEEKDAY_SHORT),
                    None => weekday.to_string(),
                };
                short.chars().take(WEEKDAY_LABEL_CHARS).collect()
            })
    }

    fn day_heading(&self, date: NaiveDate) -> String {
        capitalize_first(&self.format(date, DAY_HEADING))
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

// Any date falling on `weekday`; ISO week 1 of 2024 starts on Monday the 1st.
fn sample_day(weekday: Weekday) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(2024, 1, weekday)
}
