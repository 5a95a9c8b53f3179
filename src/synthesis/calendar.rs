//! Cycle calendar derivation.
//!
//! All calendar math for the published roster lives here. Day dates are civil
//! dates in the configured reference timezone; labels use chrono's fixed
//! English abbreviations, so the output never depends on the host's locale or
//! local timezone.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{AuditError, AuditResult};
use crate::models::{CYCLE_DAYS, DayMeta, WEEK_DAYS};

/// Day-month-weekday label format, e.g. "5 Jan Sun".
const LABEL_FORMAT: &str = "%-d %b %a";

/// Day-month format used in the cycle title.
const TITLE_FORMAT: &str = "%-d %b";

/// Publication date format, matching Australian dd/mm/yyyy.
const PUBLICATION_FORMAT: &str = "%d/%m/%Y";

/// Derives the descriptor for one day of the cycle.
///
/// Pure and idempotent: the same inputs always give the same descriptor.
///
/// # Errors
///
/// Returns [`AuditError::DayIndexOutOfRange`] when `day_index` is 14 or more.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_audit::synthesis::day_meta;
///
/// // 2025-01-05 is a Sunday
/// let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
///
/// let first = day_meta(start, 0).unwrap();
/// assert_eq!(first.label, "5 Jan Sun");
/// assert!(first.is_weekend);
///
/// let monday = day_meta(start, 1).unwrap();
/// assert!(!monday.is_weekend);
/// assert_eq!(monday.week_index, 0);
///
/// assert_eq!(day_meta(start, 7).unwrap().week_index, 1);
/// assert!(day_meta(start, 14).is_err());
/// ```
pub fn day_meta(cycle_start: NaiveDate, day_index: usize) -> AuditResult<DayMeta> {
    if day_index >= CYCLE_DAYS {
        return Err(AuditError::DayIndexOutOfRange { index: day_index });
    }

    let date = cycle_start
        .checked_add_days(Days::new(day_index as u64))
        .ok_or(AuditError::DayIndexOutOfRange { index: day_index })?;

    Ok(DayMeta {
        day_index,
        date,
        label: date.format(LABEL_FORMAT).to_string(),
        week_index: if day_index < WEEK_DAYS { 0 } else { 1 },
        is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
    })
}

/// Derives all 14 day descriptors for a cycle starting on `cycle_start`.
pub fn fortnight(cycle_start: NaiveDate) -> AuditResult<Vec<DayMeta>> {
    (0..CYCLE_DAYS)
        .map(|day_index| day_meta(cycle_start, day_index))
        .collect()
}

/// The active rostering cycle pinned to a reference timezone.
///
/// Day descriptors are computed once on construction and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleCalendar {
    start: NaiveDate,
    zone: Tz,
    days: Vec<DayMeta>,
}

impl CycleCalendar {
    /// Creates the calendar for a cycle starting on `start` in `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::DayIndexOutOfRange`] if the cycle would run past
    /// the last representable date.
    pub fn new(start: NaiveDate, zone: Tz) -> AuditResult<Self> {
        let days = fortnight(start)?;
        Ok(Self { start, zone, days })
    }

    /// First day of the cycle.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the cycle.
    pub fn end(&self) -> NaiveDate {
        self.days.last().map_or(self.start, |day| day.date)
    }

    /// Reference timezone.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The 14 day descriptors in order.
    pub fn days(&self) -> &[DayMeta] {
        &self.days
    }

    /// Cycle title, e.g. "5 Jan – 18 Jan".
    pub fn title(&self) -> String {
        format!(
            "{} – {}",
            self.start.format(TITLE_FORMAT),
            self.end().format(TITLE_FORMAT)
        )
    }

    /// Returns the cycle day that `instant` falls on in the reference
    /// timezone, or `None` outside the cycle.
    pub fn day_index_of(&self, instant: DateTime<Utc>) -> Option<usize> {
        let local = instant.with_timezone(&self.zone).date_naive();
        self.days.iter().position(|day| day.date == local)
    }

    /// Renders the publication date of `instant` in the reference timezone.
    pub fn publication_label(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.zone)
            .format(PUBLICATION_FORMAT)
            .to_string()
    }
}
