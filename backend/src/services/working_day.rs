//! Working-day calendar.
//!
//! A snapshot of the weekly off-day pattern and the active holiday dates,
//! loaded once per holiday mutation. Propagation steps adjust the snapshot
//! with [`WorkingCalendar::with_holiday`] / [`WorkingCalendar::without_holiday`]
//! instead of re-reading storage, so each step sees the calendar exactly as it
//! is after its own holiday change.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::CalendarError;
use crate::models::request::{HalfDayStatus, RequestType};
use crate::models::settings::WeeklyOffPattern;
use crate::repositories::repository::{HolidayStore, SettingsStore};

/// Roughly three years.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 1096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCalendar {
    off_weekdays: HashSet<Weekday>,
    holidays: BTreeSet<NaiveDate>,
    lookahead_days: u32,
}

/// Weekdays configured as off. Fails when no pattern exists.
pub async fn load_off_weekdays<S>(store: &mut S) -> Result<HashSet<Weekday>, CalendarError>
where
    S: SettingsStore + ?Sized,
{
    let pattern = store
        .weekly_off_pattern()
        .await?
        .ok_or_else(CalendarError::weekly_pattern_missing)?;
    Ok(pattern.off_weekdays())
}

impl WorkingCalendar {
    pub fn new(
        pattern: &WeeklyOffPattern,
        holidays: impl IntoIterator<Item = NaiveDate>,
        lookahead_days: u32,
    ) -> Self {
        Self {
            off_weekdays: pattern.off_weekdays(),
            holidays: holidays.into_iter().collect(),
            lookahead_days,
        }
    }

    /// Loads the pattern and every active holiday dated from `from` up to
    /// `to` plus the lookahead.
    pub async fn load<S>(
        store: &mut S,
        from: NaiveDate,
        to: NaiveDate,
        lookahead_days: u32,
    ) -> Result<Self, CalendarError>
    where
        S: SettingsStore + HolidayStore + ?Sized,
    {
        let off_weekdays = load_off_weekdays(store).await?;
        let horizon = to
            .checked_add_days(Days::new(u64::from(lookahead_days) + 1))
            .unwrap_or(NaiveDate::MAX);
        let holidays = store.active_holiday_dates(from, horizon).await?;

        Ok(Self {
            off_weekdays,
            holidays: holidays.into_iter().collect(),
            lookahead_days,
        })
    }

    pub fn off_weekdays(&self) -> &HashSet<Weekday> {
        &self.off_weekdays
    }

    /// The same calendar with `date` marked as an active holiday.
    pub fn with_holiday(&self, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.holidays.insert(date);
        next
    }

    /// The same calendar with `date` no longer a holiday.
    pub fn without_holiday(&self, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.holidays.remove(&date);
        next
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.off_weekdays.contains(&date.weekday()) && !self.holidays.contains(&date)
    }

    /// First working day strictly after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        let mut cursor = date;
        for _ in 0..self.lookahead_days {
            cursor = self.step(cursor)?;
            if self.is_working_day(cursor) {
                return Ok(cursor);
            }
        }
        Err(self.exhausted(date))
    }

    /// Return date of a request whose current return date is `original`'s
    /// holiday.
    ///
    /// First-half half-day requests keep their return date: the employee is
    /// back the same afternoon. Everything else moves forward to the first
    /// working day that is not `original`.
    pub fn adjusted_return_date(
        &self,
        original: NaiveDate,
        current: NaiveDate,
        request_type: RequestType,
        half_day_status: Option<HalfDayStatus>,
    ) -> Result<NaiveDate, CalendarError> {
        if request_type == RequestType::Half && half_day_status == Some(HalfDayStatus::FirstHalf) {
            return Ok(current);
        }

        let mut cursor = current;
        for _ in 0..=self.lookahead_days {
            if self.is_working_day(cursor) && cursor != original {
                return Ok(cursor);
            }
            cursor = self.step(cursor)?;
        }
        Err(self.exhausted(current))
    }

    fn step(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        date.succ_opt()
            .ok_or_else(|| CalendarError::InvalidInput(format!("No date follows {}", date)))
    }

    fn exhausted(&self, date: NaiveDate) -> CalendarError {
        CalendarError::Config(format!(
            "No working day within {} days after {}; check the weekly off-day pattern",
            self.lookahead_days, date
        ))
    }
}
