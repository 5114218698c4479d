//! Holiday change propagation.
//!
//! When a holiday appears, disappears or moves, every leave and
//! work-from-home request touching that date is brought back in line: the
//! duration pass runs first, then return dates are migrated. All reads and
//! writes go through the caller's unit of work.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::leave_request::LeaveRequest;
use crate::models::request::{DatedRequest, HalfDayStatus, RequestType};
use crate::models::work_from_home::WorkFromHomeRequest;
use crate::repositories::repository::{CalendarStore, RequestSpanStore};
use crate::services::leave_adjuster::adjust_leave_durations;
use crate::services::wfh_adjuster::adjust_wfh_durations;
use crate::services::working_day::{WorkingCalendar, DEFAULT_LOOKAHEAD_DAYS};
use crate::types::HalfDays;

/// Which way a holiday date flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HolidayChange {
    /// The date became a holiday, so requests covering it shrink.
    Created,
    /// The date became a working day again, so requests covering it grow.
    Deleted,
}

impl HolidayChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayChange::Created => "created",
            HolidayChange::Deleted => "deleted",
        }
    }

    pub(crate) fn apply(&self, duration: HalfDays, delta: HalfDays) -> HalfDays {
        match self {
            HolidayChange::Created => duration - delta,
            HolidayChange::Deleted => duration + delta,
        }
    }
}

impl fmt::Display for HolidayChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one propagation step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationReport {
    pub date: NaiveDate,
    pub direction: HolidayChange,
    pub leave_durations_adjusted: usize,
    pub allocations_adjusted: usize,
    pub wfh_durations_adjusted: usize,
    pub leave_return_dates_moved: usize,
    pub wfh_return_dates_moved: usize,
}

impl PropagationReport {
    pub fn rows_touched(&self) -> usize {
        self.leave_durations_adjusted
            + self.allocations_adjusted
            + self.wfh_durations_adjusted
            + self.leave_return_dates_moved
            + self.wfh_return_dates_moved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayPropagator {
    lookahead_days: u32,
}

impl Default for HolidayPropagator {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD_DAYS)
    }
}

impl HolidayPropagator {
    pub fn new(lookahead_days: u32) -> Self {
        Self { lookahead_days }
    }

    /// `date` became an active holiday.
    pub async fn on_holiday_created<S>(
        &self,
        store: &mut S,
        date: NaiveDate,
    ) -> Result<PropagationReport, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        store.lock_holiday_date(date).await?;
        let calendar = WorkingCalendar::load(store, date, date, self.lookahead_days)
            .await?
            .with_holiday(date);
        propagate(store, &calendar, date, HolidayChange::Created).await
    }

    /// `date` is no longer an active holiday.
    pub async fn on_holiday_deleted<S>(
        &self,
        store: &mut S,
        date: NaiveDate,
    ) -> Result<PropagationReport, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        store.lock_holiday_date(date).await?;
        let calendar = WorkingCalendar::load(store, date, date, self.lookahead_days)
            .await?
            .without_holiday(date);
        propagate(store, &calendar, date, HolidayChange::Deleted).await
    }

    /// An active holiday moved from `old` to `new`: delete then create.
    /// Returns no reports when the date did not change.
    pub async fn on_holiday_date_changed<S>(
        &self,
        store: &mut S,
        old: NaiveDate,
        new: NaiveDate,
    ) -> Result<Vec<PropagationReport>, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        if old == new {
            return Ok(Vec::new());
        }

        // Lock in date order so two moves between the same dates cannot deadlock.
        let (first, last) = if old < new { (old, new) } else { (new, old) };
        store.lock_holiday_date(first).await?;
        store.lock_holiday_date(last).await?;

        let base = WorkingCalendar::load(store, first, last, self.lookahead_days)
            .await?
            .without_holiday(old)
            .without_holiday(new);
        let deleted = propagate(store, &base, old, HolidayChange::Deleted).await?;
        let created =
            propagate(store, &base.with_holiday(new), new, HolidayChange::Created).await?;

        Ok(vec![deleted, created])
    }
}

async fn propagate<S>(
    store: &mut S,
    calendar: &WorkingCalendar,
    date: NaiveDate,
    change: HolidayChange,
) -> Result<PropagationReport, CalendarError>
where
    S: CalendarStore + ?Sized,
{
    let leave = adjust_leave_durations(store, date, change).await?;
    let wfh_durations_adjusted = adjust_wfh_durations(store, date, change).await?;

    let leave_return_dates_moved =
        migrate_return_dates::<LeaveRequest, S>(store, calendar, date, change).await?;
    let wfh_return_dates_moved =
        migrate_return_dates::<WorkFromHomeRequest, S>(store, calendar, date, change).await?;

    let report = PropagationReport {
        date,
        direction: change,
        leave_durations_adjusted: leave.durations,
        allocations_adjusted: leave.allocations,
        wfh_durations_adjusted,
        leave_return_dates_moved,
        wfh_return_dates_moved,
    };

    tracing::info!(
        %date,
        direction = %change,
        leave_durations = report.leave_durations_adjusted,
        allocations = report.allocations_adjusted,
        wfh_durations = report.wfh_durations_adjusted,
        leave_return_dates = report.leave_return_dates_moved,
        wfh_return_dates = report.wfh_return_dates_moved,
        "Propagated holiday change"
    );

    Ok(report)
}

/// Moves return dates of one request kind after the duration pass.
///
/// Deleted: requests returning on the next working day after `date` come
/// back on `date` instead, then anything else returning on `date` is
/// re-derived. Created: requests returning on `date` move past it.
async fn migrate_return_dates<R, S>(
    store: &mut S,
    calendar: &WorkingCalendar,
    date: NaiveDate,
    change: HolidayChange,
) -> Result<usize, CalendarError>
where
    R: DatedRequest,
    S: RequestSpanStore<R> + ?Sized,
{
    let mut moved_back = HashSet::new();

    if change == HolidayChange::Deleted {
        let next_working = calendar.next_working_day(date)?;
        for request in store.find_by_return_date(next_working).await? {
            if !returns_after_span(&request, next_working) {
                continue;
            }
            store.update_return_date(request.id(), date).await?;
            moved_back.insert(request.id());
            tracing::debug!(
                kind = R::KIND,
                request_id = %request.id(),
                from = %next_working,
                to = %date,
                "Moved return date back"
            );
        }
    }

    let mut moved_forward = 0;
    for request in store.find_by_return_date(date).await? {
        if moved_back.contains(&request.id()) {
            continue;
        }
        let adjusted = calendar.adjusted_return_date(
            date,
            request.return_date(),
            request.request_type(),
            request.half_day_status(),
        )?;
        if adjusted == request.return_date() {
            continue;
        }
        store.update_return_date(request.id(), adjusted).await?;
        moved_forward += 1;
        tracing::debug!(
            kind = R::KIND,
            request_id = %request.id(),
            from = %request.return_date(),
            to = %adjusted,
            "Moved return date forward"
        );
    }

    Ok(moved_back.len() + moved_forward)
}

/// Whether a request returning on `next_working` did so only because the
/// holiday sat between its last day and that return.
///
/// Single-day requests taken on `next_working` itself stay put.
fn returns_after_span<R: DatedRequest>(request: &R, next_working: NaiveDate) -> bool {
    if request.is_single_day_on(next_working) {
        return false;
    }
    let duration = request.duration();
    match request.request_type() {
        RequestType::Full => duration >= HalfDays::ONE_DAY,
        RequestType::Half => {
            duration >= HalfDays::ONE_DAY
                || (duration == HalfDays::HALF_DAY
                    && request.half_day_status() == Some(HalfDayStatus::SecondHalf))
        }
    }
}
