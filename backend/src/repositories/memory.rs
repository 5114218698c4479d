//! In-memory implementation of every storage port.
//!
//! Used by the test suites and by anyone embedding the engine without a
//! database. Mirrors the PostgreSQL repositories: reads skip cancelled
//! requests, holiday dates are unique and writes touch only the column they
//! name.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::holiday::Holiday;
use crate::models::leave_request::{AllocationBalances, LeaveAllocation, LeaveRequest};
use crate::models::request::DatedRequest;
use crate::models::settings::{CompanySettings, WeeklyOffPattern};
use crate::models::work_from_home::WorkFromHomeRequest;
use crate::repositories::repository::{
    HolidayStore, LeaveAllocationStore, RequestSpanStore, SettingsStore,
};
use crate::types::{HalfDays, HolidayId, LeaveAllocationId, LeaveRequestId, UserId, WorkFromHomeId};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendarStore {
    company_settings: Option<CompanySettings>,
    weekly_off_pattern: Option<WeeklyOffPattern>,
    holidays: Vec<Holiday>,
    leave_requests: Vec<LeaveRequest>,
    work_from_home_requests: Vec<WorkFromHomeRequest>,
    allocations: Vec<LeaveAllocation>,
    locked_dates: BTreeSet<NaiveDate>,
}

impl InMemoryCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company_settings(mut self, settings: CompanySettings) -> Self {
        self.company_settings = Some(settings);
        self
    }

    pub fn with_weekly_off_pattern(mut self, pattern: WeeklyOffPattern) -> Self {
        self.weekly_off_pattern = Some(pattern);
        self
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    pub fn with_leave_request(mut self, request: LeaveRequest) -> Self {
        self.leave_requests.push(request);
        self
    }

    pub fn with_work_from_home(mut self, request: WorkFromHomeRequest) -> Self {
        self.work_from_home_requests.push(request);
        self
    }

    pub fn with_allocation(mut self, allocation: LeaveAllocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn holiday(&self, id: HolidayId) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.id == id)
    }

    pub fn leave_request(&self, id: LeaveRequestId) -> Option<&LeaveRequest> {
        self.leave_requests.iter().find(|r| r.id == id)
    }

    pub fn work_from_home(&self, id: WorkFromHomeId) -> Option<&WorkFromHomeRequest> {
        self.work_from_home_requests.iter().find(|r| r.id == id)
    }

    pub fn allocation(&self, id: LeaveAllocationId) -> Option<&LeaveAllocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    /// Dates locked by [`HolidayStore::lock_holiday_date`] so far.
    pub fn locked_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.locked_dates
    }
}

fn overlapping<R: DatedRequest>(requests: &[R], date: NaiveDate) -> Vec<R> {
    requests
        .iter()
        .filter(|r| !r.is_cancelled() && r.covers(date))
        .cloned()
        .collect()
}

fn returning_on<R: DatedRequest>(requests: &[R], date: NaiveDate) -> Vec<R> {
    requests
        .iter()
        .filter(|r| !r.is_cancelled() && r.return_date() == date)
        .cloned()
        .collect()
}

fn request_not_found<R: DatedRequest>(id: R::Id) -> CalendarError {
    CalendarError::NotFound(format!("{} request {} not found", R::KIND, id))
}

#[async_trait]
impl SettingsStore for InMemoryCalendarStore {
    async fn company_settings(&mut self) -> Result<Option<CompanySettings>, CalendarError> {
        Ok(self.company_settings.clone())
    }

    async fn weekly_off_pattern(&mut self) -> Result<Option<WeeklyOffPattern>, CalendarError> {
        Ok(self.weekly_off_pattern)
    }
}

#[async_trait]
impl HolidayStore for InMemoryCalendarStore {
    async fn find_holiday(&mut self, id: HolidayId) -> Result<Option<Holiday>, CalendarError> {
        Ok(self.holiday(id).cloned())
    }

    async fn find_holiday_by_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Option<Holiday>, CalendarError> {
        Ok(self.holidays.iter().find(|h| h.holiday_date == date).cloned())
    }

    async fn active_holiday_dates(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        let mut dates: Vec<NaiveDate> = self
            .holidays
            .iter()
            .filter(|h| h.is_active && h.holiday_date >= from && h.holiday_date <= to)
            .map(|h| h.holiday_date)
            .collect();
        dates.sort();
        Ok(dates)
    }

    async fn holiday_name_exists(
        &mut self,
        name: &str,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<HolidayId>,
    ) -> Result<bool, CalendarError> {
        Ok(self.holidays.iter().any(|h| {
            h.name == name
                && h.holiday_date >= from
                && h.holiday_date <= to
                && Some(h.id) != exclude
        }))
    }

    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError> {
        if self
            .holidays
            .iter()
            .any(|h| h.holiday_date == holiday.holiday_date)
        {
            return Err(CalendarError::DuplicateDate(holiday.holiday_date));
        }
        self.holidays.push(holiday.clone());
        Ok(holiday.clone())
    }

    async fn update_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError> {
        if self
            .holidays
            .iter()
            .any(|h| h.id != holiday.id && h.holiday_date == holiday.holiday_date)
        {
            return Err(CalendarError::DuplicateDate(holiday.holiday_date));
        }
        let slot = self
            .holidays
            .iter_mut()
            .find(|h| h.id == holiday.id)
            .ok_or_else(|| CalendarError::NotFound("Holiday not found".into()))?;
        *slot = holiday.clone();
        Ok(holiday.clone())
    }

    async fn delete_holiday(&mut self, id: HolidayId) -> Result<(), CalendarError> {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.id != id);
        if self.holidays.len() == before {
            return Err(CalendarError::NotFound("Holiday not found".into()));
        }
        Ok(())
    }

    async fn lock_holiday_date(&mut self, date: NaiveDate) -> Result<(), CalendarError> {
        self.locked_dates.insert(date);
        Ok(())
    }
}

#[async_trait]
impl RequestSpanStore<LeaveRequest> for InMemoryCalendarStore {
    async fn find_overlapping(&mut self, date: NaiveDate) -> Result<Vec<LeaveRequest>, CalendarError> {
        Ok(overlapping(&self.leave_requests, date))
    }

    async fn find_by_return_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, CalendarError> {
        Ok(returning_on(&self.leave_requests, date))
    }

    async fn update_duration(
        &mut self,
        id: LeaveRequestId,
        duration: HalfDays,
    ) -> Result<(), CalendarError> {
        let request = self
            .leave_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| request_not_found::<LeaveRequest>(id))?;
        request.duration = duration;
        Ok(())
    }

    async fn update_return_date(
        &mut self,
        id: LeaveRequestId,
        return_date: NaiveDate,
    ) -> Result<(), CalendarError> {
        let request = self
            .leave_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| request_not_found::<LeaveRequest>(id))?;
        request.return_date = return_date;
        Ok(())
    }
}

#[async_trait]
impl RequestSpanStore<WorkFromHomeRequest> for InMemoryCalendarStore {
    async fn find_overlapping(
        &mut self,
        date: NaiveDate,
    ) -> Result<Vec<WorkFromHomeRequest>, CalendarError> {
        Ok(overlapping(&self.work_from_home_requests, date))
    }

    async fn find_by_return_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Vec<WorkFromHomeRequest>, CalendarError> {
        Ok(returning_on(&self.work_from_home_requests, date))
    }

    async fn update_duration(
        &mut self,
        id: WorkFromHomeId,
        duration: HalfDays,
    ) -> Result<(), CalendarError> {
        let request = self
            .work_from_home_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| request_not_found::<WorkFromHomeRequest>(id))?;
        request.duration = duration;
        Ok(())
    }

    async fn update_return_date(
        &mut self,
        id: WorkFromHomeId,
        return_date: NaiveDate,
    ) -> Result<(), CalendarError> {
        let request = self
            .work_from_home_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| request_not_found::<WorkFromHomeRequest>(id))?;
        request.return_date = return_date;
        Ok(())
    }
}

#[async_trait]
impl LeaveAllocationStore for InMemoryCalendarStore {
    async fn find_active_allocation(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<LeaveAllocation>, CalendarError> {
        Ok(self
            .allocations
            .iter()
            .find(|a| a.user_id == user_id && a.is_active)
            .cloned())
    }

    async fn update_allocation_balances(
        &mut self,
        id: LeaveAllocationId,
        balances: AllocationBalances,
    ) -> Result<(), CalendarError> {
        let allocation = self
            .allocations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CalendarError::NotFound(format!("Leave allocation {} not found", id)))?;
        allocation.remaining_leave = balances.remaining_leave;
        allocation.used_leave = balances.used_leave;
        allocation.exceed_leave = balances.exceed_leave;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request::{RequestStatus, RequestType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn overlapping_skips_cancelled_requests() {
        let user = UserId::new();
        let live = LeaveRequest::new(
            user,
            RequestType::Full,
            None,
            date(2026, 11, 2),
            date(2026, 11, 6),
            HalfDays::from_days(5),
            date(2026, 11, 9),
        );
        let cancelled = live.clone().with_status(RequestStatus::Cancelled);
        let cancelled = LeaveRequest {
            id: LeaveRequestId::new(),
            ..cancelled
        };
        let mut store = InMemoryCalendarStore::new()
            .with_leave_request(live.clone())
            .with_leave_request(cancelled);

        let found = RequestSpanStore::<LeaveRequest>::find_overlapping(&mut store, date(2026, 11, 4))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, live.id);
    }

    #[tokio::test]
    async fn insert_rejects_second_holiday_on_same_date() {
        let day = date(2026, 11, 9);
        let mut store =
            InMemoryCalendarStore::new().with_holiday(Holiday::new("Diwali".into(), day, None));
        let err = store
            .insert_holiday(&Holiday::new("Other".into(), day, None))
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateDate(d) if d == day));
    }

    #[tokio::test]
    async fn active_dates_ignore_inactive_holidays() {
        let mut inactive = Holiday::new("Old".into(), date(2026, 12, 1), None);
        inactive.is_active = false;
        let mut store = InMemoryCalendarStore::new()
            .with_holiday(Holiday::new("Diwali".into(), date(2026, 11, 9), None))
            .with_holiday(inactive);
        let dates = store
            .active_holiday_dates(date(2026, 1, 1), date(2026, 12, 31))
            .await
            .unwrap();
        assert_eq!(dates, vec![date(2026, 11, 9)]);
    }
}
