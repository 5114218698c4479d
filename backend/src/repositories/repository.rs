//! Storage ports used by the holiday propagation engine.
//!
//! Every trait is implemented by a single unit of work so that one holiday
//! mutation reads and writes through one transaction. `PgUnitOfWork` backs
//! them with PostgreSQL; `InMemoryCalendarStore` backs them with plain maps.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::holiday::Holiday;
use crate::models::leave_request::{AllocationBalances, LeaveAllocation, LeaveRequest};
use crate::models::request::DatedRequest;
use crate::models::settings::{CompanySettings, WeeklyOffPattern};
use crate::models::work_from_home::WorkFromHomeRequest;
use crate::types::{HalfDays, HolidayId, LeaveAllocationId, UserId};

/// Company-wide configuration reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsStore: Send {
    /// The single company settings row, if one has been configured.
    async fn company_settings(&mut self) -> Result<Option<CompanySettings>, CalendarError>;

    /// The single weekly off-day pattern, if one has been configured.
    async fn weekly_off_pattern(&mut self) -> Result<Option<WeeklyOffPattern>, CalendarError>;
}

#[async_trait]
pub trait HolidayStore: Send {
    async fn find_holiday(&mut self, id: HolidayId) -> Result<Option<Holiday>, CalendarError>;

    async fn find_holiday_by_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Option<Holiday>, CalendarError>;

    /// Dates of active holidays within `from..=to`, ascending.
    async fn active_holiday_dates(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError>;

    /// Whether a holiday called `name` is dated within `from..=to`,
    /// ignoring the holiday `exclude` when given.
    async fn holiday_name_exists(
        &mut self,
        name: &str,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<HolidayId>,
    ) -> Result<bool, CalendarError>;

    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError>;

    async fn update_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError>;

    async fn delete_holiday(&mut self, id: HolidayId) -> Result<(), CalendarError>;

    /// Serializes concurrent mutations touching the same holiday date until
    /// the unit of work ends.
    async fn lock_holiday_date(&mut self, date: NaiveDate) -> Result<(), CalendarError>;
}

/// Span queries and targeted column writes for one request kind.
///
/// Reads never return cancelled requests.
#[async_trait]
pub trait RequestSpanStore<R: DatedRequest>: Send {
    /// Requests with `start_date <= date <= end_date`.
    async fn find_overlapping(&mut self, date: NaiveDate) -> Result<Vec<R>, CalendarError>;

    async fn find_by_return_date(&mut self, date: NaiveDate) -> Result<Vec<R>, CalendarError>;

    async fn update_duration(&mut self, id: R::Id, duration: HalfDays)
        -> Result<(), CalendarError>;

    async fn update_return_date(
        &mut self,
        id: R::Id,
        return_date: NaiveDate,
    ) -> Result<(), CalendarError>;
}

#[async_trait]
pub trait LeaveAllocationStore: Send {
    /// First active allocation of the user.
    async fn find_active_allocation(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<LeaveAllocation>, CalendarError>;

    async fn update_allocation_balances(
        &mut self,
        id: LeaveAllocationId,
        balances: AllocationBalances,
    ) -> Result<(), CalendarError>;
}

/// Everything a holiday mutation needs, in one unit of work.
pub trait CalendarStore:
    SettingsStore
    + HolidayStore
    + LeaveAllocationStore
    + RequestSpanStore<LeaveRequest>
    + RequestSpanStore<WorkFromHomeRequest>
{
}

impl<T> CalendarStore for T where
    T: SettingsStore
        + HolidayStore
        + LeaveAllocationStore
        + RequestSpanStore<LeaveRequest>
        + RequestSpanStore<WorkFromHomeRequest>
{
}
