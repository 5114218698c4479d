//! Leave duration pass.
//!
//! Every non-cancelled leave request covering the holiday date gets one day
//! (or half a day) added or removed. Approved requests mirror the change into
//! the requester's active allocation; a request whose allocation is missing or
//! carries a negative exceed balance is left as it is.

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::leave_request::LeaveRequest;
use crate::models::request::{DatedRequest, RequestStatus};
use crate::repositories::repository::{LeaveAllocationStore, RequestSpanStore};
use crate::services::propagation::HolidayChange;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LeaveAdjustment {
    pub durations: usize,
    pub allocations: usize,
}

pub(crate) async fn adjust_leave_durations<S>(
    store: &mut S,
    date: NaiveDate,
    change: HolidayChange,
) -> Result<LeaveAdjustment, CalendarError>
where
    S: RequestSpanStore<LeaveRequest> + LeaveAllocationStore + ?Sized,
{
    let mut outcome = LeaveAdjustment::default();
    let requests = store.find_overlapping(date).await?;

    for request in requests {
        let Some(allocation) = store.find_active_allocation(request.requester_id).await? else {
            tracing::warn!(
                leave_request_id = %request.id,
                requester_id = %request.requester_id,
                %date,
                "No active leave allocation; leave request left unchanged"
            );
            continue;
        };

        let delta = request.request_type.daily_unit();
        let balances = if request.status() == RequestStatus::Approved {
            let before = allocation.balances();
            let after = match change {
                HolidayChange::Deleted => before.consume(delta),
                HolidayChange::Created => before.restore(delta),
            };
            let Some(after) = after else {
                tracing::warn!(
                    leave_request_id = %request.id,
                    allocation_id = %allocation.id,
                    exceed = %before.exceed_leave,
                    "Negative exceed leave; leave request left unchanged"
                );
                continue;
            };
            Some(after)
        } else {
            None
        };

        let duration = change.apply(request.duration, delta);
        store.update_duration(request.id, duration).await?;
        outcome.durations += 1;
        tracing::debug!(
            leave_request_id = %request.id,
            from = %request.duration,
            to = %duration,
            "Adjusted leave duration"
        );

        if let Some(after) = balances {
            store.update_allocation_balances(allocation.id, after).await?;
            outcome.allocations += 1;
            tracing::debug!(
                allocation_id = %allocation.id,
                remaining = %after.remaining_leave,
                used = %after.used_leave,
                exceed = %after.exceed_leave,
                "Adjusted leave allocation"
            );
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leave_request::LeaveAllocation;
    use crate::models::request::RequestType;
    use crate::repositories::memory::InMemoryCalendarStore;
    use crate::types::{HalfDays, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_week(user: UserId) -> LeaveRequest {
        LeaveRequest::new(
            user,
            RequestType::Full,
            None,
            date(2026, 11, 2),
            date(2026, 11, 6),
            HalfDays::from_days(4),
            date(2026, 11, 9),
        )
    }

    #[tokio::test]
    async fn approved_leave_consumes_allocation_on_delete() {
        let user = UserId::new();
        let request = full_week(user).with_status(RequestStatus::Approved);
        let allocation = LeaveAllocation::new(user, HalfDays::from_days(10), HalfDays::from_days(4));
        let mut store = InMemoryCalendarStore::new()
            .with_leave_request(request.clone())
            .with_allocation(allocation.clone());

        let outcome = adjust_leave_durations(&mut store, date(2026, 11, 4), HolidayChange::Deleted)
            .await
            .unwrap();

        assert_eq!(outcome, LeaveAdjustment { durations: 1, allocations: 1 });
        assert_eq!(store.leave_request(request.id).unwrap().duration, HalfDays::from_days(5));
        let stored = store.allocation(allocation.id).unwrap();
        assert_eq!(stored.remaining_leave, HalfDays::from_days(9));
        assert_eq!(stored.used_leave, HalfDays::from_days(5));
    }

    #[tokio::test]
    async fn pending_leave_only_changes_duration() {
        let user = UserId::new();
        let request = full_week(user);
        let allocation = LeaveAllocation::new(user, HalfDays::from_days(10), HalfDays::from_days(4));
        let mut store = InMemoryCalendarStore::new()
            .with_leave_request(request.clone())
            .with_allocation(allocation.clone());

        let outcome = adjust_leave_durations(&mut store, date(2026, 11, 4), HolidayChange::Created)
            .await
            .unwrap();

        assert_eq!(outcome, LeaveAdjustment { durations: 1, allocations: 0 });
        assert_eq!(store.leave_request(request.id).unwrap().duration, HalfDays::from_days(3));
        assert_eq!(store.allocation(allocation.id).unwrap(), &allocation);
    }

    #[tokio::test]
    async fn missing_allocation_skips_the_request() {
        let request = full_week(UserId::new()).with_status(RequestStatus::Approved);
        let mut store = InMemoryCalendarStore::new().with_leave_request(request.clone());

        let outcome = adjust_leave_durations(&mut store, date(2026, 11, 4), HolidayChange::Deleted)
            .await
            .unwrap();

        assert_eq!(outcome, LeaveAdjustment::default());
        assert_eq!(store.leave_request(request.id).unwrap().duration, request.duration);
    }

    #[tokio::test]
    async fn negative_exceed_leaves_request_and_allocation_alone() {
        let user = UserId::new();
        let request = full_week(user).with_status(RequestStatus::Approved);
        let mut allocation =
            LeaveAllocation::new(user, HalfDays::from_days(2), HalfDays::from_days(4));
        allocation.exceed_leave = HalfDays::from_half_days(-1);
        let mut store = InMemoryCalendarStore::new()
            .with_leave_request(request.clone())
            .with_allocation(allocation.clone());

        let outcome = adjust_leave_durations(&mut store, date(2026, 11, 4), HolidayChange::Deleted)
            .await
            .unwrap();

        assert_eq!(outcome, LeaveAdjustment::default());
        assert_eq!(store.leave_request(request.id).unwrap(), &request);
        assert_eq!(store.allocation(allocation.id).unwrap(), &allocation);
    }
}
