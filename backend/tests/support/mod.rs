#![allow(dead_code)]
pub mod postgres;

use chrono::NaiveDate;
use holiday_calendar_backend::{
    models::{
        holiday::Holiday,
        leave_request::{LeaveAllocation, LeaveRequest},
        request::{HalfDayStatus, RequestStatus, RequestType},
        settings::{CompanySettings, WeeklyOffPattern},
        work_from_home::WorkFromHomeRequest,
    },
    repositories::InMemoryCalendarStore,
    types::{HalfDays, UserId},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Store with a 2026-04-01..2027-03-31 financial year and weekends off.
pub fn calendar_store() -> InMemoryCalendarStore {
    InMemoryCalendarStore::new()
        .with_company_settings(CompanySettings::new(date(2026, 4, 1), date(2027, 3, 31)))
        .with_weekly_off_pattern(WeeklyOffPattern::monday_to_friday())
}

pub fn holiday(name: &str, on: NaiveDate) -> Holiday {
    Holiday::new(name.to_string(), on, None)
}

pub fn full_leave(
    user: UserId,
    start: NaiveDate,
    end: NaiveDate,
    days: i32,
    return_date: NaiveDate,
    status: RequestStatus,
) -> LeaveRequest {
    LeaveRequest::new(
        user,
        RequestType::Full,
        None,
        start,
        end,
        HalfDays::from_days(days),
        return_date,
    )
    .with_status(status)
}

pub fn half_leave(
    user: UserId,
    half: HalfDayStatus,
    start: NaiveDate,
    end: NaiveDate,
    half_days: i32,
    return_date: NaiveDate,
    status: RequestStatus,
) -> LeaveRequest {
    LeaveRequest::new(
        user,
        RequestType::Half,
        Some(half),
        start,
        end,
        HalfDays::from_half_days(half_days),
        return_date,
    )
    .with_status(status)
}

pub fn full_wfh(
    user: UserId,
    start: NaiveDate,
    end: NaiveDate,
    days: i32,
    return_date: NaiveDate,
) -> WorkFromHomeRequest {
    WorkFromHomeRequest::new(
        user,
        RequestType::Full,
        None,
        start,
        end,
        HalfDays::from_days(days),
        return_date,
    )
    .with_status(RequestStatus::Approved)
}

pub fn allocation(user: UserId, remaining_days: i32, used_days: i32) -> LeaveAllocation {
    LeaveAllocation::new(
        user,
        HalfDays::from_days(remaining_days),
        HalfDays::from_days(used_days),
    )
}
