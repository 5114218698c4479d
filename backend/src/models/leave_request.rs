use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::request::{
    decode_optional_text, decode_text, DatedRequest, HalfDayStatus, RequestStatus, RequestType,
};
use crate::types::{HalfDays, LeaveAllocationId, LeaveRequestId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub requester_id: UserId,
    pub request_type: RequestType,
    pub half_day_status: Option<HalfDayStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: HalfDays,
    pub status: RequestStatus,
    pub return_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn new(
        requester_id: UserId,
        request_type: RequestType,
        half_day_status: Option<HalfDayStatus>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        duration: HalfDays,
        return_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: LeaveRequestId::new(),
            requester_id,
            request_type,
            half_day_status,
            start_date,
            end_date,
            duration,
            status: RequestStatus::Pending,
            return_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_approved(&self) -> bool {
        matches!(self.status, RequestStatus::Approved)
    }
}

impl<'r> FromRow<'r, PgRow> for LeaveRequest {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            requester_id: row.try_get("requester_id")?,
            request_type: decode_text(row, "request_type")?,
            half_day_status: decode_optional_text(row, "half_day_status")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            duration: row.try_get("duration_half_days")?,
            status: decode_text(row, "status")?,
            return_date: row.try_get("return_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl DatedRequest for LeaveRequest {
    type Id = LeaveRequestId;

    const KIND: &'static str = "leave";

    fn id(&self) -> LeaveRequestId {
        self.id
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    fn request_type(&self) -> RequestType {
        self.request_type
    }

    fn half_day_status(&self) -> Option<HalfDayStatus> {
        self.half_day_status
    }

    fn duration(&self) -> HalfDays {
        self.duration
    }

    fn status(&self) -> RequestStatus {
        self.status
    }
}

/// Yearly leave quota of one employee. Only one row per user is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct LeaveAllocation {
    pub id: LeaveAllocationId,
    pub user_id: UserId,
    #[sqlx(rename = "remaining_half_days")]
    pub remaining_leave: HalfDays,
    #[sqlx(rename = "used_half_days")]
    pub used_leave: HalfDays,
    #[sqlx(rename = "exceed_half_days")]
    pub exceed_leave: HalfDays,
    pub is_active: bool,
}

impl LeaveAllocation {
    pub fn new(user_id: UserId, remaining_leave: HalfDays, used_leave: HalfDays) -> Self {
        Self {
            id: LeaveAllocationId::new(),
            user_id,
            remaining_leave,
            used_leave,
            exceed_leave: HalfDays::ZERO,
            is_active: true,
        }
    }

    pub fn balances(&self) -> AllocationBalances {
        AllocationBalances {
            remaining_leave: self.remaining_leave,
            used_leave: self.used_leave,
            exceed_leave: self.exceed_leave,
        }
    }
}

/// The three balance columns, written back together in one targeted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationBalances {
    pub remaining_leave: HalfDays,
    pub used_leave: HalfDays,
    pub exceed_leave: HalfDays,
}

impl AllocationBalances {
    /// A day that was a holiday became a working day inside an approved
    /// request. Without exceed leave the day comes out of the quota, which may
    /// go negative; otherwise it is added to the exceed leave. `None` when the
    /// exceed balance is negative, in which case nothing may change.
    pub fn consume(self, delta: HalfDays) -> Option<Self> {
        if self.exceed_leave.is_zero() {
            Some(Self {
                remaining_leave: self.remaining_leave - delta,
                used_leave: self.used_leave + delta,
                ..self
            })
        } else if self.exceed_leave > HalfDays::ZERO {
            Some(Self {
                used_leave: self.used_leave + delta,
                exceed_leave: self.exceed_leave + delta,
                ..self
            })
        } else {
            None
        }
    }

    /// A working day inside an approved request became a holiday. Without
    /// exceed leave the day returns to the quota; otherwise it is taken off
    /// the exceed leave. `None` when the exceed balance is negative.
    pub fn restore(self, delta: HalfDays) -> Option<Self> {
        if self.exceed_leave.is_zero() {
            Some(Self {
                remaining_leave: self.remaining_leave + delta,
                used_leave: self.used_leave - delta,
                ..self
            })
        } else if self.exceed_leave > HalfDays::ZERO {
            Some(Self {
                used_leave: self.used_leave - delta,
                exceed_leave: self.exceed_leave - delta,
                ..self
            })
        } else {
            None
        }
    }

    /// Sum the conservation invariant is stated over.
    pub fn quota_total(&self) -> HalfDays {
        self.remaining_leave + self.used_leave
    }
}
