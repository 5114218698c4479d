use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::request::{
    decode_optional_text, decode_text, DatedRequest, HalfDayStatus, RequestStatus, RequestType,
};
use crate::types::{HalfDays, UserId, WorkFromHomeId};

/// Work-from-home request. Same span semantics as leave, but without a quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkFromHomeRequest {
    pub id: WorkFromHomeId,
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

impl WorkFromHomeRequest {
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
            id: WorkFromHomeId::new(),
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
}

impl<'r> FromRow<'r, PgRow> for WorkFromHomeRequest {
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

impl DatedRequest for WorkFromHomeRequest {
    type Id = WorkFromHomeId;

    const KIND: &'static str = "work_from_home";

    fn id(&self) -> WorkFromHomeId {
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
