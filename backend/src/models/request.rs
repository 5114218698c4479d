//! Request vocabulary shared between leave and work-from-home requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::types::HalfDays;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            other => Err(format!("unknown request status: {}", other)),
        }
    }
}

/// Whether a request covers whole days or half days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Full,
    Half,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Full => "full",
            RequestType::Half => "half",
        }
    }

    /// Duration consumed by a single day of this request type.
    pub fn daily_unit(&self) -> HalfDays {
        match self {
            RequestType::Full => HalfDays::ONE_DAY,
            RequestType::Half => HalfDays::HALF_DAY,
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(RequestType::Full),
            "half" => Ok(RequestType::Half),
            other => Err(format!("unknown request type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum HalfDayStatus {
    #[serde(rename = "firsthalf")]
    FirstHalf,
    #[serde(rename = "secondhalf")]
    SecondHalf,
}

impl HalfDayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HalfDayStatus::FirstHalf => "firsthalf",
            HalfDayStatus::SecondHalf => "secondhalf",
        }
    }
}

impl FromStr for HalfDayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firsthalf" => Ok(HalfDayStatus::FirstHalf),
            "secondhalf" => Ok(HalfDayStatus::SecondHalf),
            other => Err(format!("unknown half day status: {}", other)),
        }
    }
}

/// A request spanning `start_date..=end_date` with a computed duration and
/// return date. Leave and work-from-home requests share this shape.
pub trait DatedRequest: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Display + Send + Sync + 'static;

    /// Short label used in log output.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
    fn return_date(&self) -> NaiveDate;
    fn request_type(&self) -> RequestType;
    fn half_day_status(&self) -> Option<HalfDayStatus>;
    fn duration(&self) -> HalfDays;
    fn status(&self) -> RequestStatus;

    fn covers(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }

    fn is_cancelled(&self) -> bool {
        self.status() == RequestStatus::Cancelled
    }

    fn is_single_day_on(&self, date: NaiveDate) -> bool {
        self.start_date() == date && self.end_date() == date
    }
}

/// Decodes a TEXT column into one of the request enums.
pub(crate) fn decode_text<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

pub(crate) fn decode_optional_text<T>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| value.parse())
        .transpose()
        .map_err(|e: String| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: e.into(),
        })
}
