use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::HolidayId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Holiday {
    pub id: HolidayId,
    pub name: String,
    pub holiday_date: NaiveDate,
    /// Object-storage key of the holiday image, if one was uploaded.
    pub image_key: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holiday {
    pub fn new(name: String, holiday_date: NaiveDate, image_key: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: HolidayId::new(),
            name,
            holiday_date,
            image_key,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateHolidayPayload {
    #[validate(custom(function = "crate::validation::rules::validate_holiday_name"))]
    pub name: String,
    pub holiday_date: NaiveDate,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255),
        custom(function = "crate::validation::rules::validate_image_key")
    )]
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateHolidayPayload {
    #[validate(custom(function = "crate::validation::rules::validate_holiday_name"))]
    pub name: String,
    pub holiday_date: NaiveDate,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255),
        custom(function = "crate::validation::rules::validate_image_key")
    )]
    pub image_key: Option<String>,
    /// Leaves the flag untouched when omitted.
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HolidayResponse {
    #[schema(value_type = String)]
    pub id: HolidayId,
    pub name: String,
    pub holiday_date: NaiveDate,
    pub image_key: Option<String>,
    pub is_active: bool,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<Holiday> for HolidayResponse {
    fn from(value: Holiday) -> Self {
        Self {
            id: value.id,
            year: value.holiday_date.year(),
            month: value.holiday_date.month(),
            day: value.holiday_date.day(),
            name: value.name,
            holiday_date: value.holiday_date,
            image_key: value.image_key,
            is_active: value.is_active,
        }
    }
}

/// Active and inactive holidays in one calendar month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HolidayMonthCount {
    pub active: i64,
    pub inactive: i64,
}

/// Per-month totals as aggregated by the database.
#[derive(Debug, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct MonthCountRow {
    pub year: i32,
    pub month: i32,
    pub active: i64,
    pub inactive: i64,
}

/// A listed holiday together with the totals of the month it falls in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedHoliday {
    pub holiday: Holiday,
    pub month_count: HolidayMonthCount,
}

impl CountedHoliday {
    /// Pairs each holiday with its month's row; months without a row count
    /// as empty.
    pub fn attach(holidays: Vec<Holiday>, counts: &[MonthCountRow]) -> Vec<CountedHoliday> {
        let by_month: HashMap<(i32, u32), HolidayMonthCount> = counts
            .iter()
            .filter_map(|row| {
                let month = u32::try_from(row.month).ok()?;
                Some((
                    (row.year, month),
                    HolidayMonthCount {
                        active: row.active,
                        inactive: row.inactive,
                    },
                ))
            })
            .collect();

        holidays
            .into_iter()
            .map(|holiday| {
                let key = (holiday.holiday_date.year(), holiday.holiday_date.month());
                CountedHoliday {
                    month_count: by_month.get(&key).copied().unwrap_or_default(),
                    holiday,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HolidayListItem {
    #[serde(flatten)]
    pub holiday: HolidayResponse,
    pub count: HolidayMonthCount,
}

impl From<CountedHoliday> for HolidayListItem {
    fn from(value: CountedHoliday) -> Self {
        Self {
            holiday: HolidayResponse::from(value.holiday),
            count: value.month_count,
        }
    }
}

/// What unauthenticated calendars get: active holidays, id and date only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq, Eq)]
pub struct PublicHoliday {
    #[schema(value_type = String)]
    pub id: HolidayId,
    pub holiday_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentMonthHolidaysResponse {
    /// Holidays this month, active or not.
    pub count: usize,
    pub data: Vec<HolidayResponse>,
}

impl From<Vec<Holiday>> for CurrentMonthHolidaysResponse {
    fn from(holidays: Vec<Holiday>) -> Self {
        Self {
            count: holidays.len(),
            data: holidays.into_iter().map(HolidayResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolidayListQuery {
    /// First calendar year of the financial-year range to list.
    pub start_year: Option<i32>,
    /// Last calendar year of the financial-year range to list.
    pub end_year: Option<i32>,
    /// Case-insensitive substring match on the holiday name.
    pub search: Option<String>,
    /// When true only active holidays are listed, as `{id, holiday_date}`.
    #[serde(default)]
    pub public_access: bool,
}
