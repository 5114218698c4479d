//! Company-level settings the holiday engine depends on.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;

use crate::types::CompanySettingsId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct CompanySettings {
    pub id: CompanySettingsId,
    pub financial_year_start_date: NaiveDate,
    pub financial_year_end_date: NaiveDate,
}

impl CompanySettings {
    pub fn new(financial_year_start_date: NaiveDate, financial_year_end_date: NaiveDate) -> Self {
        Self {
            id: CompanySettingsId::new(),
            financial_year_start_date,
            financial_year_end_date,
        }
    }

    pub fn financial_year_window(&self) -> FinancialYearWindow {
        FinancialYearWindow {
            start_date: self.financial_year_start_date,
            end_date: self.financial_year_end_date,
        }
    }
}

/// Inclusive accounting period `[start_date, end_date]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinancialYearWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FinancialYearWindow {
    pub fn is_well_formed(&self) -> bool {
        self.start_date <= self.end_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// The same window one year later. Feb 29 clamps to Feb 28.
    pub fn next_year(&self) -> Option<FinancialYearWindow> {
        Some(FinancialYearWindow {
            start_date: self.start_date.checked_add_months(Months::new(12))?,
            end_date: self.end_date.checked_add_months(Months::new(12))?,
        })
    }

    /// Window anchored on the configured month/day, spanning the given years.
    pub fn spanning_years(&self, start_year: i32, end_year: i32) -> Option<FinancialYearWindow> {
        Some(FinancialYearWindow {
            start_date: anchor_in_year(self.start_date, start_year)?,
            end_date: anchor_in_year(self.end_date, end_year)?,
        })
    }
}

fn anchor_in_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}

/// Per-weekday working flags; `false` marks a weekly off day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct WeeklyOffPattern {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WeeklyOffPattern {
    pub fn monday_to_friday() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }

    pub fn all_working() -> Self {
        Self {
            saturday: true,
            sunday: true,
            ..Self::monday_to_friday()
        }
    }

    pub fn is_working(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn off_weekdays(&self) -> HashSet<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|weekday| !self.is_working(*weekday))
        .collect()
    }
}
