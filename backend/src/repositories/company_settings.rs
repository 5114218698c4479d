//! Company settings and weekly off-day pattern reads.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::CalendarError;
use crate::models::settings::{CompanySettings, WeeklyOffPattern};
use crate::repositories::repository::SettingsStore;
use crate::repositories::transaction::PgUnitOfWork;

const SETTINGS_TABLE: &str = "company_settings";
const SETTINGS_COLUMNS: &str = "id, financial_year_start_date, financial_year_end_date";
const PATTERN_TABLE: &str = "weekly_off_patterns";
const PATTERN_COLUMNS: &str = "monday, tuesday, wednesday, thursday, friday, saturday, sunday";

fn settings_query() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY created_at ASC LIMIT 1",
        SETTINGS_COLUMNS, SETTINGS_TABLE
    )
}

fn pattern_query() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY created_at ASC LIMIT 1",
        PATTERN_COLUMNS, PATTERN_TABLE
    )
}

/// Pool-level reads for the list endpoints, outside any unit of work.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompanySettingsRepository;

impl CompanySettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find(&self, db: &PgPool) -> Result<Option<CompanySettings>, CalendarError> {
        let row = sqlx::query_as::<_, CompanySettings>(&settings_query())
            .fetch_optional(db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl SettingsStore for PgUnitOfWork {
    async fn company_settings(&mut self) -> Result<Option<CompanySettings>, CalendarError> {
        let row = sqlx::query_as::<_, CompanySettings>(&settings_query())
            .fetch_optional(self.conn())
            .await?;
        Ok(row)
    }

    async fn weekly_off_pattern(&mut self) -> Result<Option<WeeklyOffPattern>, CalendarError> {
        let row = sqlx::query_as::<_, WeeklyOffPattern>(&pattern_query())
            .fetch_optional(self.conn())
            .await?;
        Ok(row)
    }
}
