//! Holiday repository.
//!
//! Pool-level reads for the list endpoints, and the transactional
//! [`HolidayStore`] used by holiday mutations.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::CalendarError;
use crate::models::holiday::{Holiday, MonthCountRow, PublicHoliday};
use crate::repositories::repository::HolidayStore;
use crate::repositories::transaction::{holiday_date_lock_key, PgUnitOfWork};
use crate::types::HolidayId;

const TABLE_NAME: &str = "holidays";
const SELECT_COLUMNS: &str = "id, name, holiday_date, image_key, is_active, created_at, updated_at";
const UNIQUE_DATE_CONSTRAINT: &str = "holidays_holiday_date_key";

#[derive(Debug, Default, Clone, Copy)]
pub struct HolidayRepository;

impl HolidayRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(&self, db: &PgPool, id: HolidayId) -> Result<Holiday, CalendarError> {
        let query = format!("{} WHERE id = $1", Self::base_select_query());
        sqlx::query_as::<_, Holiday>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| CalendarError::NotFound("Holiday not found".into()))
    }

    /// Holidays dated within `from..=to`, optionally filtered by a name
    /// fragment, ordered by date.
    pub async fn list_between(
        &self,
        db: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
        search: Option<&str>,
    ) -> Result<Vec<Holiday>, CalendarError> {
        let mut builder = QueryBuilder::<Postgres>::new(Self::base_select_query());
        push_listing_filters(&mut builder, from, to, search);
        builder.push(" ORDER BY holiday_date ASC");

        let rows = builder.build_query_as::<Holiday>().fetch_all(db).await?;
        Ok(rows)
    }

    /// Active holidays within `from..=to`, id and date only.
    pub async fn list_public_between(
        &self,
        db: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
        search: Option<&str>,
    ) -> Result<Vec<PublicHoliday>, CalendarError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT id, holiday_date FROM {}", TABLE_NAME));
        push_listing_filters(&mut builder, from, to, search);
        builder.push(" AND is_active = TRUE ORDER BY holiday_date ASC");

        let rows = builder.build_query_as::<PublicHoliday>().fetch_all(db).await?;
        Ok(rows)
    }

    /// Active and inactive totals for every calendar month with a holiday
    /// in `from..=to`.
    pub async fn month_counts(
        &self,
        db: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthCountRow>, CalendarError> {
        let query = format!(
            "SELECT EXTRACT(YEAR FROM holiday_date)::INT AS year, \
             EXTRACT(MONTH FROM holiday_date)::INT AS month, \
             COUNT(*) FILTER (WHERE is_active) AS active, \
             COUNT(*) FILTER (WHERE NOT is_active) AS inactive \
             FROM {} WHERE holiday_date >= $1 AND holiday_date <= $2 \
             GROUP BY 1, 2 ORDER BY 1, 2",
            TABLE_NAME
        );
        let rows = sqlx::query_as::<_, MonthCountRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    fn base_select_query() -> String {
        format!("SELECT {} FROM {}", SELECT_COLUMNS, TABLE_NAME)
    }
}

fn push_listing_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    from: NaiveDate,
    to: NaiveDate,
    search: Option<&str>,
) {
    builder.push(" WHERE holiday_date >= ");
    builder.push_bind(from);
    builder.push(" AND holiday_date <= ");
    builder.push_bind(to);
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        builder.push(" AND name ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(term)));
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn map_unique_violation(err: sqlx::Error, date: NaiveDate) -> CalendarError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.constraint() == Some(UNIQUE_DATE_CONSTRAINT) =>
        {
            CalendarError::DuplicateDate(date)
        }
        _ => CalendarError::Database(err),
    }
}

#[async_trait]
impl HolidayStore for PgUnitOfWork {
    async fn find_holiday(&mut self, id: HolidayId) -> Result<Option<Holiday>, CalendarError> {
        let query = format!(
            "{} WHERE id = $1 FOR UPDATE",
            HolidayRepository::base_select_query()
        );
        let row = sqlx::query_as::<_, Holiday>(&query)
            .bind(id)
            .fetch_optional(self.conn())
            .await?;
        Ok(row)
    }

    async fn find_holiday_by_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Option<Holiday>, CalendarError> {
        let query = format!(
            "{} WHERE holiday_date = $1",
            HolidayRepository::base_select_query()
        );
        let row = sqlx::query_as::<_, Holiday>(&query)
            .bind(date)
            .fetch_optional(self.conn())
            .await?;
        Ok(row)
    }

    async fn active_holiday_dates(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        let query = format!(
            "SELECT holiday_date FROM {} \
             WHERE is_active = TRUE AND holiday_date >= $1 AND holiday_date <= $2 \
             ORDER BY holiday_date",
            TABLE_NAME
        );
        let dates = sqlx::query_scalar::<_, NaiveDate>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(self.conn())
            .await?;
        Ok(dates)
    }

    async fn holiday_name_exists(
        &mut self,
        name: &str,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<HolidayId>,
    ) -> Result<bool, CalendarError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} \
             WHERE name = $1 AND holiday_date >= $2 AND holiday_date <= $3 \
             AND ($4::TEXT IS NULL OR id <> $4))",
            TABLE_NAME
        );
        let exists = sqlx::query_scalar::<_, bool>(&query)
            .bind(name)
            .bind(from)
            .bind(to)
            .bind(exclude)
            .fetch_one(self.conn())
            .await?;
        Ok(exists)
    }

    async fn insert_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError> {
        let query = format!(
            "INSERT INTO {} (id, name, holiday_date, image_key, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(holiday.id)
            .bind(&holiday.name)
            .bind(holiday.holiday_date)
            .bind(&holiday.image_key)
            .bind(holiday.is_active)
            .bind(holiday.created_at)
            .bind(holiday.updated_at)
            .fetch_one(self.conn())
            .await
            .map_err(|e| map_unique_violation(e, holiday.holiday_date))
    }

    async fn update_holiday(&mut self, holiday: &Holiday) -> Result<Holiday, CalendarError> {
        let query = format!(
            "UPDATE {} SET name = $2, holiday_date = $3, image_key = $4, is_active = $5, \
             updated_at = $6 WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(holiday.id)
            .bind(&holiday.name)
            .bind(holiday.holiday_date)
            .bind(&holiday.image_key)
            .bind(holiday.is_active)
            .bind(holiday.updated_at)
            .fetch_optional(self.conn())
            .await
            .map_err(|e| map_unique_violation(e, holiday.holiday_date))?
            .ok_or_else(|| CalendarError::NotFound("Holiday not found".into()))
    }

    async fn delete_holiday(&mut self, id: HolidayId) -> Result<(), CalendarError> {
        let query = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
        let result = sqlx::query(&query).bind(id).execute(self.conn()).await?;
        if result.rows_affected() == 0 {
            return Err(CalendarError::NotFound("Holiday not found".into()));
        }
        Ok(())
    }

    async fn lock_holiday_date(&mut self, date: NaiveDate) -> Result<(), CalendarError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(holiday_date_lock_key(date))
            .execute(self.conn())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralises_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }
}
