//! Shared span queries for the dated request tables.
//!
//! Leave and work-from-home requests share the same column layout, so the
//! SQL lives here once and each repository binds its own table name.

use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

use crate::error::CalendarError;
use crate::models::request::DatedRequest;
use crate::types::HalfDays;

pub(crate) const SELECT_COLUMNS: &str = "id, requester_id, request_type, half_day_status, \
     start_date, end_date, duration_half_days, status, return_date, created_at, updated_at";

/// Non-cancelled requests of `table` whose span covers `date`, locked for
/// the rest of the transaction.
pub(crate) async fn find_overlapping<R>(
    conn: &mut PgConnection,
    table: &str,
    date: NaiveDate,
) -> Result<Vec<R>, CalendarError>
where
    R: DatedRequest + for<'r> FromRow<'r, PgRow> + Unpin,
{
    let query = format!(
        "SELECT {} FROM {} \
         WHERE start_date <= $1 AND end_date >= $1 AND status <> 'cancelled' \
         ORDER BY start_date, id FOR UPDATE",
        SELECT_COLUMNS, table
    );
    let rows = sqlx::query_as::<_, R>(&query)
        .bind(date)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub(crate) async fn find_by_return_date<R>(
    conn: &mut PgConnection,
    table: &str,
    date: NaiveDate,
) -> Result<Vec<R>, CalendarError>
where
    R: DatedRequest + for<'r> FromRow<'r, PgRow> + Unpin,
{
    let query = format!(
        "SELECT {} FROM {} \
         WHERE return_date = $1 AND status <> 'cancelled' \
         ORDER BY start_date, id FOR UPDATE",
        SELECT_COLUMNS, table
    );
    let rows = sqlx::query_as::<_, R>(&query)
        .bind(date)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub(crate) async fn update_duration(
    conn: &mut PgConnection,
    table: &str,
    id: String,
    duration: HalfDays,
) -> Result<(), CalendarError> {
    let query = format!(
        "UPDATE {} SET duration_half_days = $2, updated_at = $3 WHERE id = $1",
        table
    );
    let result = sqlx::query(&query)
        .bind(&id)
        .bind(duration)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CalendarError::NotFound(format!("{} {} not found", table, id)));
    }
    Ok(())
}

pub(crate) async fn update_return_date(
    conn: &mut PgConnection,
    table: &str,
    id: String,
    return_date: NaiveDate,
) -> Result<(), CalendarError> {
    let query = format!(
        "UPDATE {} SET return_date = $2, updated_at = $3 WHERE id = $1",
        table
    );
    let result = sqlx::query(&query)
        .bind(&id)
        .bind(return_date)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CalendarError::NotFound(format!("{} {} not found", table, id)));
    }
    Ok(())
}
