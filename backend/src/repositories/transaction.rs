//! Transaction management for holiday mutations.

use chrono::{Datelike, NaiveDate};
use sqlx::postgres::PgTransaction;
use sqlx::{PgConnection, PgPool};

use crate::error::CalendarError;

/// Holds one SERIALIZABLE transaction. All storage ports are implemented on it,
/// so a holiday write and every adjustment it triggers commit or roll back
/// together.
pub struct PgUnitOfWork {
    tx: PgTransaction<'static>,
}

impl PgUnitOfWork {
    /// Begin a new unit of work.
    pub async fn begin(db: &PgPool) -> Result<Self, CalendarError> {
        let mut tx = db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(Self { tx })
    }

    /// Commit all changes made within the unit of work.
    pub async fn commit(self) -> Result<(), CalendarError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Undo all changes made within the unit of work.
    pub async fn rollback(self) -> Result<(), CalendarError> {
        self.tx.rollback().await?;
        Ok(())
    }

    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }
}

/// Advisory lock key for a holiday date.
pub(crate) fn holiday_date_lock_key(date: NaiveDate) -> i64 {
    const NAMESPACE: i64 = 0x484f_4c49 << 32;
    NAMESPACE | i64::from(date.num_days_from_ce())
}
