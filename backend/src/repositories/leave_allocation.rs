//! Leave allocation repository.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::CalendarError;
use crate::models::leave_request::{AllocationBalances, LeaveAllocation};
use crate::repositories::repository::LeaveAllocationStore;
use crate::repositories::transaction::PgUnitOfWork;
use crate::types::{LeaveAllocationId, UserId};

const TABLE_NAME: &str = "leave_allocations";
const SELECT_COLUMNS: &str =
    "id, user_id, remaining_half_days, used_half_days, exceed_half_days, is_active";

#[async_trait]
impl LeaveAllocationStore for PgUnitOfWork {
    async fn find_active_allocation(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<LeaveAllocation>, CalendarError> {
        let query = format!(
            "SELECT {} FROM {} WHERE user_id = $1 AND is_active = TRUE \
             ORDER BY created_at ASC LIMIT 1 FOR UPDATE",
            SELECT_COLUMNS, TABLE_NAME
        );
        let row = sqlx::query_as::<_, LeaveAllocation>(&query)
            .bind(user_id)
            .fetch_optional(self.conn())
            .await?;
        Ok(row)
    }

    async fn update_allocation_balances(
        &mut self,
        id: LeaveAllocationId,
        balances: AllocationBalances,
    ) -> Result<(), CalendarError> {
        let query = format!(
            "UPDATE {} SET remaining_half_days = $2, used_half_days = $3, \
             exceed_half_days = $4, updated_at = $5 WHERE id = $1",
            TABLE_NAME
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(balances.remaining_leave)
            .bind(balances.used_leave)
            .bind(balances.exceed_leave)
            .bind(Utc::now())
            .execute(self.conn())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CalendarError::NotFound(format!(
                "Leave allocation {} not found",
                id
            )));
        }
        Ok(())
    }
}
