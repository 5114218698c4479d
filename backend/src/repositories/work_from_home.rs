//! Work-from-home request repository.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::work_from_home::WorkFromHomeRequest;
use crate::repositories::repository::RequestSpanStore;
use crate::repositories::request_span;
use crate::repositories::transaction::PgUnitOfWork;
use crate::types::{HalfDays, WorkFromHomeId};

const TABLE_NAME: &str = "work_from_home_requests";

#[async_trait]
impl RequestSpanStore<WorkFromHomeRequest> for PgUnitOfWork {
    async fn find_overlapping(
        &mut self,
        date: NaiveDate,
    ) -> Result<Vec<WorkFromHomeRequest>, CalendarError> {
        request_span::find_overlapping(self.conn(), TABLE_NAME, date).await
    }

    async fn find_by_return_date(
        &mut self,
        date: NaiveDate,
    ) -> Result<Vec<WorkFromHomeRequest>, CalendarError> {
        request_span::find_by_return_date(self.conn(), TABLE_NAME, date).await
    }

    async fn update_duration(
        &mut self,
        id: WorkFromHomeId,
        duration: HalfDays,
    ) -> Result<(), CalendarError> {
        request_span::update_duration(self.conn(), TABLE_NAME, id.into(), duration).await
    }

    async fn update_return_date(
        &mut self,
        id: WorkFromHomeId,
        return_date: NaiveDate,
    ) -> Result<(), CalendarError> {
        request_span::update_return_date(self.conn(), TABLE_NAME, id.into(), return_date).await
    }
}
