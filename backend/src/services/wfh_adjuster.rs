//! Work-from-home duration pass. No quota is attached to these requests, so
//! only the duration moves.

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::models::work_from_home::WorkFromHomeRequest;
use crate::repositories::repository::RequestSpanStore;
use crate::services::propagation::HolidayChange;

pub(crate) async fn adjust_wfh_durations<S>(
    store: &mut S,
    date: NaiveDate,
    change: HolidayChange,
) -> Result<usize, CalendarError>
where
    S: RequestSpanStore<WorkFromHomeRequest> + ?Sized,
{
    let requests = store.find_overlapping(date).await?;
    let mut adjusted = 0;

    for request in requests {
        let duration = change.apply(request.duration, request.request_type.daily_unit());
        store.update_duration(request.id, duration).await?;
        adjusted += 1;
        tracing::debug!(
            work_from_home_id = %request.id,
            from = %request.duration,
            to = %duration,
            "Adjusted work-from-home duration"
        );
    }

    Ok(adjusted)
}
