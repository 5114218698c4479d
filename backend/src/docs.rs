#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    holiday::{
        CreateHolidayPayload, CurrentMonthHolidaysResponse, HolidayListItem, HolidayListQuery,
        HolidayMonthCount, HolidayResponse, PublicHoliday, UpdateHolidayPayload,
    },
    request::{HalfDayStatus, RequestStatus, RequestType},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_holidays_doc,
        create_holiday_doc,
        current_month_holidays_doc,
        get_holiday_doc,
        update_holiday_doc,
        delete_holiday_doc
    ),
    components(
        schemas(
            // holidays
            CreateHolidayPayload,
            UpdateHolidayPayload,
            HolidayResponse,
            HolidayListItem,
            HolidayMonthCount,
            PublicHoliday,
            CurrentMonthHolidaysResponse,
            // request vocabulary
            RequestStatus,
            RequestType,
            HalfDayStatus
        )
    ),
    tags(
        (name = "Holidays", description = "Company holiday calendar; writes re-balance leave and work-from-home requests")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayListQuery),
    responses(
        (status = 200, description = "Holidays in the requested financial-year range with their month's totals; `[PublicHoliday]` when `public_access=true`", body = [HolidayListItem]),
        (status = 400, description = "Company settings missing or year range invalid")
    ),
    tag = "Holidays"
)]
fn list_holidays_doc() {}

#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = CreateHolidayPayload,
    responses(
        (status = 201, description = "Holiday created and requests adjusted", body = HolidayResponse),
        (status = 400, description = "Validation failed or date is a weekly off day"),
        (status = 409, description = "Name or date already taken")
    ),
    tag = "Holidays"
)]
fn create_holiday_doc() {}

#[utoipa::path(
    get,
    path = "/api/holidays/current-month",
    responses((status = 200, description = "Holidays in the current month", body = CurrentMonthHolidaysResponse)),
    tag = "Holidays"
)]
fn current_month_holidays_doc() {}

#[utoipa::path(
    get,
    path = "/api/holidays/{id}",
    params(("id" = String, Path, description = "Holiday ID")),
    responses(
        (status = 200, body = HolidayResponse),
        (status = 404, description = "Holiday not found")
    ),
    tag = "Holidays"
)]
fn get_holiday_doc() {}

#[utoipa::path(
    put,
    path = "/api/holidays/{id}",
    params(("id" = String, Path, description = "Holiday ID")),
    request_body = UpdateHolidayPayload,
    responses(
        (status = 200, description = "Holiday updated and requests adjusted", body = HolidayResponse),
        (status = 400, description = "Validation failed, past date or weekly off day"),
        (status = 404, description = "Holiday not found"),
        (status = 409, description = "Name or date already taken")
    ),
    tag = "Holidays"
)]
fn update_holiday_doc() {}

#[utoipa::path(
    delete,
    path = "/api/holidays/{id}",
    params(("id" = String, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday deleted"),
        (status = 400, description = "Holiday is today or in the past"),
        (status = 404, description = "Holiday not found")
    ),
    tag = "Holidays"
)]
fn delete_holiday_doc() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_holiday_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/holidays",
            "/api/holidays/current-month",
            "/api/holidays/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
