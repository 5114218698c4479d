use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::str::FromStr;
use validator::Validate;

use crate::{
    error::AppError,
    models::holiday::{
        CreateHolidayPayload, CurrentMonthHolidaysResponse, HolidayListItem, HolidayListQuery,
        HolidayResponse, UpdateHolidayPayload,
    },
    state::AppState,
    types::HolidayId,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/holidays", get(list_holidays).post(create_holiday))
        .route("/api/holidays/current-month", get(list_current_month))
        .route(
            "/api/holidays/{id}",
            get(get_holiday).put(update_holiday).delete(delete_holiday),
        )
}

fn parse_holiday_id(raw: &str) -> Result<HolidayId, AppError> {
    HolidayId::from_str(raw).map_err(|_| AppError::BadRequest("Invalid holiday ID".into()))
}

pub async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayListQuery>,
) -> Result<Response, AppError> {
    if query.public_access {
        let holidays = state.holiday_service.list_public_holidays(query).await?;
        return Ok(Json(holidays).into_response());
    }

    let holidays = state.holiday_service.list_holidays(query).await?;
    Ok(Json(
        holidays
            .into_iter()
            .map(HolidayListItem::from)
            .collect::<Vec<_>>(),
    )
    .into_response())
}

pub async fn list_current_month(
    State(state): State<AppState>,
) -> Result<Json<CurrentMonthHolidaysResponse>, AppError> {
    let holidays = state.holiday_service.list_current_month().await?;
    Ok(Json(CurrentMonthHolidaysResponse::from(holidays)))
}

pub async fn create_holiday(
    State(state): State<AppState>,
    Json(payload): Json<CreateHolidayPayload>,
) -> Result<(StatusCode, Json<HolidayResponse>), AppError> {
    payload.validate()?;

    let created = state.holiday_service.create_holiday(payload).await?;
    Ok((StatusCode::CREATED, Json(HolidayResponse::from(created))))
}

pub async fn get_holiday(
    State(state): State<AppState>,
    Path(holiday_id): Path<String>,
) -> Result<Json<HolidayResponse>, AppError> {
    let id = parse_holiday_id(&holiday_id)?;
    let holiday = state.holiday_service.get_holiday(id).await?;
    Ok(Json(HolidayResponse::from(holiday)))
}

pub async fn update_holiday(
    State(state): State<AppState>,
    Path(holiday_id): Path<String>,
    Json(payload): Json<UpdateHolidayPayload>,
) -> Result<Json<HolidayResponse>, AppError> {
    let id = parse_holiday_id(&holiday_id)?;
    payload.validate()?;

    let updated = state.holiday_service.update_holiday(id, payload).await?;
    Ok(Json(HolidayResponse::from(updated)))
}

pub async fn delete_holiday(
    State(state): State<AppState>,
    Path(holiday_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_holiday_id(&holiday_id)?;
    state.holiday_service.delete_holiday(id).await?;

    Ok(Json(json!({"message": "Holiday deleted", "id": holiday_id})))
}
