//! Checkout and report handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{errmsg, ApiError, AppState};
use crate::models::{CheckoutRequest, Report, Transaction};
use crate::validation::parse_date;

pub(super) async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(request) = payload?;
    let transaction = state.checkout.checkout(&request.items).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub(super) async fn report_today(State(state): State<AppState>) -> Result<Json<Report>, ApiError> {
    Ok(Json(state.reports.today().await?))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ReportQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

pub(super) async fn report_by_date(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Report>, ApiError> {
    let Query(query) = query?;
    let start = match query.start_date.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::bad_request(errmsg::START_DATE_REQUIRED)),
        Some(raw) => parse_date(raw, "start_date")?,
    };
    let end = match query.end_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_date(raw, "end_date")?),
    };
    if end.is_some_and(|end| end < start) {
        return Err(ApiError::bad_request(errmsg::END_BEFORE_START));
    }

    Ok(Json(state.reports.generate(start, end).await?))
}
