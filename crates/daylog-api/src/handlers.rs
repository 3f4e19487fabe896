//! HTTP API handlers
//!
//! Request handlers for day records and Slack notifications.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use daylog_core::{Day, Error, month_grid, parse_date_key, parse_month_key};

use crate::error::{ApiError, Result};
use crate::server::AppState;

const DAY_QUERY_USAGE: &str = "Provide ?date=YYYY-MM-DD or ?start=YYYY-MM-DD&end=YYYY-MM-DD";
const DATE_REQUIRED: &str = "date is required";

// ============================================================================
// Request/Response types
// ============================================================================

/// Raw query string pairs
///
/// A repeated key resolves to its first value. Empty values count as absent.
#[derive(Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.trim().is_empty())
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        Ok(Self(pairs))
    }
}

/// Successful notification
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub ok: bool,
    /// Slack message timestamp
    pub ts: String,
    pub date: String,
}

/// Month grid window and the records inside it
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub start: String,
    pub end: String,
    pub days: Vec<Day>,
}

/// Parse a JSON body leniently; anything unparsable becomes `null`
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn body_date(body: &Value) -> Result<String> {
    body.get("date")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidRequest(DATE_REQUIRED.to_string()))
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /day` - one record by `date`, or a range by `start` + `end`
pub async fn get_day(State(state): State<AppState>, query: QueryParams) -> Result<Response> {
    debug!("Day query: {:?}", query);

    if let Some(date) = query.get("date") {
        parse_date_key(&date)?;
        let day = state.repository.get_by_date(&date).await?;
        return Ok(Json(day).into_response());
    }

    match (query.get("start"), query.get("end")) {
        (Some(start), Some(end)) => {
            parse_date_key(&start)?;
            parse_date_key(&end)?;
            let days = state.repository.get_range(&start, &end).await?;
            Ok(Json(days).into_response())
        }
        _ => Err(ApiError::InvalidRequest(DAY_QUERY_USAGE.to_string())),
    }
}

/// `PUT /day` - create or overwrite the record for `date`
///
/// `who` and `lesson` are replaced wholesale; anything that is not a string
/// (including an omitted field) is stored as null.
pub async fn put_day(State(state): State<AppState>, body: Bytes) -> Result<Json<Day>> {
    let body = parse_body(&body);
    let date = body_date(&body)?;
    parse_date_key(&date)?;

    let who = body.get("who").and_then(Value::as_str);
    let lesson = body.get("lesson").and_then(Value::as_str);

    let day = state.repository.upsert(&date, who, lesson).await?;
    Ok(Json(day))
}

/// `GET /slack` - notify for `date`, defaulting to today
pub async fn notify_query(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<NotifyResponse>> {
    let date = query.get("date").unwrap_or_else(|| state.clock.today_key());
    notify_date(&state, date).await
}

/// `POST /slack` - notify for the `date` in the body
pub async fn notify_body(State(state): State<AppState>, body: Bytes) -> Result<Json<NotifyResponse>> {
    let date = body_date(&parse_body(&body))?;
    notify_date(&state, date).await
}

async fn notify_date(state: &AppState, date: String) -> Result<Json<NotifyResponse>> {
    parse_date_key(&date)?;

    let day = state
        .repository
        .get_by_date(&date)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No record for {}", date)))?;

    let receipt = state.notifier.send(&day).await?;

    Ok(Json(NotifyResponse {
        ok: true,
        ts: receipt.ts,
        date,
    }))
}

/// `GET /calendar?month=YYYY-MM` - the six-week grid window and its records
pub async fn calendar(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<CalendarResponse>> {
    let month = query
        .get("month")
        .ok_or_else(|| ApiError::InvalidRequest("Provide ?month=YYYY-MM".to_string()))?;

    let (year, month) = parse_month_key(&month)?;
    let grid = month_grid(year, month)?;
    let days = state.repository.get_range(&grid.start, &grid.end).await?;

    Ok(Json(CalendarResponse {
        month: grid.month,
        start: grid.start,
        end: grid.end,
        days,
    }))
}
