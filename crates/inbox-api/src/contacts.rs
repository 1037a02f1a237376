use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request, State, rejection::QueryRejection},
    http::header,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, error, info, warn};

use inbox_db::models::ContactRow;
use inbox_types::api::{
    ContactRequest, ContactResponse, ContactStats, ContactsQuery, ContactsResponse,
    HealthResponse, StatsResponse, SubmitResponse,
};

use crate::AppState;
use crate::error::ApiError;

const MAX_LIST_LIMIT: u32 = 1000;

/// A submission body in either JSON or `application/x-www-form-urlencoded`,
/// picked by content type.
pub struct ContactBody(pub ContactRequest);

impl<S> FromRequest<S> for ContactBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            Form::<ContactRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.to_string())
        } else {
            Json::<ContactRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.to_string())
        };

        body.map(Self).map_err(|e| {
            debug!("Rejected contact body: {}", e);
            ApiError::MalformedBody
        })
    }
}

pub async fn submit_contact(
    State(state): State<AppState>,
    ContactBody(req): ContactBody,
) -> Result<Json<SubmitResponse>, ApiError> {
    let id = store_submission(&state, &req).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Message sent successfully".into(),
        id,
    }))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<ContactsQuery>, QueryRejection>,
) -> Result<Json<ContactsResponse>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::MalformedBody)?;
    let limit = query.limit.map(|l| l.min(MAX_LIST_LIMIT));

    // Run blocking DB query off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_contacts(limit))
        .await
        .map_err(join_error)??;

    let contacts = rows.into_iter().map(to_response).collect();

    Ok(Json(ContactsResponse {
        success: true,
        contacts,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let db = state.clone();
    let stats = tokio::task::spawn_blocking(move || db.db.contact_stats())
        .await
        .map_err(join_error)??;

    Ok(Json(StatsResponse {
        success: true,
        stats: ContactStats {
            total_contacts: stats.total,
            today_contacts: stats.today,
            week_contacts: stats.week,
        },
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".into(),
        timestamp: Utc::now(),
    })
}

pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

/// Validate and persist one submission. Shared by the JSON endpoint and the
/// HTML form handler.
pub(crate) async fn store_submission(state: &AppState, req: &ContactRequest) -> Result<i64, ApiError> {
    let contact = state.rules.validate(req, Utc::now())?;

    let db = state.clone();
    let id = tokio::task::spawn_blocking(move || db.db.insert_contact(&contact))
        .await
        .map_err(join_error)??;

    info!("New contact saved with id {}", id);
    Ok(id)
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError::Persistence(anyhow::anyhow!("spawn_blocking join error: {}", e))
}

fn to_response(row: ContactRow) -> ContactResponse {
    let created_at = parse_sqlite_datetime(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on contact {}", row.created_at, row.id);
        DateTime::default()
    });

    ContactResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        subject: row.subject,
        message: row.message,
        phone: row.phone,
        interest: row.interest,
        timestamp: row.timestamp,
        created_at,
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC, accepting RFC 3339 as well.
fn parse_sqlite_datetime(value: &str) -> Option<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}
