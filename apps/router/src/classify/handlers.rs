//! Axum route handlers for the routing endpoint.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::classifier::{Classification, ClassificationInput};
use crate::config::parse_flag;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// GET parameters. A repeated key keeps its last value; unknown keys are ignored.
#[derive(Debug, Default)]
pub struct RouteQuery {
    pub title: Option<String>,
    pub company: Option<String>,
    pub desc: Option<String>,
    pub job_type: Option<String>,
    pub debug: Option<String>,
}

impl RouteQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = RouteQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut query.title,
                "company" => &mut query.company,
                "desc" => &mut query.desc,
                "type" => &mut query.job_type,
                "debug" => &mut query.debug,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}

/// POST body. `debug` may arrive as a bool, a number or a string.
#[derive(Debug, Default, Deserialize)]
pub struct RouteBody {
    pub title: Option<String>,
    pub company: Option<String>,
    pub desc: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub debug: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RouteDebugResponse {
    #[serde(flatten)]
    pub classification: Classification,
    /// The raw `type` parameter as received.
    pub type_value: String,
}

struct RouteRequest {
    input: ClassificationInput,
    type_value: String,
    debug: bool,
}

impl From<RouteQuery> for RouteRequest {
    fn from(q: RouteQuery) -> Self {
        let debug = q.debug.as_deref().and_then(parse_flag).unwrap_or(false);
        RouteRequest::new(q.title, q.company, q.desc, q.job_type, debug)
    }
}

impl From<RouteBody> for RouteRequest {
    fn from(b: RouteBody) -> Self {
        let debug = b.debug.as_ref().is_some_and(is_truthy);
        RouteRequest::new(b.title, b.company, b.desc, b.job_type, debug)
    }
}

impl RouteRequest {
    fn new(
        title: Option<String>,
        company: Option<String>,
        desc: Option<String>,
        job_type: Option<String>,
        debug: bool,
    ) -> Self {
        RouteRequest {
            type_value: job_type.clone().unwrap_or_default(),
            input: ClassificationInput {
                title: title.unwrap_or_default(),
                company: company.unwrap_or_default(),
                description: desc.unwrap_or_default(),
                type_label: job_type,
            },
            debug,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => parse_flag(s).unwrap_or(false),
        _ => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /route?title=&company=&desc=&type=&debug=
///
/// Redirects (302) to the course page for the listing, or returns the
/// classification as JSON when `debug` is set.
pub async fn handle_route_get(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    respond(&state, RouteQuery::from_pairs(pairs).into())
}

/// POST /route
///
/// Same as GET, with the fields in a JSON body.
pub async fn handle_route_post(
    State(state): State<AppState>,
    body: Result<Json<RouteBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    respond(&state, body.into())
}

fn respond(state: &AppState, request: RouteRequest) -> Result<Response, AppError> {
    let classification = state.classifier.classify(&request.input);

    let show_debug =
        request.debug || (state.config.debug_on_low_confidence && !classification.confident);
    if show_debug {
        return Ok(Json(RouteDebugResponse {
            classification,
            type_value: request.type_value,
        })
        .into_response());
    }

    let location = HeaderValue::try_from(classification.url.as_str()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "destination '{}' is not a valid Location header: {e}",
            classification.url
        ))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
