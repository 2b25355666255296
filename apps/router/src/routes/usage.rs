use axum::{extract::State, Json};
use serde_json::{json, Map, Value};

use crate::classify::role::Role;
use crate::state::AppState;

/// GET /
/// Describes the routing endpoint and lists every destination.
pub async fn usage_handler(State(state): State<AppState>) -> Json<Value> {
    let destinations = state.classifier.destinations();
    let roles: Map<String, Value> = Role::ALL
        .iter()
        .map(|role| (role.to_string(), json!(destinations.url_for(*role))))
        .collect();
    let thresholds = state.classifier.thresholds();

    Json(json!({
        "service": "assess-router",
        "usage": {
            "GET /route": "query: title, company, desc, type, debug",
            "POST /route": "JSON body: title, company, desc, type, debug",
            "GET /healthz": "liveness"
        },
        "debug_on_low_confidence": state.config.debug_on_low_confidence,
        "thresholds": thresholds,
        "roles": roles
    }))
}
