//! Liveness and content store readiness.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{AppState, StoreKind};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreKind,
    pub server_time: DateTime<Utc>,
}

/// GET /api/health
///
/// Reads the published categories as a cheap round trip to the content
/// store. A failing read answers 503 with `status: "degraded"`.
/// `server_time` is the clock every visibility decision is made against.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let reachable = match state.categories.list_published().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(store = ?state.store, error = %e, "Content store unreachable");
            false
        }
    };

    let response = HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: state.store,
        server_time: state.clock.now(),
    };

    if reachable {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
