//! Service banner and liveness endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

const SERVICE: &str = "poseidon";

#[derive(Debug, Serialize)]
pub struct Banner {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Handler for `GET /`
pub async fn banner() -> Json<Banner> {
    Json(Banner {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Handler for `GET /health`
pub async fn get_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime().as_secs(),
    })
}
