use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use dormant_derive::{api_handler, api_model};
use dormant_domain::config::ApiConfig;
use dormant_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;


#[api_model]
/// Liveness report
struct HealthResponse {
    /// Always `up` while the process serves requests
    status: String,
    /// Service version
    version: String,
    /// Uptime in seconds
    uptime: u64,
    /// Salesforce REST API version used for outbound calls
    crm_api_version: String,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(config): State<ApiConfig>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: START_TIME.elapsed().as_secs(),
        crm_api_version: config.crm.api_version.clone(),
    };

    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}

/// Starts the uptime clock; call once at boot.
pub(crate) fn mark_started() {
    LazyLock::force(&START_TIME);
}
