use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use dormant_derive::api_handler;
use dormant_domain::constants::SCANNER_TAG;
use dormant_kernel::server::{ApiError, ApiState, ErrorBody};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::model::{InactiveObjectsRequest, InactiveObjectsResponse};
use crate::pipeline::Pipeline;

/// Routes of the scanner slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(inactive_objects_get, inactive_objects_post))
}

#[api_handler(
    get,
    path = "/api/inactive-objects",
    params(
        ("token" = String, Query, description = "Encrypted (or, if allowed, plain) bearer token"),
        ("instance_url" = String, Query, description = "Org base URL"),
        ("days" = Option<u32>, Query, description = "Activity window in days"),
        ("encrypted" = Option<bool>, Query, description = "Whether `token` is encrypted"),
    ),
    responses(
        (status = OK, description = "Inactive custom objects", body = InactiveObjectsResponse),
        (status = BAD_REQUEST, description = "Missing or invalid parameter", body = ErrorBody),
        (status = UNAUTHORIZED, description = "Token could not be turned into a credential", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Listing failed or scan timed out", body = ErrorBody),
    ),
    tag = SCANNER_TAG,
)]
pub(crate) async fn inactive_objects_get(
    State(state): State<ApiState>,
    query: Result<Query<InactiveObjectsRequest>, QueryRejection>,
) -> Result<Json<InactiveObjectsResponse>, ApiError> {
    let Query(request) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    scan(&state, &request).await
}

#[api_handler(
    post,
    path = "/api/inactive-objects",
    request_body = InactiveObjectsRequest,
    responses(
        (status = OK, description = "Inactive custom objects", body = InactiveObjectsResponse),
        (status = BAD_REQUEST, description = "Missing or invalid parameter", body = ErrorBody),
        (status = UNAUTHORIZED, description = "Token could not be turned into a credential", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Listing failed or scan timed out", body = ErrorBody),
    ),
    tag = SCANNER_TAG,
)]
pub(crate) async fn inactive_objects_post(
    State(state): State<ApiState>,
    body: Result<Json<InactiveObjectsRequest>, JsonRejection>,
) -> Result<Json<InactiveObjectsResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    scan(&state, &request).await
}

async fn scan(
    state: &ApiState,
    request: &InactiveObjectsRequest,
) -> Result<Json<InactiveObjectsResponse>, ApiError> {
    let pipeline = Pipeline::try_from(state)?;
    let result = pipeline.run(request).await?;
    Ok(Json(result.into()))
}
