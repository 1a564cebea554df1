//! HTTP response conversion for execution results.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::result::ExecutionResult;

/// Results are always sent with `200 OK`; field errors travel in the
/// `errors` list, as GraphQL over HTTP expects.
impl IntoResponse for ExecutionResult {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
