use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    web, Error,
};

use crate::handlers::json_error::json_error;

/// Extractor failures answer with the same JSON error shape as handlers.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| json_payload_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| query_error(err)));
}

fn json_payload_error(err: JsonPayloadError) -> Error {
    let status = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    let response = json_error(status, "JSON payload error", &err.to_string());
    InternalError::from_response(err, response).into()
}

fn query_error(err: QueryPayloadError) -> Error {
    let response = json_error(StatusCode::BAD_REQUEST, "Invalid query string", &err.to_string());
    InternalError::from_response(err, response).into()
}
