use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// Answer to a destructive request that arrived without `?confirm=true`.
pub fn confirmation_required() -> HttpResponse {
    json_error(
        StatusCode::PRECONDITION_REQUIRED,
        "Confirmation required",
        "Repeat the request with ?confirm=true to delete",
    )
}
