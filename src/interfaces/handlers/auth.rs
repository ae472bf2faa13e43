use actix_web::{get, post, web, HttpResponse, Responder, ResponseError};

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{LoginUser, LogoutRequest, NewUser};
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

#[post("/refresh-token")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> impl Responder {
    match state.auth_handler.refresh_token(&request.refresh_token).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

/// Revokes the caller's access token and, when supplied, its refresh token.
#[post("/logout")]
pub async fn logout(
    claims: AuthClaims,
    state: web::Data<AppState>,
    body: Option<web::Json<LogoutRequest>>,
) -> impl Responder {
    let refresh = body.and_then(|b| b.into_inner().refresh_token);

    match state.auth_handler.logout(&claims.0, refresh.as_deref()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})),
        Err(e) => e.error_response(),
    }
}

#[get("/me")]
pub async fn me(claims: AuthClaims, state: web::Data<AppState>) -> impl Responder {
    match state.auth_handler.current_user(&claims.0).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.to_http_response(),
    }
}
