use actix_web::{get, put, web, HttpResponse};

use crate::{
    entities::{about::About, profile::Profile},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[get("/profile")]
pub async fn get_profile(_admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let profile = state.content.profile().await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
#[tracing::instrument(skip_all)]
pub async fn save_profile(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    profile: web::Json<Profile>,
) -> Result<HttpResponse, AppError> {
    let saved = state.content.save_profile(profile.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}

#[get("/about")]
pub async fn get_about(_admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let about = state.content.about().await?;
    Ok(HttpResponse::Ok().json(about))
}

#[put("/about")]
#[tracing::instrument(skip_all)]
pub async fn save_about(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    about: web::Json<About>,
) -> Result<HttpResponse, AppError> {
    let saved = state.content.save_about(about.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}
