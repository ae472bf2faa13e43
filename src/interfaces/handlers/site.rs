use actix_web::{get, web, HttpResponse};

use crate::{entities::bilingual::Locale, errors::AppError, AppState};

#[get("/{locale}")]
#[tracing::instrument(skip(state))]
pub async fn site_home(state: web::Data<AppState>, locale: web::Path<String>) -> Result<HttpResponse, AppError> {
    let locale: Locale = locale.parse()?;
    let home = state.showcase.home(locale).await?;
    Ok(HttpResponse::Ok().json(home))
}

#[get("/{locale}/projects")]
#[tracing::instrument(skip(state))]
pub async fn site_projects(state: web::Data<AppState>, locale: web::Path<String>) -> Result<HttpResponse, AppError> {
    let locale: Locale = locale.parse()?;
    let page = state.showcase.projects(locale).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{locale}/certifications")]
#[tracing::instrument(skip(state))]
pub async fn site_certifications(state: web::Data<AppState>, locale: web::Path<String>) -> Result<HttpResponse, AppError> {
    let locale: Locale = locale.parse()?;
    let page = state.showcase.certifications(locale).await?;
    Ok(HttpResponse::Ok().json(page))
}
