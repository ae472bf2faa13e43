use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    entities::contact_me::{ContactMeForm, MessageQuery},
    errors::{AppError, ContactError},
    handlers::json_error::confirmation_required,
    use_cases::{
        editor::Confirmation,
        extractors::{AdminClaims, Confirm},
    },
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[post("/contact")]
#[tracing::instrument(skip(state, form))]
pub async fn submit_contact_form(
    state: web::Data<AppState>,
    form: web::Json<ContactMeForm>,
) -> Result<HttpResponse, ContactError> {
    let response = state.contact_handler.submit(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("")]
#[tracing::instrument(skip(_admin, state))]
pub async fn list_messages(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<MessageQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = state.contact_handler.list_contact_messages(query.filter).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[get("/{id}")]
pub async fn get_message(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&path)?;
    let message = state.contact_handler.get_contact_message_by_id(id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[post("/{id}/read")]
pub async fn toggle_message_read(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&path)?;
    let message = state.contact_handler.toggle_read(id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[delete("/{id}")]
pub async fn delete_message(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    confirm: Confirm,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&path)?;
    if confirm.0 == Confirmation::Declined {
        return Ok(confirmation_required());
    }

    let outcome = state.contact_handler.delete_contact_message(id, confirm.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": outcome })))
}
