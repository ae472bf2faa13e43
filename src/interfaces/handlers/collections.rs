//! Admin endpoints shared by every ordered collection. Each request runs one
//! editor session: load, act, reload. Routes instantiate these per entry type.

use actix_web::{web, HttpResponse};

use crate::{
    entities::entry::{Entry, EntryFlag},
    errors::AppError,
    handlers::json_error::confirmation_required,
    use_cases::{
        editor::Confirmation,
        extractors::{AdminClaims, Confirm, Scope},
        reorder::DragMove,
    },
    utils::valid_uuid::valid_uuid,
    AppCollection, AppState, CollectionState,
};

fn collection<E>(state: &AppState) -> &AppCollection<E>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    <AppState as CollectionState<E>>::collection(state)
}

#[tracing::instrument(skip(_admin, state), fields(collection = E::KIND.slug()))]
pub async fn list_entries<E>(_admin: AdminClaims, state: web::Data<AppState>, scope: Scope) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let entries = collection::<E>(&state).list(scope.0).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[tracing::instrument(skip(_admin, state), fields(collection = E::KIND.slug()))]
pub async fn new_draft<E>(_admin: AdminClaims, state: web::Data<AppState>, scope: Scope) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let reply = collection::<E>(&state).draft(scope.0).await?;
    Ok(HttpResponse::Ok().json(reply))
}

#[tracing::instrument(skip(_admin, state, entry), fields(collection = E::KIND.slug()))]
pub async fn save_entry<E>(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    scope: Scope,
    entry: web::Json<E>,
) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let entry = entry.into_inner();
    let created = entry.id().is_none();

    let reply = collection::<E>(&state).save(scope.0, entry).await?;
    if created {
        Ok(HttpResponse::Created().json(reply))
    } else {
        Ok(HttpResponse::Ok().json(reply))
    }
}

#[tracing::instrument(skip(_admin, state), fields(collection = E::KIND.slug()))]
pub async fn reorder_entries<E>(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    scope: Scope,
    drag: web::Json<DragMove>,
) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let reply = collection::<E>(&state).reorder(scope.0, drag.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reply))
}

#[tracing::instrument(skip(_admin, state), fields(collection = E::KIND.slug()))]
pub async fn delete_entry<E>(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    scope: Scope,
    confirm: Confirm,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let id = valid_uuid(&path.into_inner())?;
    if confirm.0 == Confirmation::Declined {
        return Ok(confirmation_required());
    }

    let reply = collection::<E>(&state).delete(scope.0, id, confirm.0).await?;
    Ok(HttpResponse::Ok().json(reply))
}

async fn toggle<E>(state: &AppState, scope: Scope, raw_id: String, flag: EntryFlag) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    let id = valid_uuid(&raw_id)?;
    let reply = collection::<E>(state).toggle(scope.0, id, flag).await?;
    Ok(HttpResponse::Ok().json(reply))
}

pub async fn toggle_visibility<E>(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    scope: Scope,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    toggle::<E>(&state, scope, path.into_inner(), EntryFlag::Visible).await
}

pub async fn toggle_featured<E>(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    scope: Scope,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
    E: Entry,
    AppState: CollectionState<E>,
{
    toggle::<E>(&state, scope, path.into_inner(), EntryFlag::Featured).await
}
