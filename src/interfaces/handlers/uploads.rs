use actix_multipart::Multipart;
use actix_web::{delete, post, web, HttpResponse};
use futures_util::TryStreamExt;
use serde::Deserialize;

use crate::{
    errors::AppError,
    use_cases::{
        extractors::AdminClaims,
        uploads::{Bucket, FileKind},
    },
    AppState, AppUploadHandler,
};

fn uploads(state: &AppState) -> Result<&AppUploadHandler, AppError> {
    state
        .uploads
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("File storage is not configured".into()))
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::InvalidInput(format!("Malformed upload: {e}"))
}

/// Multipart upload with `bucket`, optional `kind` and a `file` part.
#[post("")]
#[tracing::instrument(skip_all)]
pub async fn upload_file(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let handler = uploads(&state)?;
    let limit = state.config.max_upload_bytes();

    let mut bucket: Option<Bucket> = None;
    let mut kind = FileKind::Any;
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::InvalidInput(format!(
                    "File exceeds the {} MB limit",
                    state.config.max_upload_mb
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "bucket" => bucket = Some(String::from_utf8_lossy(&bytes).trim().parse()?),
            "kind" => kind = String::from_utf8_lossy(&bytes).trim().parse()?,
            "file" => file = Some((file_name, bytes)),
            _ => {}
        }
    }

    let bucket = bucket.ok_or_else(|| AppError::InvalidInput("Missing bucket".into()))?;
    let (file_name, bytes) = file.ok_or_else(|| AppError::InvalidInput("Missing file".into()))?;

    let uploaded = handler.upload(bucket, kind, file_name.as_deref(), bytes).await?;
    Ok(HttpResponse::Created().json(uploaded))
}

#[derive(Debug, Deserialize)]
pub struct DeleteUpload {
    pub bucket: Bucket,
    pub url: String,
}

#[delete("")]
#[tracing::instrument(skip(_admin, state))]
pub async fn delete_file(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    body: web::Json<DeleteUpload>,
) -> Result<HttpResponse, AppError> {
    uploads(&state)?.delete(body.bucket, &body.url).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "url": null })))
}
