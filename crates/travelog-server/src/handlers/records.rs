//! Record handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use travelog_core::{record::is_record_id, Attachment, NewRecord, Record, TravelogError};

const LIST_FAILED: &str = "failed to fetch records";
const CREATE_FAILED: &str = "failed to create record";
const DELETE_FAILED: &str = "failed to delete record";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .records
        .list_all()
        .await
        .map_err(|e| ApiError::from_core(e, LIST_FAILED))?;
    Ok(Json(records))
}

/// Parsed multipart upload
#[derive(Default)]
struct RecordForm {
    location: Option<String>,
    date: Option<String>,
    image: Option<Attachment>,
    video: Option<Attachment>,
}

pub async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Record>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload: {}", e);
        ApiError::bad_request("expected a multipart form")
    })?;

    let form = read_form(multipart, state.max_attachment_bytes).await?;

    let (location, date) = match (form.location, form.date) {
        (Some(location), Some(date)) if !location.is_empty() && !date.is_empty() => {
            (location, date)
        }
        _ => return Err(ApiError::bad_request("location and date are required")),
    };

    let input = NewRecord {
        location,
        date,
        image: form.image,
        video: form.video,
    };

    let record = state
        .records
        .create(input)
        .await
        .map_err(|e| ApiError::from_core(e, CREATE_FAILED))?;
    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
    message: String,
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !is_record_id(&id) {
        return Err(ApiError::bad_request("invalid record id"));
    }

    state
        .records
        .delete_by_id(&id)
        .await
        .map_err(|e| ApiError::from_core(e, DELETE_FAILED))?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "record deleted".to_string(),
    }))
}

/// `DELETE /api/records` carries no id at all
pub async fn delete_without_id() -> ApiError {
    ApiError::bad_request("invalid record id")
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn read_form(mut multipart: Multipart, limit: usize) -> Result<RecordForm, ApiError> {
    let mut form = RecordForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "location" => form.location = Some(field.text().await.map_err(multipart_error)?),
            "date" => form.date = Some(field.text().await.map_err(multipart_error)?),
            "image" => form.image = read_attachment(&mut field, limit).await?,
            "video" => form.video = read_attachment(&mut field, limit).await?,
            other => tracing::debug!("Ignoring form field: {}", other),
        }
    }

    Ok(form)
}

/// Buffer a file part, enforcing `limit` before anything is encoded.
///
/// Plain text parts and empty parts without a file name ("no file chosen")
/// count as no attachment.
async fn read_attachment(
    field: &mut Field<'_>,
    limit: usize,
) -> Result<Option<Attachment>, ApiError> {
    let Some(file_name) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };
    let content_type = field.content_type().map(str::to_string);

    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > limit {
            return Err(ApiError::from_core(
                TravelogError::AttachmentTooLarge { limit },
                CREATE_FAILED,
            ));
        }
        buf.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && buf.is_empty() {
        return Ok(None);
    }

    Ok(Some(Attachment::new(content_type.as_deref(), buf)))
}

fn multipart_error(e: MultipartError) -> ApiError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bad_request("request body too large")
    } else if status.is_client_error() {
        tracing::debug!("Malformed upload: {}", e);
        ApiError::bad_request("invalid form data")
    } else {
        ApiError::internal(CREATE_FAILED, e)
    }
}
