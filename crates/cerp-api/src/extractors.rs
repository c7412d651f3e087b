//! # Request Extraction Helpers
//!
//! Maps axum body rejections to [`AppError::BadRequest`] so every client
//! error carries the same JSON error body. [`ContractUpload`] reads a
//! contract document sent either as a `multipart/form-data` upload (field
//! `file`) or as a plain-text body.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, StringRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::Json;

use crate::error::AppError;

/// Multipart field carrying the contract document.
pub const UPLOAD_FIELD: &str = "file";

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a UTF-8 text body that is not blank.
pub fn extract_text(result: Result<String, StringRejection>) -> Result<String, AppError> {
    let text = result.map_err(|err| AppError::BadRequest(err.body_text()))?;
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("contract text must not be empty".into()));
    }
    Ok(text)
}

/// A contract document received by `/analyze-contract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractUpload {
    /// File name from the multipart part header, if any.
    pub filename: Option<String>,
    /// Document text, never blank.
    pub text: String,
}

impl<S: Send + Sync> FromRequest<S> for ContractUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            read_upload(multipart).await
        } else {
            let text = extract_text(String::from_request(req, state).await)?;
            Ok(Self {
                filename: None,
                text,
            })
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Take the first `file` part; other parts are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<ContractUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::BadRequest("uploaded file must be UTF-8 text".into())
        })?;
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("uploaded file is empty".into()));
        }
        return Ok(ContractUpload { filename, text });
    }
    Err(AppError::BadRequest(format!(
        "multipart body has no \"{UPLOAD_FIELD}\" field"
    )))
}
