//! Reading the uploaded PDF from a request.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::error::AppError;

/// Multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// Whether the request declares a raw PDF body.
pub fn is_raw_pdf(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/pdf"))
}

/// Extract the PDF bytes: the raw body for `application/pdf`, otherwise the
/// multipart field named `file`.
pub async fn read_pdf<S>(request: Request, state: &S, limit: usize) -> Result<Bytes, AppError>
where
    S: Send + Sync,
{
    let bytes = if is_raw_pdf(&request) {
        axum::body::to_bytes(request.into_body(), limit)
            .await
            .map_err(|e| AppError::Body(e.to_string()))?
    } else {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|_| AppError::NoPdf)?;
        let mut data = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Body(e.to_string()))?
        {
            if field.name() == Some(FILE_FIELD) {
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Body(e.to_string()))?,
                );
                break;
            }
        }
        data.ok_or(AppError::NoPdf)?
    };

    if bytes.is_empty() {
        return Err(AppError::EmptyBody);
    }
    Ok(bytes)
}
