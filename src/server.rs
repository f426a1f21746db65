//! HTTP layer: thin plumbing around the generation pipeline.
//!
//! Serves the upload form, accepts the multipart generate request, and
//! answers health checks. All pipeline failures map to structured JSON
//! errors with distinct codes so callers can tell an oversized payload
//! from a bad color from an undecodable logo.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::Error;
use crate::pipeline;
use crate::qrcode::Ecc;
use crate::render::{Color, RenderOptions};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
}

/// Builds the application router.
pub fn build_router(settings: Settings) -> Router {
    let body_limit = settings.max_upload_bytes;
    Router::new()
        .route("/", get(form_page).post(generate))
        .route("/health", get(health).post(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(AppState { settings })
}

async fn form_page() -> Html<&'static str> {
    Html(include_str!("../templates/upload.html"))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// The parsed multipart form. Field names and defaults match the original
/// service: box_size 10, border 4, black on white, level H.
struct GenerateForm {
    link: String,
    module_size: u32,
    border: u32,
    fill: Color,
    back: Color,
    ecc: Ecc,
    logo: Option<(String, Vec<u8>)>,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            link: String::new(),
            module_size: 10,
            border: 4,
            fill: Color::BLACK,
            back: Color::WHITE,
            ecc: Ecc::High,
            logo: None,
        }
    }
}

async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "link" => form.link = text_field(&name, field).await?,
            "box_size" => {
                form.module_size = numeric_field(&name, field, form.module_size).await?;
            }
            "border" => form.border = numeric_field(&name, field, form.border).await?,
            "fill_color" => {
                let text = text_field(&name, field).await?;
                if !text.is_empty() {
                    form.fill = Color::parse(&text).map_err(Error::Render)?;
                }
            }
            "back_color" => {
                let text = text_field(&name, field).await?;
                if !text.is_empty() {
                    form.back = Color::parse(&text).map_err(Error::Render)?;
                }
            }
            "error_correction" => {
                form.ecc = Ecc::from_code(&text_field(&name, field).await?);
            }
            "logo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read logo: {e}")))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.logo = Some((file_name, bytes.to_vec()));
                }
            }
            // Unknown fields are ignored, like any HTML form handler.
            _ => {}
        }
    }

    let options = RenderOptions {
        module_size: form.module_size,
        border: form.border,
        fill: form.fill,
        back: form.back,
        logo_scale: None,
    };
    let logo_bytes = form.logo.as_ref().map(|(_, bytes)| bytes.as_slice());
    let png = pipeline::generate_png(&form.link, form.ecc, &options, logo_bytes)?;

    // Persisted only once the logo has proven decodable; a rejected
    // request leaves nothing on disk.
    if let Some((file_name, bytes)) = &form.logo {
        persist_logo(&state.settings, file_name, bytes).await;
    }

    tracing::info!(
        payload_len = form.link.len(),
        level = form.ecc.code(),
        with_logo = form.logo.is_some(),
        png_bytes = png.len(),
        "generated qr code"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"qr.png\""),
        ],
        png,
    )
        .into_response())
}

async fn text_field(name: &str, field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read field `{name}`: {e}")))
}

/// Parses a numeric form field, keeping the default when the field is
/// present but blank (browsers submit empty inputs).
async fn numeric_field(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
    default: u32,
) -> Result<u32, ApiError> {
    let text = text_field(name, field).await?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(default);
    }
    text.parse()
        .map_err(|_| ApiError::BadRequest(format!("field `{name}` must be a non-negative integer")))
}

/// Writes the uploaded logo into the configured upload directory under a
/// collision-safe name. Persistence is a side effect only; failure is
/// logged and the request continues on the in-memory bytes.
async fn persist_logo(settings: &Settings, file_name: &str, bytes: &[u8]) {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let path = std::path::Path::new(&settings.upload_dir).join(format!("{}-{safe}", Uuid::new_v4()));
    match tokio::fs::write(&path, bytes).await {
        Ok(()) => tracing::debug!(path = %path.display(), "persisted uploaded logo"),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "failed to persist uploaded logo");
        }
    }
}

/// HTTP error surface: each pipeline failure class keeps its own status
/// and machine-readable code.
pub enum ApiError {
    BadRequest(String),
    Pipeline(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "bad_request", detail.clone())
            }
            ApiError::Pipeline(err) => {
                let (status, code) = match err {
                    Error::Encode(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "encoding_capacity_exceeded")
                    }
                    Error::Render(_) => (StatusCode::BAD_REQUEST, "invalid_render_options"),
                    Error::LogoDecode(_) => (StatusCode::UNPROCESSABLE_ENTITY, "undecodable_logo"),
                };
                (status, code, err.to_string())
            }
        };
        tracing::debug!(%status, code, %detail, "request rejected");
        (status, Json(json!({ "error": code, "detail": detail }))).into_response()
    }
}
