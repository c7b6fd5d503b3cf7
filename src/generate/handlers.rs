use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::generate::dto::{
    AnalyzeImageResponse, AnalyzePatternsResponse, AnalyzePerformanceResponse, CodeRequest,
    CreatePageRequest, CreatePageResponse, ImproveCodeResponse, TemplateInfo,
};
use crate::generate::{services, templates};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn json_routes() -> Router<AppState> {
    Router::new()
        .route("/create-page", post(create_page))
        .route("/create-page/templates", get(list_templates))
        .route("/improve-code", post(improve_code))
        .route("/analyze-performance", post(analyze_performance))
        .route("/analyze-patterns", post(analyze_patterns))
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-image", post(analyze_image))
        .route("/improve-code/upload", post(improve_code_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn allowed_upload_mime(ct: &str) -> bool {
    ct.starts_with("image/") || ct == "application/pdf" || ct.starts_with("text/")
}

/// Read one named field out of a multipart body.
async fn read_field(
    mp: &mut Multipart,
    name: &str,
) -> Result<(Bytes, String), (StatusCode, String)> {
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some(name) {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field.bytes().await.map_err(|_| {
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Upload too large or malformed".to_string(),
                )
            })?;
            return Ok((data, content_type));
        }
    }
    Err((StatusCode::BAD_REQUEST, format!("{name} field is required")))
}

#[instrument(skip(state, mp))]
pub async fn analyze_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<Json<AnalyzeImageResponse>, (StatusCode, String)> {
    let (data, content_type) = read_field(&mut mp, "image").await?;
    if !allowed_upload_mime(&content_type) {
        return Err((StatusCode::BAD_REQUEST, "Unsupported file type".into()));
    }
    if data.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Empty upload".into()));
    }

    info!(user_id = %user.id, bytes = data.len(), mime = %content_type, "analyzing screenshot");
    Ok(Json(
        services::analyze_image(state.ai.as_ref(), &data, &content_type).await,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreatePageRequest>,
) -> Result<Json<CreatePageResponse>, (StatusCode, String)> {
    if payload.requirements.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "requirements is required".into()));
    }
    let template = payload.template.trim();
    if !template.is_empty() && !templates::is_known(template) {
        return Err((StatusCode::BAD_REQUEST, "Unknown template".into()));
    }

    info!(user_id = %user.id, template = %template, "generating page");
    Ok(Json(services::create_page(state.ai.as_ref(), &payload).await))
}

#[instrument(skip_all)]
pub async fn list_templates() -> Json<Vec<TemplateInfo>> {
    Json(templates::catalog().to_vec())
}

#[instrument(skip(state, payload))]
pub async fn improve_code(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CodeRequest>,
) -> Result<Json<ImproveCodeResponse>, (StatusCode, String)> {
    if payload.code.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "code is required".into()));
    }

    info!(user_id = %user.id, chars = payload.code.len(), "reviewing code");
    Ok(Json(
        services::improve_code(state.ai.as_ref(), &payload.code).await,
    ))
}

/// Same operation as `improve_code`, fed from an uploaded text file.
#[instrument(skip(state, mp))]
pub async fn improve_code_upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<Json<ImproveCodeResponse>, (StatusCode, String)> {
    let (data, _content_type) = read_field(&mut mp, "file").await?;
    let code = String::from_utf8(data.to_vec())
        .map_err(|_| (StatusCode::BAD_REQUEST, "File is not valid UTF-8 text".to_string()))?;
    if code.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "File is empty".into()));
    }

    info!(user_id = %user.id, chars = code.len(), "reviewing uploaded code");
    Ok(Json(services::improve_code(state.ai.as_ref(), &code).await))
}

#[instrument(skip(state, payload))]
pub async fn analyze_performance(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CodeRequest>,
) -> Result<Json<AnalyzePerformanceResponse>, (StatusCode, String)> {
    if payload.code.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "code is required".into()));
    }

    info!(user_id = %user.id, "analyzing performance");
    Ok(Json(
        services::analyze_performance(state.ai.as_ref(), &payload.code).await,
    ))
}

#[instrument(skip(state, payload))]
pub async fn analyze_patterns(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CodeRequest>,
) -> Result<Json<AnalyzePatternsResponse>, (StatusCode, String)> {
    if payload.code.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "code is required".into()));
    }

    info!(user_id = %user.id, "detecting patterns");
    Ok(Json(
        services::analyze_patterns(state.ai.as_ref(), &payload.code).await,
    ))
}
