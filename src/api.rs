use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;
use crate::avatar;
use crate::compose::{self, FrameStyle, RenderRequest};
use crate::config::FramePolicy;
use crate::error::ApiError;
use crate::mask::Shape;
use crate::raster::CanvasMode;
use crate::themes::ThemeRecord;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AvatarQuery {
    /// Theme directory name, default "base".
    pub theme: Option<String>,
    /// Output size in pixels, clamped to [64, 1024].
    pub size: Option<String>,
    /// circle | rounded | rect, default circle.
    pub shape: Option<String>,
    /// Corner radius for rounded shape, clamped to [0, size/2].
    pub radius: Option<String>,
    /// light | dark | transparent, default light.
    pub canvas: Option<String>,
    /// default | border-focus.
    pub frame_style: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Parse and clamp the query into a normalized `RenderRequest`.
fn parse_render_request(q: &AvatarQuery) -> Result<RenderRequest, ApiError> {
    let size = parse_integer_param(q.size.as_deref(), 256, "size")?;
    let radius = parse_integer_param(q.radius.as_deref(), 0, "radius")?;

    let shape = match q.shape.as_deref() {
        None => Shape::Circle,
        Some(s) => Shape::parse(s).ok_or_else(|| {
            ApiError::Validation(format!(
                "The 'shape' parameter must be one of circle, rounded, rect (got '{s}')."
            ))
        })?,
    };

    let canvas = match q.canvas.as_deref() {
        None => CanvasMode::Light,
        Some(s) => CanvasMode::parse(s).ok_or_else(|| {
            ApiError::Validation(format!(
                "The 'canvas' parameter must be one of light, dark, transparent (got '{s}')."
            ))
        })?,
    };

    let frame_style = match q.frame_style.as_deref() {
        None => FrameStyle::Default,
        Some(s) => FrameStyle::parse(s).ok_or_else(|| {
            ApiError::Validation(format!(
                "The 'frame_style' parameter must be 'default' or 'border-focus' (got '{s}')."
            ))
        })?,
    };

    Ok(RenderRequest::new(size, shape, radius, canvas, frame_style))
}

/// Usernames are interpolated into the upstream avatar URL, so restrict
/// them to a safe character set instead of letting `%`, `?` or path
/// separators rewrite the request.
fn validate_username(raw: &str) -> Result<&str, ApiError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required.".to_string()));
    }
    let ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(ApiError::Validation(format!(
            "The 'username' parameter contains invalid characters: '{username}'."
        )));
    }
    Ok(username)
}

/// Integer query params arrive as strings; anything but pure digits is a
/// 400, and range clamping happens downstream in `RenderRequest::new`.
fn parse_integer_param(raw: Option<&str>, default: u32, name: &str) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::Validation(format!(
            "The '{name}' parameter must be a valid integer."
        )));
    }
    // long digit strings saturate rather than overflow
    Ok(raw.parse::<u32>().unwrap_or(u32::MAX))
}

#[utoipa::path(
    get,
    path = "/api/framed-avatar/{username}",
    tag = "framegen",
    params(
        ("username" = String, Path, description = "Remote profile username"),
        AvatarQuery
    ),
    responses(
        (status = 200, description = "Composited avatar PNG", content_type = "image/png"),
        (status = 400, description = "Malformed parameter"),
        (status = 404, description = "Unknown theme"),
        (status = 503, description = "Avatar source unavailable")
    )
)]
pub async fn framed_avatar(
    State(st): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(q): Query<AvatarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let username = validate_username(&username)?;

    let req = parse_render_request(&q)?;
    let theme = q.theme.as_deref().unwrap_or("base");

    let frame_bytes = match st.themes.load_frame(theme)? {
        Some(bytes) => Some(bytes),
        None => match st.config.frame_policy {
            FramePolicy::Strict => {
                return Err(ApiError::NotFound(format!("Theme '{theme}' not found.")));
            }
            FramePolicy::Lenient => None,
        },
    };

    info!(
        username,
        theme,
        size = req.size,
        shape = req.shape.as_str(),
        "rendering framed avatar"
    );

    let avatar_bytes = avatar::fetch_avatar(&st.http, &st.config, username, req.size).await?;
    let png = compose::compose(&avatar_bytes, frame_bytes.as_deref(), &req)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        png,
    ))
}

#[utoipa::path(
    get,
    path = "/api/themes",
    tag = "framegen",
    responses(
        (status = 200, body = [ThemeRecord]),
        (status = 500, description = "Frames directory missing")
    )
)]
pub async fn list_themes(State(st): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let records = st.themes.list()?;
    Ok(Json(records))
}

#[utoipa::path(get, path = "/api/health", tag = "framegen", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
