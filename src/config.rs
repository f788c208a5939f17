use std::{path::PathBuf, time::Duration};

/// Behavior when a theme directory exists (or is requested) without a
/// `frame.png` inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePolicy {
    /// Unknown or frameless theme rejects the request with 404.
    Strict,
    /// Missing frame is skipped and an avatar-only image is served.
    Lenient,
}

/// Service configuration, resolved once at startup and injected through
/// `AppState`. The render core never reads paths or env vars itself.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root directory holding one subdirectory per theme.
    pub frames_dir: PathBuf,
    /// Placeholder served when the remote avatar source returns 404.
    pub fallback_avatar: PathBuf,
    /// Base URL of the avatar provider; `{base}/{username}.png?size=N`.
    pub avatar_url_base: String,
    pub avatar_timeout: Duration,
    pub frame_policy: FramePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("BACKEND_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let frames_dir = std::env::var("FRAMES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/frames"));
        let fallback_avatar = std::env::var("FALLBACK_AVATAR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/images/fallback.png"));

        let avatar_url_base = std::env::var("AVATAR_URL_BASE")
            .unwrap_or_else(|_| "https://github.com".to_string());
        let timeout_secs: u64 = std::env::var("AVATAR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let frame_policy = match std::env::var("FRAME_POLICY").as_deref() {
            Ok("lenient") => FramePolicy::Lenient,
            _ => FramePolicy::Strict,
        };

        Self {
            host,
            port,
            frames_dir,
            fallback_avatar,
            avatar_url_base,
            avatar_timeout: Duration::from_secs(timeout_secs),
            frame_policy,
        }
    }
}
