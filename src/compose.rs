//! The avatar frame compositor. Pure in-memory pipeline: decoded inputs
//! and a normalized parameter set go in, encoded PNG bytes come out. No
//! network or filesystem access happens here.

use image::RgbaImage;
use thiserror::Error;

use crate::mask::{Shape, generate_mask};
use crate::raster::{
    CanvasMode, apply_mask, build_canvas, overlay_alpha, pad_to_square, png_encode_rgba8,
    resize_to_square,
};

pub const MIN_SIZE: u32 = 64;
pub const MAX_SIZE: u32 = 1024;

/// Fraction of the canvas the avatar occupies in border-focus style.
const BORDER_FOCUS_SCALE: f32 = 0.8;

/// Layout of the avatar relative to the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStyle {
    /// Avatar fills the full square behind the frame.
    Default,
    /// Avatar is shrunk to 80% and centered so the frame border stands out.
    BorderFocus,
}

impl FrameStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(FrameStyle::Default),
            "border-focus" => Some(FrameStyle::BorderFocus),
            _ => None,
        }
    }
}

/// Normalized render parameters. Construction clamps `size` into
/// [`MIN_SIZE`, `MAX_SIZE`] and `corner_radius` into [0, size/2], so a
/// `RenderRequest` value is always internally consistent.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest {
    pub size: u32,
    pub shape: Shape,
    pub corner_radius: u32,
    pub canvas: CanvasMode,
    pub frame_style: FrameStyle,
}

impl RenderRequest {
    pub fn new(
        size: u32,
        shape: Shape,
        corner_radius: u32,
        canvas: CanvasMode,
        frame_style: FrameStyle,
    ) -> Self {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        let corner_radius = match shape {
            Shape::Circle => size / 2,
            _ => corner_radius.min(size / 2),
        };
        Self { size, shape, corner_radius, canvas, frame_style }
    }
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to decode avatar image: {0}")]
    AvatarDecode(String),
    #[error("failed to decode frame image: {0}")]
    FrameDecode(String),
    #[error("failed to encode png")]
    PngEncode,
}

/// Compose the final image: [canvas, masked avatar, frame] bottom to top.
///
/// The avatar is force-stretched to its square target (legacy-compatible;
/// non-square sources distort). The frame is the one layer whose aspect
/// ratio is preserved: a non-square frame is letterboxed to its longer
/// side before the final resize, then always drawn topmost. An absent
/// frame yields an avatar-only image.
pub fn compose(
    avatar_bytes: &[u8],
    frame_bytes: Option<&[u8]>,
    req: &RenderRequest,
) -> Result<Vec<u8>, ComposeError> {
    let size = req.size;
    let avatar_size = match req.frame_style {
        FrameStyle::Default => size,
        FrameStyle::BorderFocus => ((size as f32) * BORDER_FOCUS_SCALE).floor() as u32,
    };

    let avatar = image::load_from_memory(avatar_bytes)
        .map_err(|e| ComposeError::AvatarDecode(e.to_string()))?;
    let avatar = resize_to_square(&avatar, avatar_size);

    let radius = req.corner_radius.min(avatar_size / 2);
    let radius = match req.shape {
        Shape::Circle => avatar_size / 2,
        _ => radius,
    };
    let mask = generate_mask(avatar_size, req.shape, radius);
    let masked_avatar = apply_mask(&avatar, &mask);

    let frame: Option<RgbaImage> = match frame_bytes {
        Some(bytes) => {
            let decoded = image::load_from_memory(bytes)
                .map_err(|e| ComposeError::FrameDecode(e.to_string()))?;
            let padded = pad_to_square(&decoded.to_rgba8());
            Some(resize_to_square(&image::DynamicImage::ImageRgba8(padded), size))
        }
        None => None,
    };

    let mut canvas = build_canvas(size, req.canvas);
    let offset = (size - avatar_size) / 2;
    overlay_alpha(&mut canvas, &masked_avatar, offset, offset);
    if let Some(frame) = frame {
        overlay_alpha(&mut canvas, &frame, 0, 0);
    }

    png_encode_rgba8(&canvas).map_err(|_| ComposeError::PngEncode)
}
