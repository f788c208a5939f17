//! Shared raster primitives on top of the `image` crate. All operations
//! work on straight-alpha RGBA8 buffers owned by the current request.

use image::{
    DynamicImage, ImageBuffer, ImageEncoder, Rgba, RgbaImage, imageops::FilterType,
};

/// Background of the output canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasMode {
    Light,
    Dark,
    Transparent,
}

impl CanvasMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(CanvasMode::Light),
            "dark" => Some(CanvasMode::Dark),
            "transparent" => Some(CanvasMode::Transparent),
            _ => None,
        }
    }
}

const LIGHT_BG: Rgba<u8> = Rgba([240, 240, 240, 255]);
const DARK_BG: Rgba<u8> = Rgba([24, 24, 24, 255]);

/// Allocate the `size`×`size` base layer for the requested mode.
pub fn build_canvas(size: u32, mode: CanvasMode) -> RgbaImage {
    let bg = match mode {
        CanvasMode::Light => LIGHT_BG,
        CanvasMode::Dark => DARK_BG,
        CanvasMode::Transparent => Rgba([0, 0, 0, 0]),
    };
    ImageBuffer::from_pixel(size, size, bg)
}

/// Force-stretch to an exact square. Aspect ratio is intentionally not
/// preserved here; callers that need letterboxing go through
/// [`pad_to_square`] first.
pub fn resize_to_square(img: &DynamicImage, size: u32) -> RgbaImage {
    img.resize_exact(size, size, FilterType::Lanczos3).to_rgba8()
}

/// Center a non-square image inside a transparent square sized to its
/// longer side. Already-square input is copied through unchanged.
pub fn pad_to_square(img: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == h {
        return img.clone();
    }
    let side = w.max(h);
    let mut out = ImageBuffer::from_pixel(side, side, Rgba([0, 0, 0, 0]));
    let x = i64::from((side - w) / 2);
    let y = i64::from((side - h) / 2);
    image::imageops::replace(&mut out, img, x, y);
    out
}

/// Alpha intersection (dest-in): keep the image's color but multiply its
/// alpha by the mask's alpha at each pixel. Buffers must match in size.
pub fn apply_mask(img: &RgbaImage, mask: &RgbaImage) -> RgbaImage {
    debug_assert_eq!(img.dimensions(), mask.dimensions());
    let mut out = img.clone();
    for (p, m) in out.pixels_mut().zip(mask.pixels()) {
        p.0[3] = ((p.0[3] as u16 * m.0[3] as u16) / 255) as u8;
    }
    out
}

/// Straight-alpha source-over of `over` onto `base` at (x, y). Unlike a
/// flatten-to-opaque overlay, the destination alpha is composited too, so
/// transparent canvases stay transparent outside the layered content.
pub fn overlay_alpha(base: &mut RgbaImage, over: &RgbaImage, x: u32, y: u32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let sa = p.0[3] as f32 / 255.0;
            if sa <= 0.0 {
                continue;
            }
            let bx = x + ox;
            let by = y + oy;
            if bx >= base.width() || by >= base.height() {
                continue;
            }
            let dst = base.get_pixel_mut(bx, by);
            let da = dst.0[3] as f32 / 255.0;
            let oa = sa + da * (1.0 - sa);
            if oa <= 0.0 {
                dst.0 = [0, 0, 0, 0];
                continue;
            }
            for i in 0..3 {
                let sc = p.0[i] as f32;
                let dc = dst.0[i] as f32;
                dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / oa).round() as u8;
            }
            dst.0[3] = (oa * 255.0).round() as u8;
        }
    }
}

/// Encode an RGBA8 buffer as PNG bytes.
pub fn png_encode_rgba8(img: &RgbaImage) -> Result<Vec<u8>, String> {
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| e.to_string())?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_modes_produce_expected_pixels() {
        let light = build_canvas(8, CanvasMode::Light);
        assert_eq!(light.get_pixel(0, 0).0, [240, 240, 240, 255]);

        let dark = build_canvas(8, CanvasMode::Dark);
        assert_eq!(dark.get_pixel(3, 3).0, [24, 24, 24, 255]);

        let transparent = build_canvas(8, CanvasMode::Transparent);
        assert!(transparent.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn pad_to_square_centers_on_longer_side() {
        let wide = ImageBuffer::from_pixel(10, 4, Rgba([255, 0, 0, 255]));
        let padded = pad_to_square(&wide);
        assert_eq!(padded.dimensions(), (10, 10));
        // rows 0..3 and 7..10 are transparent letterbox
        assert_eq!(padded.get_pixel(5, 0).0[3], 0);
        assert_eq!(padded.get_pixel(5, 9).0[3], 0);
        assert_eq!(padded.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn pad_to_square_passes_square_through() {
        let sq = ImageBuffer::from_pixel(6, 6, Rgba([1, 2, 3, 4]));
        assert_eq!(pad_to_square(&sq).as_raw(), sq.as_raw());
    }

    #[test]
    fn apply_mask_multiplies_alpha() {
        let img = ImageBuffer::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let mut mask = ImageBuffer::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        mask.get_pixel_mut(1, 1).0[3] = 0;
        let out = apply_mask(&img, &mask);
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(out.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn overlay_preserves_destination_transparency() {
        let mut base = build_canvas(4, CanvasMode::Transparent);
        let mut over = ImageBuffer::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        over.get_pixel_mut(1, 1).0[3] = 0;
        overlay_alpha(&mut base, &over, 0, 0);
        assert_eq!(base.get_pixel(0, 0).0, [0, 255, 0, 255]);
        // transparent source pixel leaves transparent destination alone
        assert_eq!(base.get_pixel(1, 1).0[3], 0);
        assert_eq!(base.get_pixel(3, 3).0[3], 0);
    }

    #[test]
    fn overlay_blends_on_opaque_base() {
        let mut base = ImageBuffer::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let over = ImageBuffer::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        overlay_alpha(&mut base, &over, 0, 0);
        let p = base.get_pixel(0, 0).0;
        assert_eq!(p[3], 255);
        assert!(p[0] > 120 && p[0] < 135);
    }

    #[test]
    fn png_encode_round_trips() {
        let img = ImageBuffer::from_pixel(5, 5, Rgba([9, 8, 7, 255]));
        let png = png_encode_rgba8(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (5, 5));
        assert_eq!(decoded.get_pixel(2, 2).0, [9, 8, 7, 255]);
    }
}
