use image::{ImageBuffer, Rgba, RgbaImage};

/// Clip shape applied to the avatar layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Rounded,
    Rect,
}

impl Shape {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "circle" => Some(Shape::Circle),
            "rounded" => Some(Shape::Rounded),
            "rect" => Some(Shape::Rect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rounded => "rounded",
            Shape::Rect => "rect",
        }
    }
}

/// Build a `size`×`size` mask: opaque white inside the shape, zero alpha
/// outside. Applied to the avatar via alpha intersection (dest-in).
///
/// `corner_radius` is only meaningful for `Rounded`; `Circle` always uses
/// `size / 2` and `Rect` ignores it. Callers guarantee `size > 0` and a
/// radius already clamped to `size / 2`.
pub fn generate_mask(size: u32, shape: Shape, corner_radius: u32) -> RgbaImage {
    let mut mask = ImageBuffer::from_pixel(size, size, Rgba([255, 255, 255, 255]));

    match shape {
        Shape::Rect => mask,
        Shape::Circle => {
            let cx = (size - 1) as f32 / 2.0;
            let cy = cx;
            let r = size as f32 / 2.0;
            for y in 0..size {
                for x in 0..size {
                    let dx = x as f32 - cx;
                    let dy = y as f32 - cy;
                    if dx * dx + dy * dy > r * r {
                        mask.get_pixel_mut(x, y).0 = [0, 0, 0, 0];
                    }
                }
            }
            mask
        }
        Shape::Rounded => {
            if corner_radius == 0 {
                return mask;
            }
            let w = size as i32;
            let h = size as i32;
            let r = corner_radius as i32;
            for y in 0..h {
                for x in 0..w {
                    if !rounded_rect_contains(x, y, w, h, r) {
                        mask.get_pixel_mut(x as u32, y as u32).0 = [0, 0, 0, 0];
                    }
                }
            }
            mask
        }
    }
}

fn rounded_rect_contains(x: i32, y: i32, w: i32, h: i32, r: i32) -> bool {
    if x >= r && x < w - r {
        return true;
    }
    if y >= r && y < h - r {
        return true;
    }
    // nearest corner circle center
    let (cx, cy) = if x < r {
        if y < r { (r - 1, r - 1) } else { (r - 1, h - r) }
    } else if y < r {
        (w - r, r - 1)
    } else {
        (w - r, h - r)
    };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_mask_is_fully_opaque() {
        let mask = generate_mask(64, Shape::Rect, 0);
        assert!(mask.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn rounded_with_zero_radius_equals_rect() {
        let rounded = generate_mask(64, Shape::Rounded, 0);
        let rect = generate_mask(64, Shape::Rect, 0);
        assert_eq!(rounded.as_raw(), rect.as_raw());
    }

    #[test]
    fn circle_mask_clears_corners_and_keeps_center() {
        let mask = generate_mask(128, Shape::Circle, 0);
        assert_eq!(mask.get_pixel(0, 0).0[3], 0);
        assert_eq!(mask.get_pixel(127, 0).0[3], 0);
        assert_eq!(mask.get_pixel(0, 127).0[3], 0);
        assert_eq!(mask.get_pixel(127, 127).0[3], 0);
        assert_eq!(mask.get_pixel(64, 64).0[3], 255);
        // edge midpoints sit on the disk
        assert_eq!(mask.get_pixel(64, 0).0[3], 255);
        assert_eq!(mask.get_pixel(0, 64).0[3], 255);
    }

    #[test]
    fn rounded_mask_clears_corners_only() {
        let mask = generate_mask(100, Shape::Rounded, 20);
        assert_eq!(mask.get_pixel(0, 0).0[3], 0);
        assert_eq!(mask.get_pixel(99, 99).0[3], 0);
        assert_eq!(mask.get_pixel(50, 0).0[3], 255);
        assert_eq!(mask.get_pixel(0, 50).0[3], 255);
        assert_eq!(mask.get_pixel(50, 50).0[3], 255);
    }

    #[test]
    fn shape_parse_round_trips() {
        for s in ["circle", "rounded", "rect"] {
            assert_eq!(Shape::parse(s).unwrap().as_str(), s);
        }
        assert!(Shape::parse("hexagon").is_none());
    }
}
