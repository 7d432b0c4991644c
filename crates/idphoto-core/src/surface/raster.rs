//! Software rasterizer backing the drawing surface traits.
//!
//! Rendering uses inverse mapping: for each device pixel in the affected
//! region, the inverse of the accumulated affine transform yields the
//! user-space point, which is tested against the fill rectangle or mapped
//! into source-image coordinates and bilinear-sampled.

use crate::decode::DecodedImage;
use crate::encode::{encode_jpeg, EncodeError};

use super::{DrawSurface, Paint, Rect, SurfaceFactory};

/// A 2D affine transform in canvas order: maps user-space (x, y) to device
/// space as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Transform2D {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform2D {
    pub(crate) fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    fn translation(dx: f64, dy: f64) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::identity()
        }
    }

    fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Compose with `other` applied first (canvas transform accumulation).
    fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse transform, or `None` if singular (nothing renders then,
    /// matching canvas behavior for non-invertible transforms).
    fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// Software drawing surface with an RGBA8 backing store.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    transform: Transform2D,
}

impl RasterSurface {
    /// Create a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            transform: Transform2D::identity(),
        }
    }

    /// Read back a pixel, straight-alpha RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Device-pixel bounds covering the transformed corners of a user rect,
    /// clamped to the surface. Returns `(x0, y0, x1, y1)`, half-open.
    fn device_bounds(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for (cx, cy) in rect.corners() {
            let (dx, dy) = self.transform.apply(cx, cy);
            min_x = min_x.min(dx);
            min_y = min_y.min(dy);
            max_x = max_x.max(dx);
            max_y = max_y.max(dy);
        }

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(self.height);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    /// Source-over blend of a straight-alpha color (0..255 floats) onto a
    /// device pixel.
    fn blend_pixel(&mut self, px: u32, py: u32, src: [f64; 4]) {
        let sa = src[3] / 255.0;
        if sa <= 0.0 {
            return;
        }
        let idx = ((py * self.width + px) * 4) as usize;
        let da = self.pixels[idx + 3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }

        for ch in 0..3 {
            let s = src[ch];
            let d = self.pixels[idx + ch] as f64;
            let v = (s * sa + d * da * (1.0 - sa)) / out_a;
            self.pixels[idx + ch] = v.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[idx + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Bilinear RGBA sample at fractional coordinates, straight alpha in 0..255
/// floats. Taps outside the image contribute transparent; channels are
/// accumulated premultiplied so transparent neighbors do not bleed color.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [f64; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1.0, y0, fx * (1.0 - fy)),
        (x0, y0 + 1.0, (1.0 - fx) * fy),
        (x0 + 1.0, y0 + 1.0, fx * fy),
    ];

    let mut rgb = [0.0f64; 3];
    let mut alpha = 0.0f64;

    for (tx, ty, weight) in taps {
        if weight <= 0.0 || tx < 0.0 || ty < 0.0 {
            continue;
        }
        let (tx, ty) = (tx as u32, ty as u32);
        if let Some(p) = image.pixel(tx, ty) {
            let a = p[3] as f64;
            rgb[0] += p[0] as f64 * a * weight;
            rgb[1] += p[1] as f64 * a * weight;
            rgb[2] += p[2] as f64 * a * weight;
            alpha += a * weight;
        }
    }

    if alpha <= 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    [rgb[0] / alpha, rgb[1] / alpha, rgb[2] / alpha, alpha]
}

impl DrawSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.then(&Transform2D::translation(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.then(&Transform2D::rotation(radians));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.then(&Transform2D::scaling(sx, sy));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        if rect.is_degenerate() {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.device_bounds(&rect) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                let (ux, uy) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if rect.contains(ux, uy) {
                    let color = paint.eval(ux, uy);
                    self.blend_pixel(
                        px,
                        py,
                        [
                            color.r as f64,
                            color.g as f64,
                            color.b as f64,
                            color.a as f64,
                        ],
                    );
                }
            }
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, src: Rect, dst: Rect) {
        if image.is_empty() || src.is_degenerate() || dst.is_degenerate() {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.device_bounds(&dst) else {
            return;
        };

        let scale_x = src.width / dst.width;
        let scale_y = src.height / dst.height;

        for py in y0..y1 {
            for px in x0..x1 {
                let (ux, uy) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if !dst.contains(ux, uy) {
                    continue;
                }
                // Device pixel center -> source sample point
                let sx = src.x + (ux - dst.x) * scale_x;
                let sy = src.y + (uy - dst.y) * scale_y;
                let sample = sample_bilinear(image, sx - 0.5, sy - 0.5);
                self.blend_pixel(px, py, sample);
            }
        }
    }

    fn snapshot(&self) -> DecodedImage {
        DecodedImage::new(self.width, self.height, self.pixels.clone())
    }

    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(&self.pixels, self.width, self.height, quality)
    }
}

/// Factory for [`RasterSurface`]s. Surface creation always succeeds, zero
/// sizes included; degenerate surfaces fail at encode time like a zero-sized
/// canvas produces no blob.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterFactory;

impl SurfaceFactory for RasterFactory {
    type Surface = RasterSurface;

    fn create(&self, width: u32, height: u32) -> Option<RasterSurface> {
        Some(RasterSurface::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    /// Opaque image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = RasterSurface::new(4, 4);
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_solid() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_rect(
            Rect::new(2.0, 3.0, 4.0, 5.0),
            &Paint::Solid(Rgba::opaque(9, 8, 7)),
        );

        assert_eq!(surface.pixel(2, 3), Some([9, 8, 7, 255]));
        assert_eq!(surface.pixel(5, 7), Some([9, 8, 7, 255]));
        // Outside the rect untouched
        assert_eq!(surface.pixel(1, 3), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(6, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_respects_scale() {
        let mut surface = RasterSurface::new(9, 9);
        surface.scale(3.0, 3.0);
        // Logical 2x2 rect covers device 6x6
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Rgba::WHITE));

        assert_eq!(surface.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_identity_copies_pixels() {
        let img = test_image(8, 6);
        let mut surface = RasterSurface::new(8, 6);
        surface.draw_image(&img, Rect::natural(&img), Rect::natural(&img));

        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(
                    surface.pixel(x, y),
                    img.pixel(x, y),
                    "pixel mismatch at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_draw_image_out_of_bounds_src_samples_transparent() {
        let img = test_image(4, 4);
        let mut surface = RasterSurface::new(8, 8);
        // Source rect extends well past the image
        surface.draw_image(
            &img,
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(0.0, 0.0, 8.0, 8.0),
        );

        assert_eq!(surface.pixel(1, 1).unwrap()[3], 255);
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_rotation_90() {
        let img = test_image(4, 2);
        let mut surface = RasterSurface::new(2, 4);

        // Rotate about the bbox center, recenter, draw at natural size
        surface.translate(1.0, 2.0);
        surface.rotate(std::f64::consts::FRAC_PI_2);
        surface.translate(-2.0, -1.0);
        surface.draw_image(&img, Rect::natural(&img), Rect::natural(&img));

        // Bottom-left source pixel lands at top-left after +90deg
        let p = surface.pixel(0, 0).unwrap();
        assert_eq!(p[3], 255);
        // x channel encodes source column: column 0 ends up along the top
        assert_eq!(p[0], 0);
        let p = surface.pixel(0, 3).unwrap();
        assert_eq!(p[0], 3);
    }

    #[test]
    fn test_draw_image_stretches_to_dst() {
        // 2x2 image stretched over 8x8
        let mut pixels = Vec::new();
        for color in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 0, 255]] {
            pixels.extend_from_slice(&color);
        }
        let img = DecodedImage::new(2, 2, pixels);

        let mut surface = RasterSurface::new(8, 8);
        surface.draw_image(&img, Rect::natural(&img), Rect::new(0.0, 0.0, 8.0, 8.0));

        // Corner quadrants keep their dominant source color
        assert!(surface.pixel(0, 0).unwrap()[0] > 200);
        assert!(surface.pixel(7, 0).unwrap()[1] > 200);
        assert!(surface.pixel(0, 7).unwrap()[2] > 200);
    }

    #[test]
    fn test_source_over_blending() {
        let mut surface = RasterSurface::new(2, 2);
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Rgba::WHITE));
        // 50% black over white -> mid gray
        surface.fill_rect(
            Rect::new(0.0, 0.0, 2.0, 2.0),
            &Paint::Solid(Rgba::new(0, 0, 0, 128)),
        );

        let p = surface.pixel(0, 0).unwrap();
        assert!((p[0] as i32 - 127).abs() <= 2, "got {p:?}");
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_transparent_draw_leaves_background() {
        let img = DecodedImage::blank(4, 4);
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_rect(
            Rect::new(0.0, 0.0, 4.0, 4.0),
            &Paint::Solid(Rgba::opaque(10, 20, 30)),
        );
        surface.draw_image(&img, Rect::natural(&img), Rect::natural(&img));

        assert_eq!(surface.pixel(2, 2), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_singular_transform_renders_nothing() {
        let mut surface = RasterSurface::new(4, 4);
        surface.scale(0.0, 1.0);
        surface.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Paint::Solid(Rgba::WHITE));

        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let img = test_image(5, 5);
        let mut surface = RasterSurface::new(5, 5);
        surface.draw_image(&img, Rect::natural(&img), Rect::natural(&img));

        let snap = surface.snapshot();
        assert_eq!(snap.width, 5);
        assert_eq!(snap.height, 5);
        assert_eq!(snap.pixel(3, 1), img.pixel(3, 1));
    }

    #[test]
    fn test_encode_jpeg_zero_sized_surface_fails() {
        let surface = RasterFactory.create(0, 10).unwrap();
        assert!(matches!(
            surface.encode_jpeg(90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_transform_invert_round_trip() {
        let t = Transform2D::identity()
            .then(&Transform2D::translation(3.0, -2.0))
            .then(&Transform2D::rotation(0.7))
            .then(&Transform2D::scaling(2.0, 0.5));
        let inv = t.invert().unwrap();

        let (x, y) = t.apply(11.0, 7.0);
        let (rx, ry) = inv.apply(x, y);
        assert!((rx - 11.0).abs() < 1e-9);
        assert!((ry - 7.0).abs() < 1e-9);
    }
}
