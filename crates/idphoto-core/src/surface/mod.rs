//! 2D drawing surface capability.
//!
//! The transforms never touch a concrete rendering backend. They receive a
//! [`SurfaceFactory`] and draw through the [`DrawSurface`] trait: transform
//! the context, fill with a solid color or radial gradient, blit images,
//! export JPEG bytes. The bundled software implementation lives in
//! [`raster`]; a host can substitute its own (GPU, canvas, skia, ...)
//! without the transforms noticing.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner, y grows downward
//! - `translate`/`rotate`/`scale` accumulate an affine transform applied to
//!   all subsequent fill and draw coordinates, canvas-style

mod raster;

pub use raster::{RasterFactory, RasterSurface};

use crate::color::Rgba;
use crate::decode::DecodedImage;
use crate::encode::EncodeError;

/// An axis-aligned rectangle in surface or user coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering an image at its natural size and origin.
    pub fn natural(image: &DecodedImage) -> Self {
        Self::new(0.0, 0.0, image.width as f64, image.height as f64)
    }

    /// Half-open containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// The four corners, clockwise from top-left.
    pub(crate) fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y),
            (self.x + self.width, self.y + self.height),
            (self.x, self.y + self.height),
        ]
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: Rgba,
}

/// Fill style for [`DrawSurface::fill_rect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Flat color fill.
    Solid(Rgba),
    /// Radial gradient between two circles sharing a center, with pad
    /// spreading beyond the outer radius. Stops must be sorted by offset.
    Radial {
        cx: f64,
        cy: f64,
        inner_radius: f64,
        outer_radius: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Radial gradient from `inner` at the center to `outer` at the edge.
    pub fn radial_two_stop(cx: f64, cy: f64, outer_radius: f64, inner: Rgba, outer: Rgba) -> Self {
        Paint::Radial {
            cx,
            cy,
            inner_radius: 0.0,
            outer_radius,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: inner,
                },
                GradientStop {
                    offset: 1.0,
                    color: outer,
                },
            ],
        }
    }

    /// Evaluate the paint color at a user-space point.
    pub fn eval(&self, x: f64, y: f64) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Radial {
                cx,
                cy,
                inner_radius,
                outer_radius,
                stops,
            } => {
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                let t = if *outer_radius > *inner_radius {
                    ((dist - inner_radius) / (outer_radius - inner_radius)).clamp(0.0, 1.0)
                } else if dist >= *outer_radius {
                    1.0
                } else {
                    0.0
                };
                eval_stops(stops, t)
            }
        }
    }
}

/// Interpolate sorted gradient stops at position `t` in [0, 1].
///
/// Interpolation happens in (non-linear) sRGB, matching canvas gradients.
fn eval_stops(stops: &[GradientStop], t: f64) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    let last = stops[stops.len() - 1];
    if t >= last.offset {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = (b.offset - a.offset).max(f64::EPSILON);
            let f = (t - a.offset) / span;
            return lerp_rgba(a.color, b.color, f);
        }
    }
    last.color
}

fn lerp_rgba(a: Rgba, b: Rgba, f: f64) -> Rgba {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    Rgba::new(
        mix(a.r, b.r),
        mix(a.g, b.g),
        mix(a.b, b.b),
        mix(a.a, b.a),
    )
}

/// An off-screen pixel buffer with a transformable 2D drawing context.
pub trait DrawSurface {
    /// Surface width in device pixels.
    fn width(&self) -> u32;

    /// Surface height in device pixels.
    fn height(&self) -> u32;

    /// Translate subsequent drawing by (dx, dy) user units.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate subsequent drawing by `radians` about the current origin.
    fn rotate(&mut self, radians: f64);

    /// Scale subsequent drawing by (sx, sy).
    fn scale(&mut self, sx: f64, sy: f64);

    /// Fill a user-space rectangle with a paint.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Draw the `src` region of an image into the user-space `dst`
    /// rectangle, source-over, bilinear-sampled. Regions of `src` outside
    /// the image sample transparent.
    fn draw_image(&mut self, image: &DecodedImage, src: Rect, dst: Rect);

    /// Copy the current contents out as an RGBA image.
    fn snapshot(&self) -> DecodedImage;

    /// Serialize the surface contents as a JPEG blob.
    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

/// Creator of drawing surfaces, injected into the transforms.
pub trait SurfaceFactory {
    type Surface: DrawSurface;

    /// Create a surface of the given device-pixel size.
    ///
    /// Returns `None` when a 2D drawing context cannot be acquired; the
    /// transforms surface that as their empty-handle sentinel. Zero-sized
    /// surfaces are created without complaint and fail at encode time.
    fn create(&self, width: u32, height: u32) -> Option<Self::Surface>;
}
