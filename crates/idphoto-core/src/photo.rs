//! The two identification-photo transforms.
//!
//! [`crop_id_photo`] rotates a source photograph about its center, samples a
//! rectangular region from the rotated bounding-box surface into a 3x
//! supersampled output surface and publishes the JPEG. [`create_id_photo`]
//! fills an output surface with a flat color or a radial gradient and draws
//! the subject stretched over it.
//!
//! Both operations are independent entry points over injected capabilities:
//! an [`ImageSource`] to resolve the source reference, a [`SurfaceFactory`]
//! for drawing surfaces and a [`BlobRegistry`] to publish the result. Each
//! call allocates its own surfaces, so in-flight invocations never share
//! mutable state. When the factory cannot produce a drawing context the
//! transforms resolve with the empty-handle sentinel instead of failing;
//! callers must check [`OutputHandle::is_empty`].

use thiserror::Error;

use crate::color::{darken, parse_color, ColorError, Rgba};
use crate::decode::DecodedImage;
use crate::encode::EncodeError;
use crate::geometry::{degrees_to_radians, rotated_bounding_box};
use crate::handle::{BlobRegistry, OutputHandle};
use crate::loader::{ImageSource, LoadError};
use crate::surface::{DrawSurface, Paint, Rect, SurfaceFactory};
use crate::{CropArea, Flip, Resolution};

/// Fixed supersampling factor of the crop output surface.
const SUPERSAMPLE: u32 = 3;

/// JPEG quality for published photos (canvas toBlob default).
const JPEG_QUALITY: u8 = 92;

const JPEG_MIME: &str = "image/jpeg";

/// Failure modes of the transforms. Load failures propagate untranslated;
/// a missing drawing context is not an error but the empty-handle sentinel.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Parameters of the crop transform.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRequest {
    /// Source reference resolved through the [`ImageSource`]
    pub image: String,
    /// Region to sample, in rotated-surface pixel coordinates
    pub area: CropArea,
    /// Rotation in degrees, unnormalized
    pub rotation: f64,
    /// Optional mirroring, inert by default
    #[serde(default)]
    pub flip: Flip,
    /// Target output resolution (the encoded JPEG is 3x this size)
    pub resolution: Resolution,
}

/// Parameters of the background composite transform.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositeRequest {
    /// Source reference resolved through the [`ImageSource`]
    pub image: String,
    /// CSS background color string
    pub color: String,
    /// Gradient intensity; `<= 0` selects a flat fill, `> 0` a radial
    /// gradient whose outer stop is the color darkened by this magnitude
    pub gradient: f64,
    /// Exact output resolution
    pub resolution: Resolution,
}

/// Render the crop transform against an already-decoded image.
///
/// Returns `Ok(None)` when the factory cannot produce a drawing context for
/// either surface. This is the synchronous core of [`crop_id_photo`]; hosts
/// that already hold decoded pixels (the wasm bindings) call it directly.
pub fn render_crop<F: SurfaceFactory>(
    image: &DecodedImage,
    area: CropArea,
    rotation: f64,
    flip: Flip,
    resolution: Resolution,
    surfaces: &F,
) -> Result<Option<Vec<u8>>, PhotoError> {
    let radians = degrees_to_radians(rotation);
    let bbox = rotated_bounding_box(image.width as f64, image.height as f64, rotation);

    // Surface sizing truncates like canvas element sizing
    let Some(mut stage) = surfaces.create(bbox.width as u32, bbox.height as u32) else {
        return Ok(None);
    };

    // Rotate about the bounding-box center, then recenter the image so the
    // rotated result sits centered in the new surface
    stage.translate(bbox.width / 2.0, bbox.height / 2.0);
    stage.rotate(radians);
    if !flip.is_none() {
        stage.scale(
            if flip.horizontal { -1.0 } else { 1.0 },
            if flip.vertical { -1.0 } else { 1.0 },
        );
    }
    stage.translate(-(image.width as f64) / 2.0, -(image.height as f64) / 2.0);
    stage.draw_image(image, Rect::natural(image), Rect::natural(image));

    let Some(mut output) = surfaces.create(
        resolution.width * SUPERSAMPLE,
        resolution.height * SUPERSAMPLE,
    ) else {
        return Ok(None);
    };

    // Work in logical units on the supersampled surface
    output.scale(SUPERSAMPLE as f64, SUPERSAMPLE as f64);

    let logical = Rect::new(0.0, 0.0, resolution.width as f64, resolution.height as f64);

    // White backing guards against transparent source regions
    output.fill_rect(logical, &Paint::Solid(Rgba::WHITE));

    let staged = stage.snapshot();
    output.draw_image(
        &staged,
        Rect::new(area.x, area.y, area.width, area.height),
        logical,
    );

    Ok(Some(output.encode_jpeg(JPEG_QUALITY)?))
}

/// Render the background composite transform against an already-decoded
/// image. Returns `Ok(None)` when no drawing context is available.
pub fn render_composite<F: SurfaceFactory>(
    image: &DecodedImage,
    color: &str,
    gradient: f64,
    resolution: Resolution,
    surfaces: &F,
) -> Result<Option<Vec<u8>>, PhotoError> {
    let Some(mut output) = surfaces.create(resolution.width, resolution.height) else {
        return Ok(None);
    };

    let width = resolution.width as f64;
    let height = resolution.height as f64;
    let full = Rect::new(0.0, 0.0, width, height);

    let base = parse_color(color)?;
    if gradient <= 0.0 {
        output.fill_rect(full, &Paint::Solid(base));
    } else {
        let paint = Paint::radial_two_stop(
            width / 2.0,
            height / 2.0,
            (width + height) / 2.0,
            base,
            darken(base, gradient),
        );
        output.fill_rect(full, &paint);
    }

    // Subject stretched from its natural size to exactly fill the output
    output.draw_image(image, Rect::natural(image), full);

    Ok(Some(output.encode_jpeg(JPEG_QUALITY)?))
}

/// Crop a rotated region of a source photo to the target resolution and
/// publish the encoded JPEG.
///
/// Load failures propagate as [`PhotoError::Load`]; an unavailable drawing
/// context resolves to the empty-handle sentinel. The caller owns the
/// returned handle and is responsible for revoking it.
pub async fn crop_id_photo<S, F, R>(
    source: &S,
    surfaces: &F,
    registry: &mut R,
    request: &CropRequest,
) -> Result<OutputHandle, PhotoError>
where
    S: ImageSource,
    F: SurfaceFactory,
    R: BlobRegistry,
{
    let image = source.load(&request.image).await?;

    match render_crop(
        &image,
        request.area,
        request.rotation,
        request.flip,
        request.resolution,
        surfaces,
    )? {
        Some(jpeg) => Ok(registry.publish(jpeg, JPEG_MIME)),
        None => Ok(OutputHandle::empty()),
    }
}

/// Composite a subject photo over a flat or radial-gradient background at
/// the target resolution and publish the encoded JPEG.
///
/// Same failure contract as [`crop_id_photo`].
pub async fn create_id_photo<S, F, R>(
    source: &S,
    surfaces: &F,
    registry: &mut R,
    request: &CompositeRequest,
) -> Result<OutputHandle, PhotoError>
where
    S: ImageSource,
    F: SurfaceFactory,
    R: BlobRegistry,
{
    let image = source.load(&request.image).await?;

    match render_composite(
        &image,
        &request.color,
        request.gradient,
        request.resolution,
        surfaces,
    )? {
        Some(jpeg) => Ok(registry.publish(jpeg, JPEG_MIME)),
        None => Ok(OutputHandle::empty()),
    }
}
