//! WASM bindings for the photo transforms.
//!
//! Both bindings run the core transforms against the bundled software
//! rasterizer and return finished JPEG bytes. The JavaScript host wraps the
//! bytes in a Blob and creates (and later revokes) the object URL itself.

use crate::types::JsDecodedImage;
use idphoto_core::photo::{render_composite, render_crop};
use idphoto_core::surface::RasterFactory;
use idphoto_core::{CropArea, Flip, Resolution};
use wasm_bindgen::prelude::*;

/// Crop a rotated region of a photo to the target resolution.
///
/// The photo is rotated about its center on a surface sized to its rotated
/// bounding box, then the `(x, y, width, height)` region of that surface is
/// sampled into a 3x supersampled output with a white backing.
///
/// # Arguments
///
/// * `image` - Decoded source photo
/// * `x` / `y` / `width` / `height` - Crop region in rotated-surface pixels
/// * `rotation` - Rotation angle in degrees
/// * `flip_horizontal` / `flip_vertical` - Optional mirroring
/// * `out_width` / `out_height` - Target resolution (the JPEG is 3x this)
///
/// # Returns
///
/// JPEG bytes at quality 92.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn crop_photo(
    image: &JsDecodedImage,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
    flip_horizontal: bool,
    flip_vertical: bool,
    out_width: u32,
    out_height: u32,
) -> Result<Vec<u8>, JsValue> {
    let src = image.to_decoded();
    let jpeg = render_crop(
        &src,
        CropArea::new(x, y, width, height),
        rotation,
        Flip {
            horizontal: flip_horizontal,
            vertical: flip_vertical,
        },
        Resolution::new(out_width, out_height),
        &RasterFactory,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    jpeg.ok_or_else(|| JsValue::from_str("2D drawing surface unavailable"))
}

/// Composite a subject photo over a flat or gradient background.
///
/// Fills the output with `color` (a CSS color string), or with a radial
/// gradient from `color` at the center to a darkened shade at the edges when
/// `gradient > 0`, then draws the subject stretched to fill the output.
///
/// # Arguments
///
/// * `image` - Decoded subject photo, transparency preserved
/// * `color` - CSS background color (e.g. `"#438edb"`, `"white"`)
/// * `gradient` - Gradient intensity; `0` selects a flat fill
/// * `out_width` / `out_height` - Exact output resolution
///
/// # Returns
///
/// JPEG bytes at quality 92.
#[wasm_bindgen]
pub fn create_photo(
    image: &JsDecodedImage,
    color: &str,
    gradient: f64,
    out_width: u32,
    out_height: u32,
) -> Result<Vec<u8>, JsValue> {
    let src = image.to_decoded();
    let jpeg = render_composite(
        &src,
        color,
        gradient,
        Resolution::new(out_width, out_height),
        &RasterFactory,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    jpeg.ok_or_else(|| JsValue::from_str("2D drawing surface unavailable"))
}
