//! WASM bindings for image decoding.

use crate::types::JsDecodedImage;
use idphoto_core::decode::decode_image as core_decode;
use wasm_bindgen::prelude::*;

/// Decode an image file into RGBA pixels.
///
/// The format (JPEG or PNG) is detected from the bytes. Alpha is preserved,
/// so transparent regions of a PNG subject stay transparent for the
/// background composite.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes, e.g. from `file.arrayBuffer()`
///
/// # Errors
///
/// Throws a string error if the format is unrecognized or the file is
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    let decoded = core_decode(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsDecodedImage::from_decoded(decoded))
}
