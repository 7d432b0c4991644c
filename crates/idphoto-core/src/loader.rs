//! Source image loading.
//!
//! Transforms receive their source as a string reference (a URL in the
//! original host environment) and resolve it through an [`ImageSource`].
//! The trait keeps the fetch mechanism out of the core: a browser host
//! implements it over fetch/Image, a native host over the filesystem or an
//! HTTP client, tests over [`MemorySource`].

use std::collections::HashMap;

use thiserror::Error;

use crate::decode::{decode_image, DecodeError, DecodedImage};

/// Error returned when a source reference cannot be resolved to pixels.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The reference could not be fetched.
    #[error("failed to fetch {reference:?}: {reason}")]
    Fetch {
        /// The unresolvable reference
        reference: String,
        /// Whatever the underlying mechanism reported, unnormalized
        reason: String,
    },

    /// The fetched bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Asynchronous resolver from a source reference to a decoded raster.
///
/// Loads are single-shot and not cancelable; no caching happens across
/// calls. Implementations that fetch over the network must request
/// anonymous-credentials (cross-origin-safe) decoding so the resulting
/// raster can be re-encoded without being treated as tainted.
pub trait ImageSource {
    /// Resolve `reference` into a decoded image.
    fn load(
        &self,
        reference: &str,
    ) -> impl std::future::Future<Output = Result<DecodedImage, LoadError>>;
}

/// In-memory [`ImageSource`] mapping references to encoded image bytes.
///
/// Used by tests and native embeddings that already hold the bytes.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under a reference.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }
}

impl ImageSource for MemorySource {
    async fn load(&self, reference: &str) -> Result<DecodedImage, LoadError> {
        let bytes = self.entries.get(reference).ok_or_else(|| LoadError::Fetch {
            reference: reference.to_string(),
            reason: "unknown reference".to_string(),
        })?;

        Ok(decode_image(bytes)?)
    }
}
