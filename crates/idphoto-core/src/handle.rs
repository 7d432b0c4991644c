//! Output handles and the blob registry.
//!
//! A finished transform publishes its encoded JPEG into a [`BlobRegistry`]
//! and hands the caller an opaque [`OutputHandle`]. The registry is the
//! host's create/revoke object-URL mechanism behind a trait; revocation is
//! explicit and owned by the caller - the core never revokes a handle it
//! created, so unreleased handles accumulate until revoked.

use std::collections::HashMap;

/// Opaque, revocable reference to a published blob.
///
/// The empty handle is the documented sentinel for the
/// context-unavailable path; callers must check [`OutputHandle::is_empty`]
/// before resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputHandle(String);

impl OutputHandle {
    /// Wrap a host handle string.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The degenerate sentinel handle.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the context-unavailable sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A published blob: encoded bytes plus their MIME type.
#[derive(Debug, Clone)]
pub struct BlobEntry {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Host registry mapping handles to encoded blobs.
///
/// Publication never fails; revocation reports whether the handle was
/// still live.
pub trait BlobRegistry {
    /// Publish encoded bytes and return a fresh handle.
    fn publish(&mut self, bytes: Vec<u8>, mime: &str) -> OutputHandle;

    /// Release a handle. Returns false if it was unknown or already
    /// revoked.
    fn revoke(&mut self, handle: &OutputHandle) -> bool;
}

/// In-memory [`BlobRegistry`] for native embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryBlobRegistry {
    next_id: u64,
    blobs: HashMap<String, BlobEntry>,
}

impl MemoryBlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a live handle to its blob.
    pub fn get(&self, handle: &OutputHandle) -> Option<&BlobEntry> {
        self.blobs.get(handle.as_str())
    }

    /// Number of live (unrevoked) blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobRegistry for MemoryBlobRegistry {
    fn publish(&mut self, bytes: Vec<u8>, mime: &str) -> OutputHandle {
        let id = self.next_id;
        self.next_id += 1;

        let handle = format!("blob:memory/{id}");
        self.blobs.insert(
            handle.clone(),
            BlobEntry {
                mime: mime.to_string(),
                bytes,
            },
        );
        OutputHandle::new(handle)
    }

    fn revoke(&mut self, handle: &OutputHandle) -> bool {
        self.blobs.remove(handle.as_str()).is_some()
    }
}
