//! Local preview handles for picked images.
//!
//! A preview URL has no meaning on the server. Each handle stays live until
//! revoked, so the owner must revoke the old one whenever a new image is
//! picked or the draft is cleared.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use std::collections::BTreeSet;
use std::fmt;

use crate::net::upload::ImageUpload;

/// A revocable, client-only reference to a pending image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewUrl {
    handle: u64,
    url: String,
}

impl PreviewUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Issues preview URLs and tracks which ones are still live.
#[derive(Clone, Debug, Default)]
pub struct PreviewRegistry {
    next_handle: u64,
    live: BTreeSet<u64>,
}

impl PreviewRegistry {
    /// Allocate a new live preview for `upload`.
    pub fn create(&mut self, upload: &ImageUpload) -> PreviewUrl {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.live.insert(handle);
        tracing::trace!(handle, file = %upload.file_name, "preview created");
        PreviewUrl { handle, url: format!("blob:gallery/{handle}/{}", upload.file_name) }
    }

    /// Release a preview. Returns `false` if it was already revoked.
    pub fn revoke(&mut self, preview: &PreviewUrl) -> bool {
        let removed = self.live.remove(&preview.handle);
        if removed {
            tracing::trace!(handle = preview.handle, "preview revoked");
        }
        removed
    }

    #[must_use]
    pub fn is_live(&self, preview: &PreviewUrl) -> bool {
        self.live.contains(&preview.handle)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
