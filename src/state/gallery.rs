//! Gallery state: the cached item collection plus the creation draft.
//!
//! DESIGN
//! ======
//! One explicit state object owned by the client controller. `items` is only
//! ever replaced wholesale; the draft setters keep the preview registry in
//! step so at most one preview handle is live at a time.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use std::fmt;

use super::preview::{PreviewRegistry, PreviewUrl};
use crate::net::types::Item;
use crate::net::upload::ImageUpload;

/// Which request a notice refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Transient, dismissible message about a failed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub message: String,
}

/// Everything the view renders.
#[derive(Clone, Debug, Default)]
pub struct GalleryState {
    items: Vec<Item>,
    pending_image: Option<ImageUpload>,
    preview: Option<PreviewUrl>,
    description_draft: String,
    is_submitting: bool,
    notice: Option<Notice>,
    previews: PreviewRegistry,
}

impl GalleryState {
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Replace the cached collection with a fresh server payload.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    #[must_use]
    pub fn pending_image(&self) -> Option<&ImageUpload> {
        self.pending_image.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&PreviewUrl> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn description_draft(&self) -> &str {
        &self.description_draft
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, operation: Operation, message: impl Into<String>) {
        self.notice = Some(Notice { operation, message: message.into() });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Stage an image for the next create. Revokes the previous preview.
    pub fn select_image(&mut self, upload: ImageUpload) {
        self.revoke_preview();
        self.preview = Some(self.previews.create(&upload));
        self.pending_image = Some(upload);
    }

    /// Drop the staged image and its preview.
    pub fn clear_image(&mut self) {
        self.revoke_preview();
        self.pending_image = None;
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description_draft = text.into();
    }

    /// Reset the creation form.
    pub fn clear_draft(&mut self) {
        self.clear_image();
        self.description_draft.clear();
    }

    /// Number of preview handles not yet revoked.
    #[must_use]
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    fn revoke_preview(&mut self) {
        if let Some(old) = self.preview.take() {
            self.previews.revoke(&old);
        }
    }
}
