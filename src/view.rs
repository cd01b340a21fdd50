//! Text view of the gallery.
//!
//! `build` is a pure function of [`GalleryState`]: the same state always
//! produces the same [`GalleryView`], and `Display` turns that into the
//! text printed by the CLI.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::net::types::ItemId;
use crate::state::gallery::GalleryState;

pub const TITLE: &str = "Image Gallery";
pub const SUBMIT_LABEL: &str = "Add";
pub const SUBMITTING_LABEL: &str = "Uploading...";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryView {
    pub form: FormView,
    pub notice: Option<String>,
    pub cards: Vec<CardView>,
}

/// The creation form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    /// Name and size of the picked file, `None` when the file input is empty.
    pub file: Option<String>,
    pub preview_url: Option<String>,
    pub description: String,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

/// One grid card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub id: ItemId,
    pub image_url: String,
    pub description: String,
    pub created_at: String,
}

/// Build the view with timestamps in the local time zone.
#[must_use]
pub fn build(state: &GalleryState) -> GalleryView {
    build_in(state, &Local)
}

/// Build the view with timestamps rendered in `tz`.
#[must_use]
pub fn build_in<Tz: TimeZone>(state: &GalleryState, tz: &Tz) -> GalleryView
where
    Tz::Offset: fmt::Display,
{
    let submitting = state.is_submitting();
    let form = FormView {
        file: state
            .pending_image()
            .map(|image| format!("{} ({} bytes)", image.file_name, image.len())),
        preview_url: state.preview().map(|p| p.as_str().to_owned()),
        description: state.description_draft().to_owned(),
        submit_label: if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL },
        submit_enabled: !submitting,
    };
    let notice = state
        .notice()
        .map(|n| format!("{} failed: {}", n.operation, n.message));
    let cards = state
        .items()
        .iter()
        .map(|item| CardView {
            id: item.id.clone(),
            image_url: item.image_url.clone(),
            description: item.description.clone(),
            created_at: format_created_at(&item.created_at, tz),
        })
        .collect();
    GalleryView { form, notice, cards }
}

/// Format a server timestamp in `tz`. RFC 3339 is tried first, then naive
/// date-times (taken as UTC). Anything else is returned unchanged.
#[must_use]
pub fn format_created_at<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    parse_timestamp(raw).map_or_else(
        || raw.to_owned(),
        |utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string(),
    )
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|naive| naive.and_utc())
}

impl fmt::Display for GalleryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;
        writeln!(f)?;

        let form = &self.form;
        writeln!(f, "Add a new item")?;
        writeln!(f, "  image:       {}", form.file.as_deref().unwrap_or("(none)"))?;
        if let Some(preview) = &form.preview_url {
            writeln!(f, "  preview:     {preview}")?;
        }
        writeln!(f, "  description: {}", form.description)?;
        if form.submit_enabled {
            writeln!(f, "  [ {} ]", form.submit_label)?;
        } else {
            writeln!(f, "  [ {} ] (disabled)", form.submit_label)?;
        }

        if let Some(notice) = &self.notice {
            writeln!(f)?;
            writeln!(f, "! {notice} (type `dismiss` to hide)")?;
        }

        writeln!(f)?;
        let heading = format!("Items ({})", self.cards.len());
        writeln!(f, "{heading}")?;
        writeln!(f, "{}", "-".repeat(heading.len()))?;
        if self.cards.is_empty() {
            writeln!(f, "No items yet.")?;
        }
        for card in &self.cards {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{}  {}", self.id, self.description)?;
        writeln!(f, "    image:   {}", self.image_url)?;
        writeln!(f, "    created: {}", self.created_at)?;
        writeln!(f, "    [edit {0}] [delete {0}]", self.id)
    }
}
