use super::*;
use chrono::FixedOffset;

use crate::net::types::Item;
use crate::net::upload::ImageUpload;
use crate::state::gallery::Operation;

fn item(id: i64, description: &str, created_at: &str) -> Item {
    Item {
        id: ItemId::Number(id),
        image_url: "u".to_owned(),
        description: description.to_owned(),
        created_at: created_at.to_owned(),
    }
}

// =============================================================
// format_created_at
// =============================================================

#[test]
fn format_rfc3339_in_utc() {
    assert_eq!(format_created_at("2024-01-01T00:00:00Z", &Utc), "2024-01-01 00:00:00");
}

#[test]
fn format_rfc3339_shifts_to_target_zone() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    assert_eq!(
        format_created_at("2024-01-01T23:30:00+00:00", &plus_two),
        "2024-01-02 01:30:00"
    );
}

#[test]
fn format_naive_timestamps_as_utc() {
    assert_eq!(format_created_at("2024-03-05 08:09:10", &Utc), "2024-03-05 08:09:10");
    assert_eq!(format_created_at("2024-03-05T08:09:10.123456", &Utc), "2024-03-05 08:09:10");
}

#[test]
fn format_unparseable_is_verbatim() {
    assert_eq!(format_created_at("yesterday", &Utc), "yesterday");
}

// =============================================================
// build_in
// =============================================================

#[test]
fn empty_state_has_no_cards_and_enabled_submit() {
    let view = build_in(&GalleryState::default(), &Utc);
    assert!(view.cards.is_empty());
    assert!(view.form.file.is_none());
    assert!(view.form.preview_url.is_none());
    assert_eq!(view.form.submit_label, SUBMIT_LABEL);
    assert!(view.form.submit_enabled);
    assert!(view.to_string().contains("No items yet."));
}

#[test]
fn cards_follow_item_order() {
    let mut state = GalleryState::default();
    state.replace_items(vec![
        item(2, "second", "2024-01-02T00:00:00Z"),
        item(1, "first", "2024-01-01T00:00:00Z"),
    ]);
    let view = build_in(&state, &Utc);
    let descriptions: Vec<_> = view.cards.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(descriptions, vec!["second", "first"]);
    assert_eq!(view.cards[1].created_at, "2024-01-01 00:00:00");
}

#[test]
fn submitting_disables_and_relabels() {
    let mut state = GalleryState::default();
    state.set_submitting(true);
    let view = build_in(&state, &Utc);
    assert!(!view.form.submit_enabled);
    assert_eq!(view.form.submit_label, SUBMITTING_LABEL);
    assert!(view.to_string().contains("[ Uploading... ] (disabled)"));
}

#[test]
fn draft_fields_are_shown() {
    let mut state = GalleryState::default();
    state.select_image(ImageUpload::new("cat.png", vec![1; 10]).unwrap());
    state.set_description("a cat");
    let view = build_in(&state, &Utc);
    assert_eq!(view.form.file.as_deref(), Some("cat.png (10 bytes)"));
    assert!(view.form.preview_url.as_deref().is_some_and(|u| u.starts_with("blob:gallery/")));
    assert_eq!(view.form.description, "a cat");
}

#[test]
fn notice_is_rendered() {
    let mut state = GalleryState::default();
    state.set_notice(Operation::Update, "server returned HTTP 404");
    let view = build_in(&state, &Utc);
    assert_eq!(view.notice.as_deref(), Some("update failed: server returned HTTP 404"));
    assert!(view.to_string().contains("! update failed: server returned HTTP 404"));
}

#[test]
fn build_is_deterministic() {
    let mut state = GalleryState::default();
    state.replace_items(vec![item(1, "sunset", "2024-01-01T00:00:00Z")]);
    assert_eq!(build_in(&state, &Utc), build_in(&state, &Utc));
}

#[test]
fn card_display_lists_actions() {
    let card = CardView {
        id: ItemId::Number(1),
        image_url: "u".to_owned(),
        description: "sunset".to_owned(),
        created_at: "2024-01-01 00:00:00".to_owned(),
    };
    let text = card.to_string();
    assert!(text.starts_with("#1  sunset\n"));
    assert!(text.contains("[edit 1] [delete 1]"));
}
