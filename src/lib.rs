//! # item-gallery
//!
//! Terminal client for an image-item REST server: create items from an
//! image and a description, list them, edit descriptions, and delete them.
//!
//! The crate keeps one state container (`state`), talks to the server
//! through the `net::api::ItemApi` seam, and renders a text view that is a
//! pure function of state (`view`). `client::GalleryClient` ties the three
//! together with the refetch-after-every-mutation flow; `shell` and the
//! `gallery` binary drive it from the terminal.

pub mod client;
pub mod config;
pub mod net;
pub mod prompt;
pub mod shell;
pub mod state;
pub mod view;
