//! Client-side state modules.
//!
//! DESIGN
//! ======
//! `gallery` holds the cached collection and creation draft; `preview`
//! manages the local handles shown for a picked image.

pub mod gallery;
pub mod preview;
