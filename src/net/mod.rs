//! Networking modules for the item server.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the REST calls, `types` defines the wire schema, and
//! `upload` loads the image files sent with a create request.

pub mod api;
pub mod types;
pub mod upload;
