//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Typed resources and request bodies, as they appear on the wire
//! - `client.rs` — Sub-client with the HTTP methods for that resource

pub mod mute;
pub mod post;
pub mod user;
