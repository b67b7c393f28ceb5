//! Mute domain — users the current account has muted.

#[cfg(feature = "http")]
pub mod client;

use crate::domain::user::PublicUser;

/// A muted user. Same shape as [`PublicUser`] on the wire.
pub type MutedUser = PublicUser;
