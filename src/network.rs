//! Network defaults for the blog API.

/// Default backend host (the development server).
pub const DEFAULT_HOST: &str = "http://localhost:5233";

/// Path segment every endpoint lives under.
pub const API_ROOT: &str = "api";
