//! Common utilities for the Voxel editor.
//!
//! This crate provides shared infrastructure used by all editor components:
//! - **Notices** - deduplicated soft warnings, also kept for display to the user
//! - **Fetching** - blocking HTTP helpers and `data:` URL handling

pub mod net;
pub mod notice;
