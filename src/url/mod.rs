//! URL handling module for Docweave
//!
//! This module provides link resolution, URL normalization and host matching.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_host};
pub use normalize::{normalize_parsed, normalize_url, resolve_link, same_document};
