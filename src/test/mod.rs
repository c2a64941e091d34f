//! Builders for synthetic metadata images.
//!
//! [`ImageBuilder`] lives in its own std-only file so the integration tests under `tests/`
//! can include the very same code with `#[path]`.

#![allow(dead_code)]


pub use image::*;
