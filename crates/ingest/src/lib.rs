//! Resume PDF text extraction for Concierge.
//!
//! One operation: turn an uploaded PDF byte buffer into the concatenated
//! page text that becomes the profile context. Parse failures stay inside
//! `IngestError` and are shown as a benign string at the upload call site.

pub mod pdf;

pub use pdf::{NO_TEXT_FOUND, extract_text};
