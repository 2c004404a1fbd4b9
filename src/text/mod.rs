//! Text preparation for speech synthesis
//!
//! This module provides:
//! - Normalization of captured text (unwrapping hard line breaks)
//! - Chunking of normalized text into synthesis-sized pieces

pub mod chunk;
pub mod normalize;

pub use chunk::{chunk_text, Chunks};
pub use normalize::normalize_text;
