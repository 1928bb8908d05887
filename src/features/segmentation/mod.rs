//! Harmonic segmentation
//!
//! Clusters chroma frames into a small number of contiguous harmonic
//! segments and reports the boundaries between them.

pub mod agglomerative;

pub use agglomerative::{segment_frames, Segmentation};
