//! Input handling
//!
//! Decoding audio files to PCM is a caller concern; the pipeline accepts
//! samples that are already mono floats in [-1.0, 1.0].

pub mod sample_buffer;

pub use sample_buffer::SampleBuffer;
