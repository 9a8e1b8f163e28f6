//! Decoding of numbers from byte buffers with a byte order that is only known at runtime.

mod byte_decoder;

pub use byte_decoder::*;
