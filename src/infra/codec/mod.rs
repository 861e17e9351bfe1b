//! Payload codec building blocks.
pub mod bits;
pub mod traits;
