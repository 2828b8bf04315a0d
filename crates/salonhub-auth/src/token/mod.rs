//! Session token claims and decoding.

pub mod claims;
pub mod decoder;

pub use claims::{Claims, DecodedToken};
pub use decoder::TokenDecoder;
