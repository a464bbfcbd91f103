//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b (RFC 7693), keyed and unkeyed, producing
//! digests from 1 to 64 bytes.

pub mod blake2b;

pub use blake2b::{blake2b, Blake2bError};
