//! Verified-style cryptographic primitives core
//!
//! This crate provides the two low-level building blocks that the rest of
//! the Nebula ecosystem's RSA and keyed-hashing code is built on:
//!
//! - a fixed-width 4096-bit bignum engine for RSA-class modular arithmetic,
//!   with constant-time and variable-time Montgomery exponentiation, and
//! - the BLAKE2b compression function and one-shot digest.
//!
//! The focus is on **clarity, predictability, and auditability**, rather
//! than on providing a large or high-level cryptographic API. All components
//! are dependency-free, explicit in their semantics, and suitable for
//! security-critical code.
//!
//! # Module overview
//!
//! - `bignum`
//!   A fixed-width 4096-bit multi-precision integer engine: limb-level
//!   arithmetic, schoolbook and Karatsuba multiplication, Montgomery
//!   reduction and exponentiation (variable-time and constant-time), and a
//!   byte-oriented façade suitable for RSA-class moduli.
//!
//! - `hash`
//!   Cryptographic hash primitives. Currently exposes BLAKE2b (RFC 7693),
//!   including optional keying and digests from 1 to 64 bytes.
//!
//! # Design goals
//!
//! - No heap allocations in the core bignum/hash routines, aside from the
//!   explicitly allocating constructors (`new_precompr2`,
//!   `new_bignum_from_bytes_be/le`).
//! - Minimal and explicit APIs: every fallible entry point returns either a
//!   boolean validity mask or a typed error — never a panic.
//! - Constant-time discipline where the specification calls for it: no
//!   branch or memory access in a `consttime` routine depends on a secret
//!   limb.
//!
//! This crate is not intended to replace full-featured, externally audited
//! cryptographic libraries, but to serve as a small, controlled foundation
//! for RSA-class modular arithmetic and BLAKE2b hashing.

pub mod bignum;
pub mod hash;
