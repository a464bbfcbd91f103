//! Fixed-width 4096-bit bignum engine
//!
//! This module defines [`Bignum4096`], a fixed-size 4096-bit unsigned
//! integer used as the modulus, base, and result type throughout the
//! engine, together with the wide product-domain scratch type
//! [`Bignum8192`].
//!
//! The internal representation is **little-endian limbs**: index 0 holds
//! the least significant 64 bits. This is the representation the
//! Montgomery and Karatsuba routines are written against; it is exposed
//! only through the byte-oriented (de)serialization functions below and
//! through [`crate::bignum::api`], never through direct limb indexing from
//! outside the crate.
//!
//! Submodules:
//! - [`limb`] — single-limb arithmetic and branch-free masks
//! - [`mul`] — schoolbook and Karatsuba multiplication
//! - [`mont`] — Montgomery reduction and multiplication
//! - [`exp`] — modular exponentiation (binary method, fixed window)
//! - [`api`] — the public façade tying the above into validated entry points

pub mod api;
pub mod exp;
pub mod limb;
pub mod mont;
pub mod mul;

use core::fmt::{Display, Formatter, Result as FmtResult};
use limb::{add_carry, choose, sub_borrow};

/// Number of 64-bit limbs in a 4096-bit bignum.
pub const LIMBS: usize = 64;

/// Number of 64-bit limbs in an 8192-bit (product-domain) bignum.
pub const WIDE_LIMBS: usize = 128;

/// Fixed-size 4096-bit unsigned integer.
///
/// Stored as 64 little-endian 64-bit limbs (`self.0[0]` is the least
/// significant limb). Represents an integer in `[0, 2^4096)` with no
/// redundant representation and no in-band length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bignum4096(pub(crate) [u64; LIMBS]);

/// Fixed-size 8192-bit unsigned integer.
///
/// Used exclusively as product-domain scratch space: the output of a
/// 64-limb-by-64-limb multiplication and the input to Montgomery
/// reduction. Never constructed directly by callers outside this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bignum8192(pub(crate) [u64; WIDE_LIMBS]);

impl Bignum4096 {
    /// The value zero.
    pub const ZERO: Self = Self([0u64; LIMBS]);

    /// The value one.
    pub const ONE: Self = Self::one_le();

    /// The maximum representable value (2^4096 - 1).
    pub const MAX: Self = Self([u64::MAX; LIMBS]);

    /// Returns the value one encoded in little-endian limb form.
    pub const fn one_le() -> Self {
        let mut out = [0u64; LIMBS];
        out[0] = 1;
        Bignum4096(out)
    }

    /// Builds a bignum directly from little-endian limbs.
    pub const fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        Bignum4096(limbs)
    }

    /// Returns the little-endian limbs backing this value.
    pub const fn limbs(&self) -> &[u64; LIMBS] {
        &self.0
    }

    /// Returns `true` iff every limb is zero.
    ///
    /// Constant-time: ORs every limb together rather than early-exiting on
    /// the first nonzero one.
    pub fn is_zero(&self) -> bool {
        self.0.iter().fold(0u64, |acc, &limb| acc | limb) == 0
    }

    /// Writes `a + b mod 2^4096` into `self`, returning the carry out of
    /// the top limb.
    pub fn add(a: &Bignum4096, b: &Bignum4096, res: &mut Bignum4096) -> u64 {
        let mut c = 0u64;
        for i in 0..LIMBS {
            let (c_out, s) = add_carry(c, a.0[i], b.0[i]);
            res.0[i] = s;
            c = c_out;
        }
        c
    }

    /// Writes `a - b mod 2^4096` into `self`, returning the borrow out of
    /// the top limb.
    pub fn sub(a: &Bignum4096, b: &Bignum4096, res: &mut Bignum4096) -> u64 {
        let mut c = 0u64;
        for i in 0..LIMBS {
            let (c_out, d) = sub_borrow(c, a.0[i], b.0[i]);
            res.0[i] = d;
            c = c_out;
        }
        c
    }

    /// Conditionally moves `a_if_mask1` into `dst` when `mask` is all-ones,
    /// or leaves `dst` holding `a_if_mask0`'s limbs when `mask` is zero.
    ///
    /// Per-limb `(mask & x) | (!mask & y)`; no branch ever reads `mask`.
    pub fn cmov(mask: u64, a_if_mask1: &Bignum4096, a_if_mask0: &Bignum4096, dst: &mut Bignum4096) {
        for i in 0..LIMBS {
            dst.0[i] = choose(mask, a_if_mask1.0[i], a_if_mask0.0[i]);
        }
    }

    /// Returns the 0-based index of the most significant nonzero limb, or
    /// 0 if `a` is zero.
    ///
    /// Intended for use only on public values (the modulus `n`), since the
    /// index it returns is a data-dependent branch on `a`'s magnitude.
    pub fn top_index(a: &Bignum4096) -> usize {
        let mut top = 0usize;
        for i in 0..LIMBS {
            if a.0[i] != 0 {
                top = i;
            }
        }
        top
    }

    /// Loads a 4096-bit bignum from a 512-byte big-endian buffer.
    pub fn from_bytes_be(bytes: &[u8; 512]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            limbs[LIMBS - 1 - i] = u64::from_be_bytes(chunk.try_into().unwrap());
        }
        Bignum4096(limbs)
    }

    /// Loads a 4096-bit bignum from a 512-byte little-endian buffer.
    pub fn from_bytes_le(bytes: &[u8; 512]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            limbs[i] = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        Bignum4096(limbs)
    }

    /// Serializes this value into exactly 512 big-endian bytes, most
    /// significant byte first.
    pub fn to_bytes_be(&self) -> [u8; 512] {
        let mut out = [0u8; 512];
        for (i, limb) in self.0.iter().enumerate() {
            out[(LIMBS - 1 - i) * 8..(LIMBS - i) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Serializes this value into exactly 512 little-endian bytes, least
    /// significant byte first.
    pub fn to_bytes_le(&self) -> [u8; 512] {
        let mut out = [0u8; 512];
        for (i, limb) in self.0.iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }
}

impl Bignum8192 {
    /// The value zero.
    pub const ZERO: Self = Self([0u64; WIDE_LIMBS]);

    /// Builds a wide bignum directly from little-endian limbs.
    pub const fn from_limbs(limbs: [u64; WIDE_LIMBS]) -> Self {
        Bignum8192(limbs)
    }

    /// Returns the little-endian limbs backing this value.
    pub const fn limbs(&self) -> &[u64; WIDE_LIMBS] {
        &self.0
    }

    /// Loads an 8192-bit bignum from a 1024-byte big-endian buffer.
    pub fn from_bytes_be(bytes: &[u8; 1024]) -> Self {
        let mut limbs = [0u64; WIDE_LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            limbs[WIDE_LIMBS - 1 - i] = u64::from_be_bytes(chunk.try_into().unwrap());
        }
        Bignum8192(limbs)
    }
}

/// Manual `Default` for [`Bignum4096`].
///
/// Mirrors the teacher crate's manual `Default for U512`: large fixed-size
/// arrays did not always get a blanket `Default` impl, and writing it out
/// explicitly keeps the type usable as a struct field default regardless.
impl Default for Bignum4096 {
    fn default() -> Self {
        Bignum4096::ZERO
    }
}

impl Default for Bignum8192 {
    fn default() -> Self {
        Bignum8192::ZERO
    }
}

impl Display for Bignum4096 {
    /// Formats the value as a colon-separated big-endian hexadecimal byte
    /// string, e.g. `00:1F:A4:...`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let bytes = self.to_bytes_be();
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
