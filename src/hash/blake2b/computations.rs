//! BLAKE2b internal computations
//!
//! This module contains the G mixing function and the 12-round
//! permutation logic used by the compression function, as defined in
//! RFC 7693 §3.1–3.2. It is kept separate from the public hashing
//! interface for the same reasons the SHA-256 module splits `core` from
//! `computations`: the round logic is the part worth auditing in
//! isolation from block framing and padding.

use super::SIGMA;

/// BLAKE2b's core mixing primitive.
///
/// Mixes two message words `x`, `y` into the four working-vector limbs at
/// indices `a`, `b`, `c`, `d`, using the fixed rotation amounts 32, 24,
/// 16, 63.
#[inline(always)]
pub fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);

    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Runs all 12 rounds of the BLAKE2b permutation over the working vector
/// `v`, given the 16-word message schedule `m` loaded from the current
/// block.
///
/// Each round applies [`g`] first to the four columns `(0,4,8,12)`,
/// `(1,5,9,13)`, `(2,6,10,14)`, `(3,7,11,15)`, then to the four diagonals
/// `(0,5,10,15)`, `(1,6,11,12)`, `(2,7,8,13)`, `(3,4,9,14)`, with message
/// words selected by `SIGMA[round % 10]`.
pub fn all_rounds(v: &mut [u64; 16], m: &[u64; 16]) {
    for round in 0..12 {
        let s = &SIGMA[round % 10];

        g(v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(v, 3, 7, 11, 15, m[s[6]], m[s[7]]);

        g(v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }
}
