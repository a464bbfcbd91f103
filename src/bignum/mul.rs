//! Wide multiplication: schoolbook and Karatsuba
//!
//! This module computes the full 8192-bit product of two 4096-bit
//! operands. Below a small limb-count cutoff it falls back to schoolbook
//! (quadratic) multiplication; above it, a recursive three-multiply
//! Karatsuba decomposition is used.
//!
//! No modular semantics live here: the result interpreted little-endian
//! equals the exact integer product of the inputs.

use super::limb::{add_carry, mul_wide_add2, sub_borrow};
use super::{Bignum4096, Bignum8192, LIMBS};

/// Limb count at or below which multiplication switches to schoolbook.
///
/// Below this width the O(n^2) schoolbook algorithm's smaller constant
/// factor outweighs Karatsuba's better asymptotic complexity.
const SCHOOLBOOK_CUTOFF: usize = 8;

/// Upper bound on the "half" width passed to any recursive call reached
/// from a top-level 64-limb multiplication (64 -> 32 -> 16 -> 8, at which
/// point the cutoff above stops the recursion). Local scratch buffers are
/// sized against this bound so that every recursion level can reuse plain
/// stack arrays with no heap allocation.
const MAX_HALF: usize = LIMBS / 2;

/// Computes the full product `a * b` into a [`Bignum8192`].
pub fn karatsuba_mul(a: &Bignum4096, b: &Bignum4096, res: &mut Bignum8192) {
    res.0 = [0u64; super::WIDE_LIMBS];
    karatsuba_rec(&a.0, &b.0, &mut res.0);
}

/// Computes `a * a` into a [`Bignum8192`].
///
/// Squaring-specific shortcuts (skipping the redundant cross-multiply) are
/// a performance optimization, not a semantic requirement; this delegates
/// to [`karatsuba_mul`] directly, which is exactly as correct and far
/// simpler to audit.
pub fn karatsuba_sqr(a: &Bignum4096, res: &mut Bignum8192) {
    karatsuba_mul(a, a, res);
}

/// Recursive Karatsuba core, operating on equal-length limb slices.
///
/// `a` and `b` must have the same length `n`; `res` must have length `2n`
/// and need not be pre-zeroed (it is fully overwritten).
fn karatsuba_rec(a: &[u64], b: &[u64], res: &mut [u64]) {
    let n = a.len();
    debug_assert_eq!(b.len(), n);
    debug_assert_eq!(res.len(), 2 * n);

    if n <= SCHOOLBOOK_CUTOFF {
        schoolbook_mul(a, b, res);
        return;
    }

    let half = n / 2;
    let (a_lo, a_hi) = a.split_at(half);
    let (b_lo, b_hi) = b.split_at(half);

    let mut low = [0u64; 2 * MAX_HALF];
    karatsuba_rec(a_lo, b_lo, &mut low[..2 * half]);

    let mut high = [0u64; 2 * MAX_HALF];
    karatsuba_rec(a_hi, b_hi, &mut high[..2 * half]);

    let mut sum_a = [0u64; MAX_HALF + 1];
    sum_a[half] = add_into_fresh(&mut sum_a[..half], a_lo, a_hi);

    let mut sum_b = [0u64; MAX_HALF + 1];
    sum_b[half] = add_into_fresh(&mut sum_b[..half], b_lo, b_hi);

    let mid_len = 2 * (half + 1);
    let mut mid = [0u64; 2 * (MAX_HALF + 1)];
    karatsuba_rec(&sum_a[..half + 1], &sum_b[..half + 1], &mut mid[..mid_len]);

    // middle = mid - low - high = a_lo*b_hi + a_hi*b_lo
    sub_in_place(&mut mid[..mid_len], &low[..2 * half]);
    sub_in_place(&mut mid[..mid_len], &high[..2 * half]);

    for slot in res.iter_mut() {
        *slot = 0;
    }
    add_in_place(&mut res[..2 * half], &low[..2 * half]);
    add_in_place(&mut res[half..half + mid_len], &mid[..mid_len]);
    add_in_place(&mut res[2 * half..2 * n], &high[..2 * half]);
}

/// Computes `x + y` into `dst` (length `half`), returning the carry out of
/// the top limb (0 or 1) rather than dropping it, since Karatsuba's
/// "sum of halves" operands are one limb wider than either half alone.
fn add_into_fresh(dst: &mut [u64], x: &[u64], y: &[u64]) -> u64 {
    let mut carry = 0u64;
    for i in 0..dst.len() {
        let (c, s) = add_carry(carry, x[i], y[i]);
        dst[i] = s;
        carry = c;
    }
    carry
}

/// Adds `src` into `dst` in place, propagating the carry into the limbs of
/// `dst` beyond `src`'s length. `dst` must be long enough to absorb any
/// carry (guaranteed by the Karatsuba identity for all call sites above).
fn add_in_place(dst: &mut [u64], src: &[u64]) {
    let mut carry = 0u64;
    for i in 0..src.len() {
        let (c, s) = add_carry(carry, dst[i], src[i]);
        dst[i] = s;
        carry = c;
    }
    let mut i = src.len();
    while carry != 0 {
        let (c, s) = add_carry(carry, dst[i], 0);
        dst[i] = s;
        carry = c;
        i += 1;
    }
}

/// Subtracts `src` from `dst` in place, propagating the borrow into the
/// limbs of `dst` beyond `src`'s length.
fn sub_in_place(dst: &mut [u64], src: &[u64]) {
    let mut borrow = 0u64;
    for i in 0..src.len() {
        let (b, d) = sub_borrow(borrow, dst[i], src[i]);
        dst[i] = d;
        borrow = b;
    }
    let mut i = src.len();
    while borrow != 0 {
        let (b, d) = sub_borrow(borrow, dst[i], 0);
        dst[i] = d;
        borrow = b;
        i += 1;
    }
}

/// Schoolbook (quadratic) multiplication: `res[i+j]` accumulates
/// `a[i] * b[j]` for every pair, with carries propagated column by column.
fn schoolbook_mul(a: &[u64], b: &[u64], res: &mut [u64]) {
    for slot in res.iter_mut() {
        *slot = 0;
    }

    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            carry = mul_wide_add2(ai, bj, carry, &mut res[i + j]);
        }
        let mut k = i + b.len();
        while carry != 0 {
            let (c, s) = add_carry(0, res[k], carry);
            res[k] = s;
            carry = c;
            k += 1;
        }
    }
}
