//! Montgomery arithmetic
//!
//! Everything in this module operates on values already known to be valid
//! (`mont_check`'d) moduli and in-range operands; the validating façade
//! lives in [`crate::bignum::api`]. `mont_check` itself lives here because
//! it is purely a property of the modulus, independent of any particular
//! operation performed against it.

use super::limb::{add_carry, mod_inv_u64, mul_wide_add2};
use super::mul::karatsuba_mul;
use super::{Bignum4096, Bignum8192, LIMBS};

/// Returns the all-ones mask iff `n` is odd and greater than one, else the
/// all-zero mask.
///
/// Every Montgomery-domain operation requires an odd modulus greater than
/// one (oddness for the reduction step to be well defined, `n > 1` to rule
/// out the degenerate moduli 0 and 1). This is public-data logic — `n` is
/// the modulus, never a secret — so it is not written branch-free for its
/// own sake, only because the mask form composes cleanly with the rest of
/// the validation chain in `api`.
pub fn mont_check(n: &Bignum4096) -> u64 {
    let is_odd = (n.limbs()[0] & 1).wrapping_neg();
    let is_gt_one = !is_one_or_zero(n);
    is_odd & is_gt_one
}

/// Returns the all-ones mask iff `n` is 0 or 1.
fn is_one_or_zero(n: &Bignum4096) -> u64 {
    let mut acc = n.limbs()[0] & !1u64;
    for &limb in &n.limbs()[1..] {
        acc |= limb;
    }
    (acc == 0) as u64 * u64::MAX
}

/// Returns the bit length of `n`: `64 * top_index(n) + fls(n[top_index])`,
/// where `fls` ("find last set") is the 1-based index of the highest set
/// bit. Zero for `n == 0`.
pub fn n_bits(n: &Bignum4096) -> usize {
    let top = Bignum4096::top_index(n);
    let top_limb = n.limbs()[top];
    if top_limb == 0 {
        return 0;
    }
    64 * top + (64 - top_limb.leading_zeros() as usize)
}

/// Computes `R^2 mod n = 2^8192 mod n` into `res`.
///
/// Initializes `res` to `2^nBits` (the smallest power of two known to be
/// `>= n`, which is therefore already reduced mod n) and doubles modulo `n`
/// `8192 - nBits` times. Every intermediate value stays in `[0, n)`, so no
/// division is ever needed.
pub fn precomp(n_bits_val: usize, n: &Bignum4096, res: &mut Bignum4096) {
    *res = Bignum4096::ZERO;
    let limb = n_bits_val / 64;
    let bit = n_bits_val % 64;
    res.0[limb] = 1u64 << bit;

    for _ in 0..(8192 - n_bits_val) {
        let doubled = *res;
        add_mod_n(n, &doubled, &doubled, res);
    }
}

/// Computes `(a + b) mod n`, assuming `a, b < n`.
///
/// Performs the unreduced addition `s = a + b` (carry `c0`), then the
/// trial subtraction `t = s - n` (borrow `c1`). The true sum is `c0 *
/// 2^4096 + s`; subtracting `n` from it (valid exactly once, since `a, b <
/// n` implies the true sum is below `2n`) gives `c0 * 2^4096 + s - n = c0 *
/// 2^4096 + t - c1 * 2^4096 = t + (c0 - c1) * 2^4096`, which lands back in
/// `[0, 2^4096)` — and is therefore the correct reduced value — exactly
/// when `c0 == c1`; when `c0 != c1` the unreduced `s` was already the
/// answer. The final value is selected with a constant-time mask rather
/// than a conditional branch.
pub fn add_mod_n(n: &Bignum4096, a: &Bignum4096, b: &Bignum4096, res: &mut Bignum4096) {
    let mut s = Bignum4096::ZERO;
    let c0 = Bignum4096::add(a, b, &mut s);

    let mut t = Bignum4096::ZERO;
    let c1 = Bignum4096::sub(&s, n, &mut t);

    let carries_differ = (c0 ^ c1).wrapping_neg();
    Bignum4096::cmov(carries_differ, &s, &t, res);
}

/// Montgomery reduction: given a 128-limb value `c` (the product-domain
/// result of a multiplication against the `n`-modulus Montgomery system
/// with inverse constant `mu`), produces `c * R^-1 mod n` into `res`.
///
/// CIOS-style in place reduction: for each limb index `i` in `[0, 64)`,
/// computes `q = mu * c[i] mod 2^64` and folds `q * n`, shifted by `i`
/// limbs, into `c` via the fused multiply-add-add primitive. The carry
/// that falls out of that fold is combined with the running `top_carry`
/// bit and the existing content of `c[i + 64]` in a single three-input
/// add, touching exactly one limb beyond the inner loop's window per
/// outer iteration — there is no further limb-by-limb carry walk, so a
/// carry out of the last outer iteration never needs a 129th limb to
/// land in. After the outer loop the high 64 limbs of `c`, together with
/// `top_carry`, hold a value in `[0, 2n)`; a single conditional
/// subtraction brings it into `[0, n)`, with the final select driven by
/// whether `top_carry` and the subtraction's borrow agree.
pub fn reduction(n: &Bignum4096, mu: u64, c: &mut Bignum8192, res: &mut Bignum4096) {
    let mut top_carry = 0u64;
    for i in 0..LIMBS {
        let q = c.0[i].wrapping_mul(mu);

        let mut carry = 0u64;
        for j in 0..LIMBS {
            carry = mul_wide_add2(q, n.limbs()[j], carry, &mut c.0[i + j]);
        }

        let (c_out, sum) = add_carry(top_carry, carry, c.0[i + LIMBS]);
        c.0[i + LIMBS] = sum;
        top_carry = c_out;
    }

    let hi: [u64; LIMBS] = core::array::from_fn(|i| c.0[LIMBS + i]);
    let hi = Bignum4096::from_limbs(hi);

    let mut reduced = Bignum4096::ZERO;
    let borrow = Bignum4096::sub(&hi, n, &mut reduced);
    // `top_carry` tracks the bit that fell out past limb 127; the value
    // before the final subtraction is really `top_carry * 2^4096 + hi`.
    // That's in range (no further subtraction needed) exactly when
    // `top_carry` and `borrow` disagree, mirroring the carries_differ
    // mask in `add_mod_n`.
    let carries_differ = (top_carry ^ borrow).wrapping_neg();
    Bignum4096::cmov(carries_differ, &hi, &reduced, res);

    for limb in c.0.iter_mut() {
        *limb = 0;
    }
}

/// Montgomery-domain multiplication: `karatsuba_mul` followed by
/// [`reduction`], producing `(a_tilde * b_tilde * R^-1) mod n`.
pub fn mont_mul(
    n: &Bignum4096,
    mu: u64,
    a_tilde: &Bignum4096,
    b_tilde: &Bignum4096,
    res_tilde: &mut Bignum4096,
) {
    let mut product = Bignum8192::ZERO;
    karatsuba_mul(a_tilde, b_tilde, &mut product);
    reduction(n, mu, &mut product, res_tilde);
}

/// Montgomery-domain squaring: `karatsuba_sqr` followed by [`reduction`].
pub fn mont_sqr(n: &Bignum4096, mu: u64, a_tilde: &Bignum4096, res_tilde: &mut Bignum4096) {
    let mut product = Bignum8192::ZERO;
    super::mul::karatsuba_sqr(a_tilde, &mut product);
    reduction(n, mu, &mut product, res_tilde);
}

/// Computes `mu = -n[0]^-1 mod 2^64`, the Montgomery reduction constant.
pub fn mont_mu(n: &Bignum4096) -> u64 {
    mod_inv_u64(n.limbs()[0])
}

/// Moves `a` into the Montgomery domain: `a_tilde = a * R^2 * R^-1 mod n =
/// a * R mod n`, computed as a Montgomery multiplication by the
/// precomputed `r2`.
pub fn to_montgomery(n: &Bignum4096, mu: u64, r2: &Bignum4096, a: &Bignum4096, a_tilde: &mut Bignum4096) {
    mont_mul(n, mu, a, r2, a_tilde);
}

/// Moves `a_tilde` out of the Montgomery domain: pads it with 64 zero
/// limbs and runs it back through [`reduction`], yielding `a_tilde * R^-1
/// mod n = a mod n`.
pub fn from_montgomery(n: &Bignum4096, mu: u64, a_tilde: &Bignum4096, a: &mut Bignum4096) {
    let mut padded = Bignum8192::ZERO;
    padded.0[..LIMBS].copy_from_slice(a_tilde.limbs());
    reduction(n, mu, &mut padded, a);
}

/// Reduces an arbitrary 128-limb value `c` (with `c < n * R`, in particular
/// any `c < n^2`) modulo `n` via the Montgomery machinery, given a
/// precomputed `r2 = R^2 mod n`. Used by the `API`-level `modulo` entry
/// point.
///
/// Two REDC passes recover a plain residue with no general long-division
/// routine: the first, `x1 = REDC(c) = c * R^-1 mod n`, strips one factor of
/// `R`; the second folds it back in via `r2` while reducing,
/// `REDC(x1 * r2) = x1 * R^2 * R^-1 mod n = x1 * R mod n = c mod n`. That
/// second REDC call's output *is* the final plain-domain result — unlike
/// [`mont_mul`]'s ordinary callers, there is no further [`from_montgomery`]
/// step here, since `c` was never a Montgomery-domain operand to begin with.
pub fn mod_reduce(n: &Bignum4096, mu: u64, r2: &Bignum4096, c: &Bignum8192, res: &mut Bignum4096) {
    let mut x1 = Bignum4096::ZERO;
    let mut scratch = *c;
    reduction(n, mu, &mut scratch, &mut x1);

    mont_mul(n, mu, &x1, r2, res);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_modulus() -> Bignum4096 {
        // n = 2^4096 - 189 (a small odd offset from the top so (n-1) is
        // easy to reason about by hand), chosen only to exercise the
        // reduction machinery with realistic limb widths.
        let mut limbs = [u64::MAX; LIMBS];
        limbs[0] = u64::MAX - 188;
        Bignum4096::from_limbs(limbs)
    }

    #[test]
    fn mont_check_rejects_even_and_trivial() {
        assert_eq!(mont_check(&small_modulus()), u64::MAX);
        assert_eq!(mont_check(&Bignum4096::ZERO), 0);
        assert_eq!(mont_check(&Bignum4096::ONE), 0);

        let mut even = small_modulus();
        even.0[0] &= !1;
        assert_eq!(mont_check(&even), 0);
    }

    #[test]
    fn n_bits_matches_leading_limb() {
        let mut limbs = [0u64; LIMBS];
        limbs[3] = 0b1011;
        let n = Bignum4096::from_limbs(limbs);
        assert_eq!(n_bits(&n), 64 * 3 + 4);
    }

    #[test]
    fn add_mod_n_reduces_when_needed() {
        let n = small_modulus();
        let mut a = Bignum4096::ZERO;
        a.0[0] = 100;
        let mut b = Bignum4096::ZERO;
        b.0[0] = 150; // a + b = 250 >= 189 offset pattern triggers reduction path for this n

        let mut res = Bignum4096::ZERO;
        add_mod_n(&n, &a, &b, &mut res);

        // Manually recompute using wide add + conditional subtraction.
        let mut sum = Bignum4096::ZERO;
        let c0 = Bignum4096::add(&a, &b, &mut sum);
        let mut reduced = Bignum4096::ZERO;
        let c1 = Bignum4096::sub(&sum, &n, &mut reduced);
        let expect = if c0 == c1 { reduced } else { sum };
        assert_eq!(res, expect);
    }

    #[test]
    fn mont_round_trip_identity() {
        let n = small_modulus();
        let nb = n_bits(&n);
        let mu = mont_mu(&n);

        let mut r2 = Bignum4096::ZERO;
        precomp(nb, &n, &mut r2);

        let mut a = Bignum4096::ZERO;
        a.0[0] = 12345;

        let mut a_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &a, &mut a_tilde);

        let mut back = Bignum4096::ZERO;
        from_montgomery(&n, mu, &a_tilde, &mut back);

        assert_eq!(back, a);
    }

    #[test]
    fn mont_mul_agrees_with_plain_product_mod_n() {
        let n = small_modulus();
        let nb = n_bits(&n);
        let mu = mont_mu(&n);

        let mut r2 = Bignum4096::ZERO;
        precomp(nb, &n, &mut r2);

        let mut a = Bignum4096::ZERO;
        a.0[0] = 7;
        let mut b = Bignum4096::ZERO;
        b.0[0] = 9;

        let mut a_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &a, &mut a_tilde);
        let mut b_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &b, &mut b_tilde);

        let mut prod_tilde = Bignum4096::ZERO;
        mont_mul(&n, mu, &a_tilde, &b_tilde, &mut prod_tilde);

        let mut prod = Bignum4096::ZERO;
        from_montgomery(&n, mu, &prod_tilde, &mut prod);

        // 7 * 9 = 63, well below n, so no modular wraparound to account for.
        assert_eq!(prod.limbs()[0], 63);
        assert!(prod.limbs()[1..].iter().all(|&l| l == 0));
    }

    #[test]
    fn mont_sqr_matches_mont_mul_self() {
        let n = small_modulus();
        let nb = n_bits(&n);
        let mu = mont_mu(&n);

        let mut r2 = Bignum4096::ZERO;
        precomp(nb, &n, &mut r2);

        let mut a = Bignum4096::ZERO;
        a.0[0] = 1234;
        let mut a_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &a, &mut a_tilde);

        let mut via_sqr = Bignum4096::ZERO;
        mont_sqr(&n, mu, &a_tilde, &mut via_sqr);

        let mut via_mul = Bignum4096::ZERO;
        mont_mul(&n, mu, &a_tilde, &a_tilde, &mut via_mul);

        assert_eq!(via_sqr, via_mul);
    }

    #[test]
    fn mont_sqr_of_operand_congruent_to_minus_one_drives_reduction_carry() {
        // a = n - 1 is as large as a valid operand gets, so its Montgomery
        // product lands right at the top of REDC's [0, 2n) output range —
        // exactly the regime that needs `reduction`'s top carry bit
        // threaded through instead of dropped. Closed form: (n-1)^2 mod n
        // is 1 for any n, so no external bignum reference is needed.
        let n = small_modulus();
        let nb = n_bits(&n);
        let mu = mont_mu(&n);

        let mut r2 = Bignum4096::ZERO;
        precomp(nb, &n, &mut r2);

        let mut a = Bignum4096::ZERO;
        Bignum4096::sub(&n, &Bignum4096::ONE, &mut a);

        let mut a_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &a, &mut a_tilde);

        let mut sq_tilde = Bignum4096::ZERO;
        mont_sqr(&n, mu, &a_tilde, &mut sq_tilde);

        let mut sq = Bignum4096::ZERO;
        from_montgomery(&n, mu, &sq_tilde, &mut sq);

        assert_eq!(sq, Bignum4096::ONE);
    }

    #[test]
    fn mont_mul_of_two_distinct_near_n_operands_drives_reduction_carry() {
        // (n-1)*(n-2) mod n == 2 for any n: another closed form, this time
        // exercising the high-carry path with two distinct large operands
        // instead of one value squared against itself.
        let n = small_modulus();
        let nb = n_bits(&n);
        let mu = mont_mu(&n);

        let mut r2 = Bignum4096::ZERO;
        precomp(nb, &n, &mut r2);

        let mut a = Bignum4096::ZERO;
        Bignum4096::sub(&n, &Bignum4096::ONE, &mut a);
        let mut two = Bignum4096::ZERO;
        two.0[0] = 2;
        let mut b = Bignum4096::ZERO;
        Bignum4096::sub(&n, &two, &mut b);

        let mut a_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &a, &mut a_tilde);
        let mut b_tilde = Bignum4096::ZERO;
        to_montgomery(&n, mu, &r2, &b, &mut b_tilde);

        let mut prod_tilde = Bignum4096::ZERO;
        mont_mul(&n, mu, &a_tilde, &b_tilde, &mut prod_tilde);

        let mut prod = Bignum4096::ZERO;
        from_montgomery(&n, mu, &prod_tilde, &mut prod);

        let mut expect = Bignum4096::ZERO;
        expect.0[0] = 2;
        assert_eq!(prod, expect);
    }
}
