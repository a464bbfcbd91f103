//! Modular exponentiation
//!
//! Two algorithms, each with a variable-time and a constant-time flavor,
//! operating entirely in the Montgomery domain (callers convert the base
//! in and the result back out; see [`crate::bignum::api`]):
//!
//! - the **binary method**, used when the exponent's public bit bound
//!   `bBits` is below [`BINARY_METHOD_BIT_CUTOFF`]
//! - the **fixed-window method** (window width [`WINDOW_L`]), used
//!   otherwise
//!
//! Dispatch between the two is purely a function of `bBits`, which is
//! public by contract (see `spec`-level discussion of the exponent
//! representation): it is never secret-dependent.

use super::limb::eq_mask;
use super::mont::{mont_mul, mont_sqr, to_montgomery};
use super::Bignum4096;

/// Window width used by the fixed-window exponentiation method.
pub const WINDOW_L: usize = 4;

/// Size of the fixed-window precomputed power table, `2^WINDOW_L`.
const TABLE_SIZE: usize = 1 << WINDOW_L;

/// Exponent bit-bound below which the binary method is used instead of
/// the fixed-window method.
pub const BINARY_METHOD_BIT_CUTOFF: usize = 200;

/// Returns bit `i` of the little-endian limb sequence `b` (0 or 1).
/// Bits beyond `b`'s length are treated as zero.
fn bit_at(b: &[u64], i: usize) -> u64 {
    let limb = i / 64;
    let off = i % 64;
    (b.get(limb).copied().unwrap_or(0) >> off) & 1
}

/// Extracts a `width`-bit window starting at bit position `bit_pos` (LSB of
/// the window) from the little-endian limb sequence `b`. `width` is at
/// most [`WINDOW_L`] and never crosses more than two limbs.
fn window_at(b: &[u64], bit_pos: usize, width: usize) -> usize {
    let limb = bit_pos / 64;
    let off = bit_pos % 64;
    let low = b.get(limb).copied().unwrap_or(0) >> off;
    let high = if off == 0 {
        0
    } else {
        b.get(limb + 1).copied().unwrap_or(0) << (64 - off)
    };
    let mask = (1u64 << width) - 1;
    ((low | high) & mask) as usize
}

/// Swaps `x` and `y` branch-free under `mask` (all-ones: swap, zero: leave
/// both unchanged).
fn cswap(mask: u64, x: &mut Bignum4096, y: &mut Bignum4096) {
    let mut new_x = Bignum4096::ZERO;
    Bignum4096::cmov(mask, y, x, &mut new_x);
    let mut new_y = Bignum4096::ZERO;
    Bignum4096::cmov(mask, x, y, &mut new_y);
    *x = new_x;
    *y = new_y;
}

/// Binary method, variable time: scans the exponent from least to most
/// significant bit, conditionally multiplying the accumulator by the
/// running square and unconditionally squaring the running square.
pub fn mod_exp_bm_vartime_precompr2(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    let mut acc = Bignum4096::ZERO;
    to_montgomery(n, mu, r2, &Bignum4096::ONE, &mut acc);
    let mut running = *a_tilde;

    for i in 0..b_bits {
        if bit_at(b, i) == 1 {
            let mut next = Bignum4096::ZERO;
            mont_mul(n, mu, &acc, &running, &mut next);
            acc = next;
        }
        let mut squared = Bignum4096::ZERO;
        mont_sqr(n, mu, &running, &mut squared);
        running = squared;
    }

    *res_tilde = acc;
}

/// Binary method, constant time: a Montgomery-ladder style conditional
/// swap. Unlike the variable-time scan above, this traverses the exponent
/// from most to least significant bit, which is what makes the swap
/// discipline produce the correct result — see the derivation in
/// `DESIGN.md` for why the two flavors of the binary method necessarily
/// scan in opposite directions.
///
/// At each step `sw = bit XOR prev_bit` brings `(acc, running)` into the
/// order the branching textbook ladder would have them in for this bit
/// (`if bit == 0: R1 = R0*R1; R0 = R0^2` / `if bit == 1: R0 = R0*R1; R1 =
/// R1^2`, which always squares "the register currently named `R0`" and
/// multiplies into "the register currently named `R1`" once `cswap` has
/// placed them there). `acc` is therefore unconditionally updated to its
/// own square and `running` to `acc * running`, using the pre-update value
/// of `acc` for both. A final swap keyed on the last bit processed
/// restores the correct register before `acc` is read out. No branch or
/// memory access here depends on any bit of `b` — only on the publicly
/// known `b_bits`.
pub fn mod_exp_bm_consttime_precompr2(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    let mut acc = Bignum4096::ZERO;
    to_montgomery(n, mu, r2, &Bignum4096::ONE, &mut acc);
    let mut running = *a_tilde;
    let mut prev_bit = 0u64;

    for i in (0..b_bits).rev() {
        let bit = bit_at(b, i);
        let sw = (bit ^ prev_bit).wrapping_neg();
        cswap(sw, &mut acc, &mut running);

        let mut new_acc = Bignum4096::ZERO;
        mont_sqr(n, mu, &acc, &mut new_acc);
        let mut new_running = Bignum4096::ZERO;
        mont_mul(n, mu, &acc, &running, &mut new_running);
        acc = new_acc;
        running = new_running;

        prev_bit = bit;
    }
    cswap(prev_bit.wrapping_neg(), &mut acc, &mut running);

    *res_tilde = acc;
}

/// Builds the fixed-window power table `[1_tilde, a_tilde, a_tilde^2, ...,
/// a_tilde^(2^WINDOW_L - 1)]` by a linear chain of Montgomery
/// multiplications. Every entry is produced regardless of the secret
/// exponent, so the construction itself carries no data-dependent control
/// flow.
fn build_table(n: &Bignum4096, mu: u64, r2: &Bignum4096, a_tilde: &Bignum4096) -> [Bignum4096; TABLE_SIZE] {
    let mut table = [Bignum4096::ZERO; TABLE_SIZE];
    to_montgomery(n, mu, r2, &Bignum4096::ONE, &mut table[0]);
    table[1] = *a_tilde;
    for i in 2..TABLE_SIZE {
        let mut next = Bignum4096::ZERO;
        mont_mul(n, mu, &table[i - 1], a_tilde, &mut next);
        table[i] = next;
    }
    table
}

/// Selects `table[index]` by scanning every entry unconditionally and
/// accumulating `(eq_mask(index, i) & table[i]) | (!eq_mask & sel)`. Used
/// only by the constant-time fixed-window path; the variable-time path
/// indexes the table directly.
fn table_select(table: &[Bignum4096; TABLE_SIZE], index: usize) -> Bignum4096 {
    let mut sel = Bignum4096::ZERO;
    for (i, entry) in table.iter().enumerate() {
        let mask = eq_mask(index as u64, i as u64);
        let mut next = Bignum4096::ZERO;
        Bignum4096::cmov(mask, entry, &sel, &mut next);
        sel = next;
    }
    sel
}

/// Fixed-window method, variable time. Processes `bBits / WINDOW_L` full
/// windows from the most significant end down, then a final tail window
/// covering the lowest `bBits mod WINDOW_L` bits (at limb 0, bit offset 0
/// — see the module doc comment on [`super::exp`] resolving why that fixed
/// index is correct rather than an off-by-one bug inherited from the
/// original).
pub fn mod_exp_fw_vartime_precompr2(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    let table = build_table(n, mu, r2, a_tilde);
    let num_windows = b_bits / WINDOW_L;
    let tail_bits = b_bits % WINDOW_L;

    let mut acc = table[0];

    for w in (0..num_windows).rev() {
        for _ in 0..WINDOW_L {
            let mut squared = Bignum4096::ZERO;
            mont_sqr(n, mu, &acc, &mut squared);
            acc = squared;
        }
        let bit_pos = tail_bits + w * WINDOW_L;
        let window_val = window_at(b, bit_pos, WINDOW_L);
        let mut next = Bignum4096::ZERO;
        mont_mul(n, mu, &acc, &table[window_val], &mut next);
        acc = next;
    }

    if tail_bits > 0 {
        for _ in 0..tail_bits {
            let mut squared = Bignum4096::ZERO;
            mont_sqr(n, mu, &acc, &mut squared);
            acc = squared;
        }
        let window_val = window_at(b, 0, tail_bits);
        let mut next = Bignum4096::ZERO;
        mont_mul(n, mu, &acc, &table[window_val], &mut next);
        acc = next;
    }

    *res_tilde = acc;
}

/// Fixed-window method, constant time. Identical structure to
/// [`mod_exp_fw_vartime_precompr2`], except every table lookup goes
/// through [`table_select`]'s full-table scan rather than direct indexing.
pub fn mod_exp_fw_consttime_precompr2(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    let table = build_table(n, mu, r2, a_tilde);
    let num_windows = b_bits / WINDOW_L;
    let tail_bits = b_bits % WINDOW_L;

    let mut acc = table[0];

    for w in (0..num_windows).rev() {
        for _ in 0..WINDOW_L {
            let mut squared = Bignum4096::ZERO;
            mont_sqr(n, mu, &acc, &mut squared);
            acc = squared;
        }
        let bit_pos = tail_bits + w * WINDOW_L;
        let window_val = window_at(b, bit_pos, WINDOW_L);
        let selected = table_select(&table, window_val);
        let mut next = Bignum4096::ZERO;
        mont_mul(n, mu, &acc, &selected, &mut next);
        acc = next;
    }

    if tail_bits > 0 {
        for _ in 0..tail_bits {
            let mut squared = Bignum4096::ZERO;
            mont_sqr(n, mu, &acc, &mut squared);
            acc = squared;
        }
        let window_val = window_at(b, 0, tail_bits);
        let selected = table_select(&table, window_val);
        let mut next = Bignum4096::ZERO;
        mont_mul(n, mu, &acc, &selected, &mut next);
        acc = next;
    }

    *res_tilde = acc;
}

/// Dispatches to the binary or fixed-window variable-time method based on
/// the public `b_bits` value.
pub fn mod_exp_precompr2_vartime(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    if b_bits < BINARY_METHOD_BIT_CUTOFF {
        mod_exp_bm_vartime_precompr2(n, mu, r2, a_tilde, b_bits, b, res_tilde);
    } else {
        mod_exp_fw_vartime_precompr2(n, mu, r2, a_tilde, b_bits, b, res_tilde);
    }
}

/// Dispatches to the binary or fixed-window constant-time method based on
/// the public `b_bits` value.
pub fn mod_exp_precompr2_consttime(
    n: &Bignum4096,
    mu: u64,
    r2: &Bignum4096,
    a_tilde: &Bignum4096,
    b_bits: usize,
    b: &[u64],
    res_tilde: &mut Bignum4096,
) {
    if b_bits < BINARY_METHOD_BIT_CUTOFF {
        mod_exp_bm_consttime_precompr2(n, mu, r2, a_tilde, b_bits, b, res_tilde);
    } else {
        mod_exp_fw_consttime_precompr2(n, mu, r2, a_tilde, b_bits, b, res_tilde);
    }
}
