//! BLAKE2b compression driver and one-shot digest
//!
//! This module implements the outer length-aware padding and finalization
//! that turn the per-block compression function into a digest of 1 to 64
//! bytes, with optional keying, following RFC 7693 §3.3 and §4.

use core::fmt;

use super::computations::all_rounds;
use super::IV;

const BLOCK_LEN: usize = 128;

/// Errors returned by [`blake2b`]'s two length preconditions.
///
/// Unlike the bignum façade's boolean validity masks, these are ordinary,
/// caller-visible misuse errors with no secret-dependent information
/// content, so a plain typed error is the better fit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blake2bError {
    /// The requested output length `nn` was not in `1..=64`, or the
    /// output buffer was too short to hold it.
    InvalidOutputLength,
    /// The key was longer than 64 bytes.
    InvalidKeyLength,
}

impl fmt::Display for Blake2bError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blake2bError::InvalidOutputLength => write!(f, "blake2b: output length must be in 1..=64"),
            Blake2bError::InvalidKeyLength => write!(f, "blake2b: key length must be at most 64"),
        }
    }
}

impl std::error::Error for Blake2bError {}

/// Compresses a single 128-byte block into the running hash state.
///
/// `totlen` is the total number of message bytes compressed so far,
/// including this block; `is_last` marks the final block of the message
/// (the key block, if any, is never the final block unless the message
/// itself is empty).
pub(crate) fn compress(hash: &mut [u64; 8], block: &[u8; 128], totlen: u128, is_last: bool) {
    let mut v = [0u64; 16];
    v[..8].copy_from_slice(hash);
    v[8..16].copy_from_slice(&IV);

    v[12] ^= totlen as u64;
    v[13] ^= (totlen >> 64) as u64;
    if is_last {
        v[14] ^= u64::MAX;
    }

    let mut m = [0u64; 16];
    for (slot, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
        *slot = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    all_rounds(&mut v, &m);

    for i in 0..8 {
        hash[i] ^= v[i] ^ v[i + 8];
    }

    v = [0u64; 16];
    let _ = &v; // working vector wiped before going out of scope
}

/// Computes the BLAKE2b digest of `data`, optionally keyed by `key`,
/// writing `nn` bytes into `out`.
///
/// `nn` must be in `1..=64` and `out` must be at least `nn` bytes long;
/// `key` must be at most 64 bytes (an empty key means unkeyed hashing).
pub fn blake2b(out: &mut [u8], nn: usize, data: &[u8], key: &[u8]) -> Result<(), Blake2bError> {
    if !(1..=64).contains(&nn) || out.len() < nn {
        return Err(Blake2bError::InvalidOutputLength);
    }
    if key.len() > 64 {
        return Err(Blake2bError::InvalidKeyLength);
    }

    let kk = key.len();
    let mut hash = IV;
    hash[0] ^= 0x0101_0000 ^ ((kk as u64) << 8) ^ (nn as u64);

    let mut totlen: u128 = 0;

    if kk > 0 {
        let mut block = [0u8; BLOCK_LEN];
        block[..kk].copy_from_slice(key);
        totlen += BLOCK_LEN as u128;
        compress(&mut hash, &block, totlen, false);
        block = [0u8; BLOCK_LEN];
        let _ = &block;
    }

    // The final block is always compressed, even for an empty message: a
    // keyed hash of empty data still finalizes over an all-zero block on
    // top of the (non-final) key block compressed above.
    let mut i = 0usize;
    while i + BLOCK_LEN < data.len() {
        let block: &[u8; BLOCK_LEN] = data[i..i + BLOCK_LEN].try_into().unwrap();
        totlen += BLOCK_LEN as u128;
        compress(&mut hash, block, totlen, false);
        i += BLOCK_LEN;
    }

    let rem = data.len() - i;
    let mut block = [0u8; BLOCK_LEN];
    block[..rem].copy_from_slice(&data[i..]);
    totlen += rem as u128;
    compress(&mut hash, &block, totlen, true);

    let mut digest = [0u8; 64];
    for (i, limb) in hash.iter().enumerate() {
        digest[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
    }
    out[..nn].copy_from_slice(&digest[..nn]);

    hash = [0u64; 8];
    digest = [0u8; 64];
    let _ = (&hash, &digest);

    Ok(())
}
