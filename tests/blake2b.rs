use nebula_crypto_core::hash::{blake2b, Blake2bError};

fn digest(nn: usize, data: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; nn];
    blake2b(&mut out, nn, data, key).expect("valid parameters");
    out
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// RFC 7693 Appendix A, unkeyed, nn = 64.
#[test]
fn rfc7693_empty_input_vector() {
    let got = digest(64, b"", b"");
    assert_eq!(
        hex(&got),
        "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419d25e1031afee58531389\
         6444934eb04b903a685b1448b755d56f701afe9be2ce"
    );
}

#[test]
fn rfc7693_abc_vector() {
    let got = digest(64, b"abc", b"");
    assert_eq!(
        hex(&got),
        "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5\
         de4533cc9518d38aa8dbf1925ab92386edd4009923"
    );
}

#[test]
fn incremental_lengths_do_not_panic() {
    let mut buf = Vec::with_capacity(300);
    for i in 0..300u16 {
        buf.push(i as u8);
        let _ = digest(64, &buf, b"");
    }
}

#[test]
fn block_boundary_lengths() {
    for len in [0usize, 1, 127, 128, 129, 255, 256, 1000] {
        let data = vec![0x5au8; len];
        let _ = digest(32, &data, b"");
    }
}

#[test]
fn every_valid_output_length_succeeds() {
    for nn in 1..=64usize {
        let mut out = vec![0u8; nn];
        assert!(blake2b(&mut out, nn, b"probe", b"").is_ok());
    }
}

#[test]
fn rejects_zero_and_oversized_output_length() {
    let mut out = [0u8; 64];
    assert_eq!(blake2b(&mut out, 0, b"", b""), Err(Blake2bError::InvalidOutputLength));
    assert_eq!(blake2b(&mut out, 65, b"", b""), Err(Blake2bError::InvalidOutputLength));
}

#[test]
fn rejects_key_longer_than_64_bytes() {
    let mut out = [0u8; 32];
    let key = vec![0u8; 65];
    assert_eq!(blake2b(&mut out, 32, b"", &key), Err(Blake2bError::InvalidKeyLength));
}

// Official BLAKE2 KAT (key = 00..3f, in = empty). Exercises the case where
// the key block is the only input block and must still be finalized by
// compressing a second, all-zero block with `is_last = true`.
#[test]
fn keyed_empty_message_known_answer_test() {
    let key: Vec<u8> = (0u8..64).collect();
    let got = digest(64, b"", &key);
    assert_eq!(
        hex(&got),
        "10ebb67700b1868efb4417987acf4690ae9d972fb7a590c2f02871799aaa4786\
         b5e996e8f0f4eb981fc214b005f42d2ff4233499391653df7aefcbc13fc51568"
    );
}

// Official BLAKE2 KAT (key = 00..3f, in = 0x00). One data byte plus a key,
// so both the key block and the single-byte data block must be compressed.
#[test]
fn keyed_one_byte_message_known_answer_test() {
    let key: Vec<u8> = (0u8..64).collect();
    let got = digest(64, &[0x00], &key);
    assert_eq!(
        hex(&got),
        "961f6dd1e4dd30f63901690c512e78e4b45e4742ed197c3c5e45c549fd25f2e4\
         187b0bc9fe30492b16b0d0bc4ef9b0f34c7003fac09a5ef1532e69430234cebd"
    );
}

#[test]
fn keying_changes_the_digest() {
    let unkeyed = digest(64, b"hello world", b"");
    let keyed = digest(64, b"hello world", b"0123456789abcdef");
    assert_ne!(unkeyed, keyed);
}

#[test]
fn same_input_and_key_are_deterministic() {
    let first = digest(64, b"deterministic", b"k");
    let second = digest(64, b"deterministic", b"k");
    assert_eq!(first, second);
}

#[test]
fn single_bit_difference_changes_the_digest() {
    let a = digest(64, b"The quick brown fox jumps over the lazy dog", b"");
    let b = digest(64, b"The quick brown fox jumps over the lazy dog.", b"");
    assert_ne!(a, b);
}

#[test]
fn maximum_length_key_is_accepted() {
    let key = vec![0x42u8; 64];
    let out = digest(64, b"keyed with max-length key", &key);
    assert_eq!(out.len(), 64);
}
