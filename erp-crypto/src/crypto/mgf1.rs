use sha2::{Digest, Sha256};

use crate::constants::HASH_LEN;

/**
    MGF1 mask generation with SHA-256 (RFC 8017, appendix B.2.1).

    Output: `SHA-256(seed || C)` for C = 0, 1, 2, ... as 32-bit big-endian
    counters, concatenated and truncated to `len` bytes.
*/
pub fn mgf1_sha256(seed: &[u8], len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(len.div_ceil(HASH_LEN) * HASH_LEN);
    let mut counter: u32 = 0;
    while mask.len() < len {
        let block = Sha256::new()
            .chain_update(seed)
            .chain_update(counter.to_be_bytes())
            .finalize();
        mask.extend_from_slice(&block);
        counter = counter.wrapping_add(1);
    }
    mask.truncate(len);
    mask
}
