//! Block representation helpers.
//!
//! The AES state is held column-major: byte `k` of the input sits at row
//! `k mod 4`, column `k / 4`, so the flat array and the matrix view agree
//! with FIPS-197.

use sbox_core::Error;

/// AES block of 16 bytes, column-major.
pub type Block = [u8; 16];

/// Validates a slice as a block, rejecting any other length.
pub fn block_from_slice(bytes: &[u8]) -> Result<Block, Error> {
    let mut block = [0u8; 16];
    if bytes.len() != 16 {
        return Err(Error::InvalidBlockLength { len: bytes.len() });
    }
    block.copy_from_slice(bytes);
    Ok(block)
}

/// XORs `rhs` into `dst`.
#[inline]
pub(crate) fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
