//! AES-128 key expansion with a parameterised SubWord.

use sbox_core::SBox;

use crate::block::Block;
use crate::round::xtime;

/// Expanded round keys for AES-128.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys([Block; 11]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }
}

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32, sbox: &SBox) -> u32 {
    word.to_be_bytes()
        .iter()
        .fold(0u32, |acc, &byte| acc << 8 | u32::from(sbox.apply(byte)))
}

/// Round constants `rc_1 = 1`, `rc_{k+1} = xtime(rc_k)`.
fn rcon(k: usize) -> u32 {
    let mut rc = 1u8;
    for _ in 1..k {
        rc = xtime(rc);
    }
    u32::from(rc) << 24
}

/// Expands a 128-bit key into 11 round keys using the active S-box for
/// the SubWord step.
pub fn expand_key(key: &[u8; 16], sbox: &SBox) -> RoundKeys {
    let mut w = [0u32; 44];
    for (word, chunk) in w.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes(chunk.try_into().expect("chunk length is four"));
    }

    for i in 4..44 {
        let mut temp = w[i - 1];
        if i % 4 == 0 {
            temp = sub_word(rot_word(temp), sbox) ^ rcon(i / 4);
        }
        w[i] = w[i - 4] ^ temp;
    }

    let mut round_keys = [[0u8; 16]; 11];
    for (round, round_key) in round_keys.iter_mut().enumerate() {
        for word_idx in 0..4 {
            let bytes = w[round * 4 + word_idx].to_be_bytes();
            round_key[word_idx * 4..word_idx * 4 + 4].copy_from_slice(&bytes);
        }
    }

    RoundKeys(round_keys)
}
