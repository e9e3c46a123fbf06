//! Whole-block encryption and decryption with a pluggable S-box.

use sbox_core::SBox;

use crate::block::Block;
use crate::key_schedule::{expand_key, RoundKeys};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// AES-128 cipher bound to one key and one substitution box.
///
/// The round keys and the inverse box are derived once at construction;
/// the cipher is immutable afterwards and a single instance serves any
/// number of blocks in either direction.
pub struct TraceCipher {
    sbox: SBox,
    inv_sbox: SBox,
    round_keys: RoundKeys,
}

impl TraceCipher {
    /// Binds a key and a substitution box.
    ///
    /// The key schedule runs the active box in its SubWord step, so two
    /// ciphers with the same key but different boxes disagree from the
    /// very first round key onward.
    pub fn new(key: &[u8; 16], sbox: SBox) -> Self {
        let round_keys = expand_key(key, &sbox);
        let inv_sbox = sbox.invert();
        Self {
            sbox,
            inv_sbox,
            round_keys,
        }
    }

    /// Encrypts a single block.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        let mut state = *block;

        add_round_key(&mut state, self.round_keys.get(0));
        for round in 1..10 {
            sub_bytes(&mut state, &self.sbox);
            shift_rows(&mut state);
            mix_columns(&mut state);
            add_round_key(&mut state, self.round_keys.get(round));
        }
        sub_bytes(&mut state, &self.sbox);
        shift_rows(&mut state);
        add_round_key(&mut state, self.round_keys.get(10));

        state
    }

    /// Decrypts a single block.
    pub fn decrypt_block(&self, block: &Block) -> Block {
        let mut state = *block;

        add_round_key(&mut state, self.round_keys.get(10));
        for round in (1..10).rev() {
            inv_shift_rows(&mut state);
            inv_sub_bytes(&mut state, &self.inv_sbox);
            add_round_key(&mut state, self.round_keys.get(round));
            inv_mix_columns(&mut state);
        }
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state, &self.inv_sbox);
        add_round_key(&mut state, self.round_keys.get(0));

        state
    }

    pub(crate) fn sbox(&self) -> &SBox {
        &self.sbox
    }

    pub(crate) fn inv_sbox(&self) -> &SBox {
        &self.inv_sbox
    }

    pub(crate) fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }
}
