//! Round transformations, parameterised by the active substitution box.

use sbox_core::SBox;

use crate::block::{xor_in_place, Block};

/// Applies the active S-box to every state byte in place.
#[inline]
pub fn sub_bytes(state: &mut Block, sbox: &SBox) {
    for byte in state.iter_mut() {
        *byte = sbox.apply(*byte);
    }
}

/// Applies the inverse S-box to every state byte in place.
///
/// The caller supplies the inverted permutation; [`crate::TraceCipher`]
/// derives it once at construction.
#[inline]
pub fn inv_sub_bytes(state: &mut Block, inv_sbox: &SBox) {
    sub_bytes(state, inv_sbox);
}

/// Cyclically left-shifts row `r` of the state by `r` positions.
pub fn shift_rows(state: &mut Block) {
    for row in 1..4 {
        let mut bytes = [0u8; 4];
        for col in 0..4 {
            bytes[col] = state[4 * ((col + row) % 4) + row];
        }
        for col in 0..4 {
            state[4 * col + row] = bytes[col];
        }
    }
}

/// Cyclically right-shifts row `r` of the state by `r` positions.
pub fn inv_shift_rows(state: &mut Block) {
    for row in 1..4 {
        let mut bytes = [0u8; 4];
        for col in 0..4 {
            bytes[col] = state[4 * ((col + 4 - row) % 4) + row];
        }
        for col in 0..4 {
            state[4 * col + row] = bytes[col];
        }
    }
}

/// Doubles a field element over GF(2^8) with the AES polynomial 0x11b.
#[inline]
pub(crate) fn xtime(byte: u8) -> u8 {
    let shifted = byte << 1;
    if byte & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

/// Multiplies two field elements by double-and-add.
fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

/// Multiplies every state column by the MDS matrix.
pub fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = xtime(a0) ^ (xtime(a1) ^ a1) ^ a2 ^ a3;
        col[1] = a0 ^ xtime(a1) ^ (xtime(a2) ^ a2) ^ a3;
        col[2] = a0 ^ a1 ^ xtime(a2) ^ (xtime(a3) ^ a3);
        col[3] = (xtime(a0) ^ a0) ^ a1 ^ a2 ^ xtime(a3);
    }
}

/// Multiplies every state column by the inverse MDS matrix.
pub fn inv_mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = gmul(a0, 0x0e) ^ gmul(a1, 0x0b) ^ gmul(a2, 0x0d) ^ gmul(a3, 0x09);
        col[1] = gmul(a0, 0x09) ^ gmul(a1, 0x0e) ^ gmul(a2, 0x0b) ^ gmul(a3, 0x0d);
        col[2] = gmul(a0, 0x0d) ^ gmul(a1, 0x09) ^ gmul(a2, 0x0e) ^ gmul(a3, 0x0b);
        col[3] = gmul(a0, 0x0b) ^ gmul(a1, 0x0d) ^ gmul(a2, 0x09) ^ gmul(a3, 0x0e);
    }
}

/// XORs a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use sbox_core::AES_SBOX;

    #[test]
    fn shift_rows_moves_known_positions() {
        let mut state: Block = core::array::from_fn(|i| i as u8);
        shift_rows(&mut state);
        // Row 0 fixed, row 1 shifted by one column.
        assert_eq!(state[0], 0);
        assert_eq!(state[1], 5);
        assert_eq!(state[2], 10);
        assert_eq!(state[3], 15);
        assert_eq!(state[13], 1);
    }

    #[test]
    fn shift_rows_round_trips() {
        let mut rng = ChaCha20Rng::from_seed([40u8; 32]);
        for _ in 0..64 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let original = state;
            shift_rows(&mut state);
            inv_shift_rows(&mut state);
            assert_eq!(state, original);
        }
    }

    #[test]
    fn mix_columns_round_trips() {
        let mut rng = ChaCha20Rng::from_seed([41u8; 32]);
        for _ in 0..64 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let original = state;
            mix_columns(&mut state);
            inv_mix_columns(&mut state);
            assert_eq!(state, original);
        }
    }

    #[test]
    fn mix_columns_matches_fips_example() {
        // FIPS-197 §5.1.3 column example.
        let mut state: Block = [
            0xd4, 0xbf, 0x5d, 0x30, 0xd4, 0xbf, 0x5d, 0x30, 0xd4, 0xbf, 0x5d, 0x30, 0xd4, 0xbf,
            0x5d, 0x30,
        ];
        mix_columns(&mut state);
        assert_eq!(&state[..4], &[0x04, 0x66, 0x81, 0xe5]);
    }

    #[test]
    fn sub_bytes_round_trips_with_inverse() {
        let sbox = SBox::from_array(AES_SBOX).unwrap();
        let inverse = sbox.invert();
        let mut rng = ChaCha20Rng::from_seed([42u8; 32]);
        for _ in 0..32 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let original = state;
            sub_bytes(&mut state, &sbox);
            inv_sub_bytes(&mut state, &inverse);
            assert_eq!(state, original);
        }
    }

    #[test]
    fn gmul_agrees_with_xtime_chains() {
        for b in 0..=255u8 {
            assert_eq!(gmul(b, 2), xtime(b));
            assert_eq!(gmul(b, 3), xtime(b) ^ b);
            assert_eq!(gmul(b, 1), b);
        }
    }
}
