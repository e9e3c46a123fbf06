//! Boolean functions over eight input bits and their transforms.

use sbox_core::{weight, SBox};

/// Truth table of a single-output Boolean function on the byte domain.
#[derive(Clone, PartialEq, Eq)]
pub struct BooleanFunction {
    truth: [u8; 256],
}

impl BooleanFunction {
    /// Projects output bit `bit` (0..=7) of an S-box into a truth table.
    pub fn output_bit(sbox: &SBox, bit: usize) -> Self {
        debug_assert!(bit < 8);
        let mut truth = [0u8; 256];
        for (x, slot) in truth.iter_mut().enumerate() {
            *slot = (sbox.apply(x as u8) >> bit) & 1;
        }
        Self { truth }
    }

    /// Evaluates the function at `x`.
    #[inline]
    pub fn get(&self, x: u8) -> u8 {
        self.truth[x as usize]
    }

    /// Returns the pointwise XOR with another function.
    pub fn xor(&self, other: &Self) -> Self {
        let mut truth = [0u8; 256];
        for ((slot, &a), &b) in truth.iter_mut().zip(self.truth.iter()).zip(other.truth.iter()) {
            *slot = a ^ b;
        }
        Self { truth }
    }

    /// Computes the algebraic normal form by the Möbius transform.
    ///
    /// The returned table holds the monomial coefficients: entry `m` is 1
    /// iff the monomial selecting the bits of `m` appears in the ANF.
    pub fn anf(&self) -> [u8; 256] {
        let mut coeffs = self.truth;
        for i in 0..8 {
            let step = 1usize << i;
            for m in 0..256 {
                if m & step != 0 {
                    coeffs[m] ^= coeffs[m ^ step];
                }
            }
        }
        coeffs
    }

    /// Returns the algebraic degree: the largest monomial weight in the ANF.
    pub fn algebraic_degree(&self) -> u32 {
        self.anf()
            .iter()
            .enumerate()
            .filter(|(_, &coeff)| coeff == 1)
            .map(|(m, _)| u32::from(weight(m as u8)))
            .max()
            .unwrap_or(0)
    }
}

/// Signed Walsh–Hadamard spectrum of a Boolean function.
///
/// Entry `w` is `Σ_x (−1)^{f(x) ⊕ w·x}`; each coefficient is even and lies
/// in `[−256, 256]`.
#[derive(Clone, PartialEq, Eq)]
pub struct WalshSpectrum {
    coeffs: [i32; 256],
}

impl WalshSpectrum {
    /// Transforms a truth table into its Walsh spectrum.
    pub fn of(function: &BooleanFunction) -> Self {
        let mut coeffs = [0i32; 256];
        for (slot, x) in coeffs.iter_mut().zip(0..=255u8) {
            *slot = sign(function.get(x));
        }
        walsh_in_place(&mut coeffs);
        Self { coeffs }
    }

    /// Returns the coefficient at mask `w`.
    #[inline]
    pub fn coefficient(&self, w: u8) -> i32 {
        self.coeffs[w as usize]
    }

    /// Returns the largest absolute coefficient over non-zero masks.
    pub fn max_abs_nontrivial(&self) -> i32 {
        self.coeffs[1..]
            .iter()
            .map(|c| c.abs())
            .max()
            .expect("spectrum has 255 non-trivial entries")
    }

    /// Nonlinearity of the single function: `128 − max_{w≠0} |W[w]| / 2`.
    pub fn nonlinearity(&self) -> u32 {
        (128 - self.max_abs_nontrivial() / 2) as u32
    }

    /// Correlation immunity: the largest `k` such that every coefficient at
    /// masks of weight `1..=k` vanishes, contiguous from weight 1 upward.
    pub fn correlation_immunity(&self) -> u32 {
        for k in 1..=8u32 {
            let clean = (1..=255u8)
                .filter(|&w| u32::from(weight(w)) == k)
                .all(|w| self.coefficient(w) == 0);
            if !clean {
                return k - 1;
            }
        }
        8
    }
}

#[inline]
fn sign(bit: u8) -> i32 {
    1 - 2 * i32::from(bit)
}

/// In-place Walsh–Hadamard butterfly over a 256-entry signed table.
///
/// Equivalent to the direct `Σ_x (−1)^{f(x) ⊕ w·x}` sum for every mask,
/// in `N log N` additions instead of `N²` parity evaluations.
pub(crate) fn walsh_in_place(values: &mut [i32; 256]) {
    let mut half = 1usize;
    while half < 256 {
        let step = half * 2;
        for start in (0..256).step_by(step) {
            for i in start..start + half {
                let a = values[i];
                let b = values[i + half];
                values[i] = a + b;
                values[i + half] = a - b;
            }
        }
        half = step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use sbox_core::{dot_parity, AES_SBOX};

    fn identity_sbox() -> SBox {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        SBox::from_array(table).unwrap()
    }

    #[test]
    fn butterfly_matches_direct_sum() {
        let sbox = SBox::from_array(AES_SBOX).unwrap();
        let f = BooleanFunction::output_bit(&sbox, 3);
        let spectrum = WalshSpectrum::of(&f);

        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for _ in 0..32 {
            let w: u8 = rng.gen();
            let direct: i32 = (0..=255u8)
                .map(|x| sign(f.get(x) ^ dot_parity(w, x)))
                .sum();
            assert_eq!(spectrum.coefficient(w), direct);
        }
    }

    #[test]
    fn spectrum_entries_are_even_and_bounded() {
        let sbox = SBox::from_array(AES_SBOX).unwrap();
        for bit in 0..8 {
            let spectrum = WalshSpectrum::of(&BooleanFunction::output_bit(&sbox, bit));
            for w in 0..=255u8 {
                let c = spectrum.coefficient(w);
                assert_eq!(c % 2, 0);
                assert!((-256..=256).contains(&c));
            }
        }
    }

    #[test]
    fn linear_function_has_zero_nonlinearity() {
        // Output bit i of the identity S-box is the linear function x_i.
        let f = BooleanFunction::output_bit(&identity_sbox(), 5);
        let spectrum = WalshSpectrum::of(&f);
        assert_eq!(spectrum.coefficient(1 << 5).abs(), 256);
        assert_eq!(spectrum.nonlinearity(), 0);
    }

    #[test]
    fn identity_bits_have_degree_one() {
        let sbox = identity_sbox();
        for bit in 0..8 {
            let f = BooleanFunction::output_bit(&sbox, bit);
            assert_eq!(f.algebraic_degree(), 1);
            let anf = f.anf();
            assert_eq!(anf[1 << bit], 1);
            assert_eq!(anf.iter().filter(|&&c| c == 1).count(), 1);
        }
    }

    #[test]
    fn anf_reconstructs_truth_table() {
        let sbox = SBox::from_array(AES_SBOX).unwrap();
        let f = BooleanFunction::output_bit(&sbox, 0);
        let anf = f.anf();
        for x in 0..=255u8 {
            let mut value = 0u8;
            for (m, &coeff) in anf.iter().enumerate() {
                if coeff == 1 && (x as usize) & m == m {
                    value ^= 1;
                }
            }
            assert_eq!(value, f.get(x));
        }
    }

    #[test]
    fn permutation_bits_have_degree_at_most_seven() {
        // A bijection over eight bits never reaches the full degree 8,
        // and a non-constant bit is at least affine.
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        for _ in 0..8 {
            let mut table: Vec<u8> = (0..=255).collect();
            table.shuffle(&mut rng);
            let sbox = SBox::from_slice(&table).unwrap();
            for bit in 0..8 {
                let degree = BooleanFunction::output_bit(&sbox, bit).algebraic_degree();
                assert!((1..=7).contains(&degree), "degree {degree} out of range");
            }
        }
    }

    #[test]
    fn aes_output_bits_have_degree_seven() {
        let sbox = SBox::from_array(AES_SBOX).unwrap();
        for bit in 0..8 {
            let f = BooleanFunction::output_bit(&sbox, bit);
            assert_eq!(f.algebraic_degree(), 7);
        }
    }
}
