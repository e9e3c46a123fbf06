//! Linear approximation and difference distribution tables.

use sbox_core::{dot_parity, SBox};

use crate::boolean::walsh_in_place;

const SIDE: usize = 256;

/// Linear Approximation Table.
///
/// Entry `(a, b)` is the signed bias
/// `#{x : a·x = b·S(x)} − 128`, in `[−128, 128]`; entry `(0, 0)` is 128.
#[derive(Clone, PartialEq, Eq)]
pub struct Lat {
    data: Box<[i32]>,
}

impl Lat {
    /// Builds the table for an S-box.
    ///
    /// Each output mask column is obtained from one Walsh butterfly over
    /// the component function `x ↦ b·S(x)`: the transform at input mask
    /// `a` equals `2·#{matches} − 256`, so halving it yields the bias.
    pub fn build(sbox: &SBox) -> Self {
        let mut data = vec![0i32; SIDE * SIDE].into_boxed_slice();
        for b in 0..SIDE {
            let mut column = [0i32; SIDE];
            for (x, slot) in column.iter_mut().enumerate() {
                *slot = 1 - 2 * i32::from(dot_parity(b as u8, sbox.apply(x as u8)));
            }
            walsh_in_place(&mut column);
            for (a, &transform) in column.iter().enumerate() {
                data[a * SIDE + b] = transform / 2;
            }
        }
        Self { data }
    }

    /// Returns the bias at input mask `a`, output mask `b`.
    #[inline]
    pub fn get(&self, a: u8, b: u8) -> i32 {
        self.data[a as usize * SIDE + b as usize]
    }

    /// Returns the largest absolute bias over all masks except `(0, 0)`.
    pub fn max_abs_bias(&self) -> i32 {
        self.data
            .iter()
            .skip(1)
            .map(|bias| bias.abs())
            .max()
            .expect("table is non-empty")
    }
}

/// Difference Distribution Table.
///
/// Entry `(α, β)` counts `x` with `S(x ⊕ α) ⊕ S(x) = β`. Rows sum to 256,
/// all entries are even, and entry `(0, 0)` is 256.
#[derive(Clone, PartialEq, Eq)]
pub struct Ddt {
    data: Box<[u32]>,
}

impl Ddt {
    /// Builds the table for an S-box.
    pub fn build(sbox: &SBox) -> Self {
        let mut data = vec![0u32; SIDE * SIDE].into_boxed_slice();
        for x1 in 0..SIDE {
            let y1 = sbox.apply(x1 as u8);
            for x2 in 0..SIDE {
                let alpha = (x1 ^ x2) as usize;
                let beta = (y1 ^ sbox.apply(x2 as u8)) as usize;
                data[alpha * SIDE + beta] += 1;
            }
        }
        Self { data }
    }

    /// Returns the count at input difference `alpha`, output difference `beta`.
    #[inline]
    pub fn get(&self, alpha: u8, beta: u8) -> u32 {
        self.data[alpha as usize * SIDE + beta as usize]
    }

    /// Returns the largest count over non-zero input differences.
    pub fn differential_uniformity(&self) -> u32 {
        self.data[SIDE..]
            .iter()
            .copied()
            .max()
            .expect("table has 255 non-trivial rows")
    }
}
