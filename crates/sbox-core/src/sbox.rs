//! The validated substitution-box type.

use crate::error::Error;

/// A bijective substitution table over the byte domain.
///
/// Every constructor validates that the table is a permutation of
/// `0..=255`; all downstream computations rely on that invariant and are
/// total. The table is copied at construction and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct SBox {
    table: [u8; 256],
}

impl SBox {
    /// Builds an S-box from a full table, rejecting non-permutations.
    pub fn from_array(table: [u8; 256]) -> Result<Self, Error> {
        check_permutation(&table)?;
        Ok(Self { table })
    }

    /// Builds an S-box from a byte slice, rejecting wrong lengths and
    /// non-permutations.
    pub fn from_slice(values: &[u8]) -> Result<Self, Error> {
        if values.len() != 256 {
            return Err(Error::InvalidSBoxLength { len: values.len() });
        }
        let mut table = [0u8; 256];
        table.copy_from_slice(values);
        Self::from_array(table)
    }

    /// Builds an S-box from wide integers, as parsed from external grids.
    ///
    /// Rejects wrong lengths, entries outside `0..=255`, and
    /// non-permutations, in that order.
    pub fn from_values(values: &[u32]) -> Result<Self, Error> {
        if values.len() != 256 {
            return Err(Error::InvalidSBoxLength { len: values.len() });
        }
        let mut table = [0u8; 256];
        for (index, (&value, slot)) in values.iter().zip(table.iter_mut()).enumerate() {
            if value > 255 {
                return Err(Error::InvalidSBoxValue { index, value });
            }
            *slot = value as u8;
        }
        Self::from_array(table)
    }

    /// Substitutes a single byte.
    #[inline]
    pub fn apply(&self, x: u8) -> u8 {
        self.table[x as usize]
    }

    /// Returns the inverse permutation.
    pub fn invert(&self) -> SBox {
        let mut inverse = [0u8; 256];
        for (x, &y) in self.table.iter().enumerate() {
            inverse[y as usize] = x as u8;
        }
        // A valid SBox is a bijection, so the inverse is one too.
        Self { table: inverse }
    }

    /// Exposes the underlying table.
    #[inline]
    pub fn as_array(&self) -> &[u8; 256] {
        &self.table
    }
}

impl core::fmt::Debug for SBox {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "SBox([{:#04x}, {:#04x}, {:#04x}, ..])",
            self.table[0], self.table[1], self.table[2]
        )
    }
}

fn check_permutation(table: &[u8; 256]) -> Result<(), Error> {
    let mut seen = [false; 256];
    for &value in table.iter() {
        if seen[value as usize] {
            return Err(Error::NotAPermutation { value });
        }
        seen[value as usize] = true;
    }
    Ok(())
}
