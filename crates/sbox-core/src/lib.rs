//! Shared primitives for the sboxlab workspace.
//!
//! This crate provides:
//! - The validated [`SBox`] permutation type used by both the analysis engine
//!   and the traceable cipher.
//! - Bit-level helpers (Hamming weights, parities, GF(2) dot products).
//! - The workspace-wide [`Error`] enum.
//! - The standard AES substitution box as a preset.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bits;
mod error;
mod presets;
mod sbox;

pub use crate::bits::{dot_parity, parity, weight};
pub use crate::error::Error;
pub use crate::presets::AES_SBOX;
pub use crate::sbox::SBox;
