//! Step-traceable AES-128 with a pluggable substitution layer.
//!
//! This crate mirrors the FIPS-197 round structure but parameterises the
//! substitution step by a caller-supplied [`sbox_core::SBox`]: SubBytes,
//! InvSubBytes, and the key schedule's SubWord all read the active box,
//! and the inverse box is derived once when a cipher is constructed.
//!
//! [`TraceCipher`] performs whole-block encryption and decryption;
//! [`StepMachine`] drives the same rounds one operation at a time and
//! records every intermediate state for inspection and back-navigation.
//!
//! The implementation aims for clarity and testability rather than
//! constant-time guarantees; it should not be treated as side-channel
//! hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod key_schedule;
mod recorder;
mod round;

pub use crate::block::{block_from_slice, Block};
pub use crate::cipher::TraceCipher;
pub use crate::key_schedule::{expand_key, RoundKeys};
pub use crate::recorder::{Step, StepKind, StepMachine, STEPS_PER_DIRECTION};
