//! Workspace error type.

/// Errors surfaced at the workspace facades.
///
/// All inputs are validated on entry; computations on validated data are
/// total, so these are the only failure modes the library exposes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The S-box input did not contain exactly 256 entries.
    #[error("s-box must have 256 entries, got {len}")]
    InvalidSBoxLength {
        /// Number of entries actually supplied.
        len: usize,
    },
    /// An S-box entry fell outside the byte range.
    #[error("s-box entry {value} at index {index} is outside 0..=255")]
    InvalidSBoxValue {
        /// Position of the offending entry.
        index: usize,
        /// The out-of-range value.
        value: u32,
    },
    /// A byte value occurred more than once, so another is missing.
    #[error("s-box is not a permutation: value {value:#04x} occurs more than once")]
    NotAPermutation {
        /// The duplicated byte value.
        value: u8,
    },
    /// A plaintext, ciphertext, or key was not exactly 16 bytes.
    #[error("block input must be 16 bytes, got {len}")]
    InvalidBlockLength {
        /// Number of bytes actually supplied.
        len: usize,
    },
    /// A hex field at the input boundary failed to parse.
    #[error("invalid hex in {field}")]
    HexParse {
        /// Name of the field that failed to parse.
        field: &'static str,
    },
}
