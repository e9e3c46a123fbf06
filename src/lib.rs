//! S-box cryptanalysis metrics and a step-traceable AES-128 with a
//! pluggable substitution layer.
//!
//! This crate is the façade over the workspace: it re-exports the core
//! types and offers slice-based entry points that validate inputs before
//! handing them to the analysis engine ([`sboxlab_analysis`]) or the
//! traceable cipher ([`sboxlab_trace`]).
//!
//! ```
//! let report = sboxlab::analyze(&sboxlab::AES_SBOX).unwrap();
//! assert_eq!(report.nonlinearity, 112);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub use sbox_core::{Error, SBox, AES_SBOX};
pub use sboxlab_analysis::{
    Analyzer, BicNlReport, BicSacReport, BooleanFunction, Ddt, DifferentialReport, Lat,
    LinearReport, Report, SacReport, SecurityLevel, SecuritySummary, WalshSpectrum,
};
pub use sboxlab_trace::{
    block_from_slice, Block, Step, StepKind, StepMachine, TraceCipher, STEPS_PER_DIRECTION,
};

/// Validates an S-box slice and computes its full metric report.
pub fn analyze(sbox: &[u8]) -> Result<Report, Error> {
    sboxlab_analysis::analyze(sbox)
}

/// Starts an encryption trace over validated inputs.
///
/// The returned machine yields 42 [`Step`]s; draining it produces the
/// ciphertext at the `Final` step.
pub fn encrypt_trace(plaintext: &[u8], key: &[u8], sbox: &[u8]) -> Result<StepMachine, Error> {
    let plaintext = block_from_slice(plaintext)?;
    let key = block_from_slice(key)?;
    let sbox = SBox::from_slice(sbox)?;
    Ok(StepMachine::encrypt(&plaintext, &key, sbox))
}

/// Starts a decryption trace over validated inputs.
pub fn decrypt_trace(ciphertext: &[u8], key: &[u8], sbox: &[u8]) -> Result<StepMachine, Error> {
    let ciphertext = block_from_slice(ciphertext)?;
    let key = block_from_slice(key)?;
    let sbox = SBox::from_slice(sbox)?;
    Ok(StepMachine::decrypt(&ciphertext, &key, sbox))
}

/// Encrypts a single block, returning only the terminal state.
pub fn encrypt_block(plaintext: &[u8], key: &[u8], sbox: &[u8]) -> Result<Block, Error> {
    let plaintext = block_from_slice(plaintext)?;
    let key = block_from_slice(key)?;
    let sbox = SBox::from_slice(sbox)?;
    Ok(TraceCipher::new(&key, sbox).encrypt_block(&plaintext))
}

/// Decrypts a single block, returning only the terminal state.
pub fn decrypt_block(ciphertext: &[u8], key: &[u8], sbox: &[u8]) -> Result<Block, Error> {
    let ciphertext = block_from_slice(ciphertext)?;
    let key = block_from_slice(key)?;
    let sbox = SBox::from_slice(sbox)?;
    Ok(TraceCipher::new(&key, sbox).decrypt_block(&ciphertext))
}
