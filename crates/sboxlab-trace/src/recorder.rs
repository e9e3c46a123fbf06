//! Step-by-step cipher execution with navigable history.

use serde::{Deserialize, Serialize};

use sbox_core::SBox;

use crate::block::Block;
use crate::cipher::TraceCipher;
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// Number of observable steps in one full encryption or decryption:
/// `Init`, the initial `AddRoundKey`, four operations for each of nine
/// middle rounds, three operations for the last round, and `Final`.
pub const STEPS_PER_DIRECTION: usize = 42;

/// The operation whose result a step snapshot shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Plaintext or ciphertext loaded into the state, column-major.
    Init,
    /// Round key XORed into the state.
    AddRoundKey,
    /// Active S-box applied byte-wise.
    SubBytes,
    /// Rows rotated left by their index.
    ShiftRows,
    /// Columns multiplied by the MDS matrix.
    MixColumns,
    /// Inverse S-box applied byte-wise.
    InvSubBytes,
    /// Rows rotated right by their index.
    InvShiftRows,
    /// Columns multiplied by the inverse MDS matrix.
    InvMixColumns,
    /// Terminal state; the block is ready to read back.
    Final,
}

/// One observable intermediate state of a traced cipher run.
///
/// The snapshot is taken after applying the named operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Round the operation belongs to (0..=10).
    pub round: u8,
    /// The operation just applied.
    pub op: StepKind,
    /// Full state after the operation, column-major.
    pub state: Block,
    /// Completion percentage: 0 at `Init`, 100 at `Final`.
    pub progress: u8,
}

impl Step {
    /// Returns the state as a 4×4 matrix indexed `[row][col]`.
    pub fn matrix(&self) -> [[u8; 4]; 4] {
        core::array::from_fn(|row| core::array::from_fn(|col| self.state[4 * col + row]))
    }
}

/// Drives the cipher one operation at a time.
///
/// Every emitted [`Step`] is kept in a history, so earlier states can be
/// revisited with [`StepMachine::back`] and replayed with
/// [`StepMachine::advance`] without re-executing any round function.
pub struct StepMachine {
    cipher: TraceCipher,
    schedule: Vec<(u8, StepKind)>,
    state: Block,
    history: Vec<Step>,
    position: usize,
}

impl StepMachine {
    /// Starts an encryption trace: plaintext in, ciphertext at `Final`.
    pub fn encrypt(plaintext: &Block, key: &[u8; 16], sbox: SBox) -> Self {
        Self::with_schedule(TraceCipher::new(key, sbox), *plaintext, encrypt_schedule())
    }

    /// Starts a decryption trace: ciphertext in, plaintext at `Final`.
    pub fn decrypt(ciphertext: &Block, key: &[u8; 16], sbox: SBox) -> Self {
        Self::with_schedule(TraceCipher::new(key, sbox), *ciphertext, decrypt_schedule())
    }

    fn with_schedule(cipher: TraceCipher, state: Block, schedule: Vec<(u8, StepKind)>) -> Self {
        Self {
            cipher,
            schedule,
            state,
            history: Vec::with_capacity(STEPS_PER_DIRECTION),
            position: 0,
        }
    }

    /// Emits the next step, replaying from history after back-navigation.
    pub fn advance(&mut self) -> Option<Step> {
        if self.position < self.history.len() {
            let step = self.history[self.position];
            self.position += 1;
            return Some(step);
        }

        let index = self.history.len();
        let &(round, op) = self.schedule.get(index)?;
        self.apply(round, op);
        let progress = (100 * index / (self.schedule.len() - 1)) as u8;
        let step = Step {
            round,
            op,
            state: self.state,
            progress,
        };
        self.history.push(step);
        self.position += 1;
        Some(step)
    }

    /// Moves back one step and returns the snapshot now current.
    pub fn back(&mut self) -> Option<Step> {
        if self.position > 1 {
            self.position -= 1;
            Some(self.history[self.position - 1])
        } else {
            None
        }
    }

    /// Returns the snapshot at the current position, if any step ran.
    pub fn current(&self) -> Option<Step> {
        self.position.checked_sub(1).map(|i| self.history[i])
    }

    /// All steps emitted so far, oldest first.
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Whether every scheduled operation has executed.
    pub fn is_complete(&self) -> bool {
        self.history.len() == self.schedule.len()
    }

    /// Runs the remaining schedule and returns the terminal block.
    pub fn run_to_end(&mut self) -> Block {
        while self.advance().is_some() {}
        self.state
    }

    /// Terminal block, available once the schedule has fully executed.
    pub fn output(&self) -> Option<Block> {
        self.is_complete().then_some(self.state)
    }

    fn apply(&mut self, round: u8, op: StepKind) {
        match op {
            StepKind::Init | StepKind::Final => {}
            StepKind::AddRoundKey => {
                add_round_key(&mut self.state, self.cipher.round_keys().get(round as usize));
            }
            StepKind::SubBytes => sub_bytes(&mut self.state, self.cipher.sbox()),
            StepKind::ShiftRows => shift_rows(&mut self.state),
            StepKind::MixColumns => mix_columns(&mut self.state),
            StepKind::InvSubBytes => inv_sub_bytes(&mut self.state, self.cipher.inv_sbox()),
            StepKind::InvShiftRows => inv_shift_rows(&mut self.state),
            StepKind::InvMixColumns => inv_mix_columns(&mut self.state),
        }
    }
}

impl Iterator for StepMachine {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.advance()
    }
}

fn encrypt_schedule() -> Vec<(u8, StepKind)> {
    let mut schedule = vec![(0, StepKind::Init), (0, StepKind::AddRoundKey)];
    for round in 1..=9u8 {
        schedule.push((round, StepKind::SubBytes));
        schedule.push((round, StepKind::ShiftRows));
        schedule.push((round, StepKind::MixColumns));
        schedule.push((round, StepKind::AddRoundKey));
    }
    schedule.push((10, StepKind::SubBytes));
    schedule.push((10, StepKind::ShiftRows));
    schedule.push((10, StepKind::AddRoundKey));
    schedule.push((10, StepKind::Final));
    schedule
}

fn decrypt_schedule() -> Vec<(u8, StepKind)> {
    let mut schedule = vec![(10, StepKind::Init), (10, StepKind::AddRoundKey)];
    for round in (1..=9u8).rev() {
        schedule.push((round, StepKind::InvShiftRows));
        schedule.push((round, StepKind::InvSubBytes));
        schedule.push((round, StepKind::AddRoundKey));
        schedule.push((round, StepKind::InvMixColumns));
    }
    schedule.push((0, StepKind::InvShiftRows));
    schedule.push((0, StepKind::InvSubBytes));
    schedule.push((0, StepKind::AddRoundKey));
    schedule.push((0, StepKind::Final));
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbox_core::AES_SBOX;

    // FIPS-197 Appendix B.
    const PLAIN: Block = [
        0x32, 0x43, 0xf6, 0xa8, 0x88, 0x5a, 0x30, 0x8d, 0x31, 0x31, 0x98, 0xa2, 0xe0, 0x37, 0x07,
        0x34,
    ];
    const KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const CIPHER: Block = [
        0x39, 0x25, 0x84, 0x1d, 0x02, 0xdc, 0x09, 0xfb, 0xdc, 0x11, 0x85, 0x97, 0x19, 0x6a, 0x0b,
        0x32,
    ];

    fn standard() -> SBox {
        SBox::from_array(AES_SBOX).unwrap()
    }

    #[test]
    fn encryption_emits_forty_two_steps_ending_in_ciphertext() {
        let steps: Vec<Step> = StepMachine::encrypt(&PLAIN, &KEY, standard()).collect();
        assert_eq!(steps.len(), STEPS_PER_DIRECTION);

        let first = steps.first().unwrap();
        assert_eq!(first.op, StepKind::Init);
        assert_eq!(first.state, PLAIN);
        assert_eq!(first.progress, 0);

        let last = steps.last().unwrap();
        assert_eq!(last.op, StepKind::Final);
        assert_eq!(last.state, CIPHER);
        assert_eq!(last.progress, 100);
    }

    #[test]
    fn trace_matches_fips_intermediate_states() {
        let mut machine = StepMachine::encrypt(&PLAIN, &KEY, standard());
        machine.advance(); // Init

        // Appendix B, round 1 start (after the initial AddRoundKey).
        let after_ark = machine.advance().unwrap();
        assert_eq!(after_ark.op, StepKind::AddRoundKey);
        assert_eq!(
            after_ark.state,
            [
                0x19, 0x3d, 0xe3, 0xbe, 0xa0, 0xf4, 0xe2, 0x2b, 0x9a, 0xc6, 0x8d, 0x2a, 0xe9,
                0xf8, 0x48, 0x08
            ]
        );

        // Appendix B, round 1 after SubBytes.
        let after_sub = machine.advance().unwrap();
        assert_eq!(after_sub.op, StepKind::SubBytes);
        assert_eq!(
            after_sub.state,
            [
                0xd4, 0x27, 0x11, 0xae, 0xe0, 0xbf, 0x98, 0xf1, 0xb8, 0xb4, 0x5d, 0xe5, 0x1e,
                0x41, 0x52, 0x30
            ]
        );
    }

    #[test]
    fn decryption_trace_recovers_plaintext() {
        let steps: Vec<Step> = StepMachine::decrypt(&CIPHER, &KEY, standard()).collect();
        assert_eq!(steps.len(), STEPS_PER_DIRECTION);
        let last = steps.last().unwrap();
        assert_eq!(last.op, StepKind::Final);
        assert_eq!(last.round, 0);
        assert_eq!(last.state, PLAIN);
    }

    #[test]
    fn back_navigation_replays_without_reexecution() {
        let mut machine = StepMachine::encrypt(&PLAIN, &KEY, standard());
        let forward: Vec<Step> = (0..5).map(|_| machine.advance().unwrap()).collect();

        assert_eq!(machine.back().unwrap(), forward[3]);
        assert_eq!(machine.back().unwrap(), forward[2]);
        assert_eq!(machine.current().unwrap(), forward[2]);

        // Replaying returns identical snapshots; history never shrinks.
        assert_eq!(machine.advance().unwrap(), forward[3]);
        assert_eq!(machine.advance().unwrap(), forward[4]);
        assert_eq!(machine.history().len(), 5);

        let terminal = machine.run_to_end();
        assert_eq!(terminal, CIPHER);
        assert_eq!(machine.history().len(), STEPS_PER_DIRECTION);
        assert!(machine.is_complete());
        assert_eq!(machine.output(), Some(CIPHER));
    }

    #[test]
    fn matrix_view_is_column_major() {
        let mut machine = StepMachine::encrypt(&PLAIN, &KEY, standard());
        let init = machine.advance().unwrap();
        let matrix = init.matrix();
        for (k, &byte) in PLAIN.iter().enumerate() {
            assert_eq!(matrix[k % 4][k / 4], byte);
        }
    }

    #[test]
    fn progress_is_monotonic() {
        let steps: Vec<Step> = StepMachine::encrypt(&PLAIN, &KEY, standard()).collect();
        for pair in steps.windows(2) {
            assert!(pair[0].progress <= pair[1].progress);
        }
    }

    #[test]
    fn round_numbers_follow_the_schedule() {
        let steps: Vec<Step> = StepMachine::encrypt(&PLAIN, &KEY, standard()).collect();
        assert_eq!(steps[1].round, 0);
        assert_eq!(steps[2].round, 1);
        assert_eq!(steps[41].round, 10);
        let ark_count = steps
            .iter()
            .filter(|s| s.op == StepKind::AddRoundKey)
            .count();
        assert_eq!(ark_count, 11);
    }
}
