//! Metric evaluators and the assembled report.

use serde::{Deserialize, Serialize};

use sbox_core::{parity, weight, SBox};

use crate::boolean::BooleanFunction;
use crate::summary::SecuritySummary;
use crate::tables::{Ddt, Lat};

/// Full metric report for one S-box.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    /// Nonlinearity over the eight output bits.
    pub nonlinearity: u32,
    /// Strict avalanche criterion matrix and scores.
    pub sac: SacReport,
    /// Bit independence criterion, nonlinearity flavour.
    pub bic_nl: BicNlReport,
    /// Bit independence criterion, correlation flavour.
    pub bic_sac: BicSacReport,
    /// Linear approximation bias and probability.
    pub linear: LinearReport,
    /// Differential uniformity and probability.
    pub differential: DifferentialReport,
    /// Largest algebraic degree across output bits.
    pub algebraic_degree: u32,
    /// Transparency order (chi-squared contingency variant).
    pub transparency_order: f64,
    /// Largest correlation immunity order across output bits.
    pub correlation_immunity: u32,
    /// Whether every byte value occurs equally often.
    pub balanced: bool,
    /// Whether the table is a bijection.
    pub bijective: bool,
    /// Qualitative strengths, weaknesses, and overall level.
    pub summary: SecuritySummary,
}

/// Strict avalanche criterion results.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SacReport {
    /// `matrix[i][j]` is the probability that flipping input bit `i`
    /// flips output bit `j`.
    pub matrix: [[f64; 8]; 8],
    /// Mean absolute deviation of the matrix from 1/2.
    pub score: f64,
    /// Largest absolute deviation from 1/2.
    pub max_deviation: f64,
}

/// Bit independence criterion over pairwise XORs of output bits,
/// measured as nonlinearity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BicNlReport {
    /// Smallest pairwise nonlinearity.
    pub min: u32,
    /// Mean pairwise nonlinearity.
    pub mean: f64,
    /// All 28 values, ordered lexicographically by bit pair `(i, j)`, `i < j`.
    pub pairs: Vec<u32>,
}

/// Bit independence criterion measured as absolute normalized correlation
/// between pairs of output bit streams.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BicSacReport {
    /// Largest pairwise correlation.
    pub max: f64,
    /// Mean pairwise correlation.
    pub mean: f64,
    /// All 28 values, ordered lexicographically by bit pair `(i, j)`, `i < j`.
    pub pairs: Vec<f64>,
}

/// Linear approximation results derived from the LAT.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearReport {
    /// Largest absolute bias over non-trivial mask pairs.
    pub max_bias: u32,
    /// Linear approximation probability `(max_bias / 128)²`.
    pub probability: f64,
}

/// Differential results derived from the DDT.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DifferentialReport {
    /// Largest DDT count over non-zero input differences.
    pub uniformity: u32,
    /// Differential approximation probability `uniformity / 256`.
    pub probability: f64,
}

/// Computes the SAC matrix together with its summary scores.
pub(crate) fn sac_report(sbox: &SBox) -> SacReport {
    let mut matrix = [[0f64; 8]; 8];
    for (i, row) in matrix.iter_mut().enumerate() {
        let mut flips = [0u32; 8];
        for x in 0..=255u8 {
            let derivative = sbox.apply(x) ^ sbox.apply(x ^ (1u8 << i));
            for (j, flip) in flips.iter_mut().enumerate() {
                *flip += u32::from((derivative >> j) & 1);
            }
        }
        for (slot, &flip) in row.iter_mut().zip(flips.iter()) {
            *slot = f64::from(flip) / 256.0;
        }
    }

    let deviations = matrix.iter().flatten().map(|p| (p - 0.5).abs());
    let score = deviations.clone().sum::<f64>() / 64.0;
    let max_deviation = deviations.fold(0f64, f64::max);
    SacReport {
        matrix,
        score,
        max_deviation,
    }
}

/// Nonlinearity of every pairwise XOR of output bits.
pub(crate) fn bic_nl_report(bits: &[BooleanFunction; 8]) -> BicNlReport {
    let pairs: Vec<u32> = bit_pairs()
        .map(|(i, j)| {
            let combined = bits[i].xor(&bits[j]);
            crate::boolean::WalshSpectrum::of(&combined).nonlinearity()
        })
        .collect();
    let min = *pairs.iter().min().expect("28 pairs");
    let mean = pairs.iter().map(|&v| f64::from(v)).sum::<f64>() / pairs.len() as f64;
    BicNlReport { min, mean, pairs }
}

/// Absolute normalized correlation of every pair of output bit streams.
pub(crate) fn bic_sac_report(bits: &[BooleanFunction; 8]) -> BicSacReport {
    let pairs: Vec<f64> = bit_pairs()
        .map(|(i, j)| {
            let correlation: i32 = (0..=255u8)
                .map(|x| {
                    let a = 2 * i32::from(bits[i].get(x)) - 1;
                    let b = 2 * i32::from(bits[j].get(x)) - 1;
                    a * b
                })
                .sum();
            f64::from(correlation.abs()) / 256.0
        })
        .collect();
    let max = pairs.iter().copied().fold(0f64, f64::max);
    let mean = pairs.iter().sum::<f64>() / pairs.len() as f64;
    BicSacReport { max, mean, pairs }
}

/// Reads the largest non-trivial bias out of the LAT.
pub(crate) fn linear_report(lat: &Lat) -> LinearReport {
    let max_bias = lat.max_abs_bias() as u32;
    let normalized = f64::from(max_bias) / 128.0;
    LinearReport {
        max_bias,
        probability: normalized * normalized,
    }
}

/// Reads differential uniformity out of the DDT.
pub(crate) fn differential_report(ddt: &Ddt) -> DifferentialReport {
    let uniformity = ddt.differential_uniformity();
    DifferentialReport {
        uniformity,
        probability: f64::from(uniformity) / 256.0,
    }
}

/// Transparency order, chi-squared contingency variant.
///
/// For every unordered pair of input bits and every non-zero output mask,
/// the 256 inputs split into four 64-element classes keyed by the two
/// selected input bits; within each class the inputs divide by the parity
/// of the masked output. The statistic is the chi-squared distance of the
/// resulting 4×2 table from uniform with expected count 32 per cell, and
/// the metric is the largest square root over all choices.
///
/// This contingency formulation differs from textbook definitions such
/// as Prouff's; see [`transparency_order_prouff`] for the latter.
pub fn transparency_order(sbox: &SBox) -> f64 {
    const EXPECTED: f64 = 32.0;
    let mut max_stat = 0f64;
    for (i, j) in bit_pairs() {
        for beta in 1..=255u8 {
            let mut ones = [0u32; 4];
            for x in 0..=255u8 {
                let class = ((usize::from(x >> i) & 1) << 1) | (usize::from(x >> j) & 1);
                ones[class] += u32::from(parity(sbox.apply(x) & beta));
            }
            let mut chi2 = 0f64;
            for &one in &ones {
                let zero = 64 - one;
                chi2 += (f64::from(one) - EXPECTED).powi(2) / EXPECTED;
                chi2 += (f64::from(zero) - EXPECTED).powi(2) / EXPECTED;
            }
            max_stat = max_stat.max(chi2.sqrt());
        }
    }
    max_stat
}

/// Transparency order after Prouff (CHES 2005).
///
/// `max_{β} ( |8 − 2·wt(β)| − (2^16 − 2^8)^{-1} Σ_{a≠0} |Σ_j (−1)^{β_j} AC_j(a)| )`
/// over every output mask, where `AC_j(a)` is the autocorrelation of
/// output bit `j` at input difference `a`. Offered alongside the
/// contingency variant for comparison with the literature.
pub fn transparency_order_prouff(sbox: &SBox) -> f64 {
    // autocorrelation[j][a] = Σ_x (−1)^{f_j(x) ⊕ f_j(x ⊕ a)}
    let mut autocorrelation = [[0i32; 256]; 8];
    for (j, row) in autocorrelation.iter_mut().enumerate() {
        for (a, slot) in row.iter_mut().enumerate().skip(1) {
            let mut sum = 0i32;
            for x in 0..=255u8 {
                let d = (sbox.apply(x) ^ sbox.apply(x ^ a as u8)) >> j & 1;
                sum += 1 - 2 * i32::from(d);
            }
            *slot = sum;
        }
    }

    let denom = f64::from(1u32 << 16) - 256.0;
    let mut order = 0f64;
    for beta in 0..=255u8 {
        let affine_distance = f64::from((8 - 2 * i32::from(weight(beta))).abs());
        let mut spread = 0f64;
        for a in 1..=255usize {
            let mut inner = 0i32;
            for (j, row) in autocorrelation.iter().enumerate() {
                let sign = if (beta >> j) & 1 == 1 { -1 } else { 1 };
                inner += sign * row[a];
            }
            spread += f64::from(inner.abs());
        }
        order = order.max(affine_distance - spread / denom);
    }
    order
}

/// Whether every byte value occurs exactly once in the table.
pub(crate) fn is_uniform(table: &[u8; 256]) -> bool {
    let mut counts = [0u16; 256];
    for &value in table.iter() {
        counts[value as usize] += 1;
    }
    counts.iter().all(|&count| count == 1)
}

fn bit_pairs() -> impl Iterator<Item = (usize, usize)> + Clone {
    (0..8).flat_map(|i| (i + 1..8).map(move |j| (i, j)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbox_core::AES_SBOX;

    fn aes_sbox() -> SBox {
        SBox::from_array(AES_SBOX).unwrap()
    }

    fn identity_sbox() -> SBox {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        SBox::from_array(table).unwrap()
    }

    fn bits_of(sbox: &SBox) -> [BooleanFunction; 8] {
        core::array::from_fn(|bit| BooleanFunction::output_bit(sbox, bit))
    }

    #[test]
    fn aes_sac_matrix_stays_near_half() {
        let sac = sac_report(&aes_sbox());
        for row in &sac.matrix {
            for &p in row {
                assert!((0.4..=0.6).contains(&p), "probability {p} out of band");
            }
        }
        assert!(sac.score > 0.0 && sac.score < 0.1);
        assert!(sac.max_deviation <= 0.0625 + 1e-12);
    }

    #[test]
    fn identity_sac_probabilities_are_degenerate() {
        // Flipping input bit i of the identity map flips exactly output bit i.
        let sac = sac_report(&identity_sbox());
        for (i, row) in sac.matrix.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(p, expected);
            }
        }
        assert_eq!(sac.score, 0.5);
    }

    #[test]
    fn bic_nl_pair_count_and_aes_floor() {
        let report = bic_nl_report(&bits_of(&aes_sbox()));
        assert_eq!(report.pairs.len(), 28);
        assert!(report.min >= 100, "AES pairwise nonlinearity {}", report.min);
        assert!(report.mean >= f64::from(report.min));
    }

    #[test]
    fn bic_sac_vanishes_for_bijections() {
        // Every non-trivial component of a permutation is balanced, so the
        // pairwise correlations are exactly zero.
        for sbox in [aes_sbox(), identity_sbox()] {
            let report = bic_sac_report(&bits_of(&sbox));
            assert_eq!(report.pairs.len(), 28);
            assert_eq!(report.max, 0.0);
            assert_eq!(report.mean, 0.0);
        }
    }

    #[test]
    fn transparency_orders_are_finite_and_distinct() {
        let sbox = aes_sbox();
        let contingency = transparency_order(&sbox);
        let prouff = transparency_order_prouff(&sbox);
        assert!(contingency > 0.0 && contingency.is_finite());
        assert!((0.0..=8.0).contains(&prouff));
        assert!((contingency - prouff).abs() > 1e-6);
    }

    #[test]
    fn uniformity_detects_duplicates() {
        assert!(is_uniform(&AES_SBOX));
        let mut table = AES_SBOX;
        table[10] = table[20];
        assert!(!is_uniform(&table));
    }
}
