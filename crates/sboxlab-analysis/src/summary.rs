//! Qualitative projection of the numeric metrics.

use serde::{Deserialize, Serialize};

/// Overall qualitative rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// No threshold violated.
    High,
    /// At most two thresholds violated.
    Medium,
    /// Three or more thresholds violated.
    Low,
}

/// Strengths, weaknesses, and the resulting level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    /// Metrics that met their threshold.
    pub strengths: Vec<String>,
    /// Metrics that missed their threshold.
    pub weaknesses: Vec<String>,
    /// Overall rating derived from the weakness count.
    pub level: SecurityLevel,
}

/// Classifies the headline metrics against fixed thresholds.
///
/// Nonlinearity at least 100, differential uniformity at most 4, linear
/// bias at most 32, and SAC score at most 0.1 each count as a strength;
/// anything else is a weakness.
pub fn summarize(
    nonlinearity: u32,
    differential_uniformity: u32,
    max_linear_bias: u32,
    sac_score: f64,
) -> SecuritySummary {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    let mut classify = |ok: bool, strength: &str, weakness: &str| {
        if ok {
            strengths.push(strength.to_owned());
        } else {
            weaknesses.push(weakness.to_owned());
        }
    };

    classify(
        nonlinearity >= 100,
        "High nonlinearity",
        "Low nonlinearity",
    );
    classify(
        differential_uniformity <= 4,
        "Low differential uniformity",
        "High differential uniformity",
    );
    classify(
        max_linear_bias <= 32,
        "Low linear approximation bias",
        "High linear approximation bias",
    );
    classify(
        sac_score <= 0.1,
        "Good avalanche characteristics",
        "Poor avalanche characteristics",
    );

    let level = match weaknesses.len() {
        0 => SecurityLevel::High,
        1 | 2 => SecurityLevel::Medium,
        _ => SecurityLevel::Low,
    };

    SecuritySummary {
        strengths,
        weaknesses,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flawless_metrics_rate_high() {
        let summary = summarize(112, 4, 16, 0.02);
        assert!(summary.weaknesses.is_empty());
        assert_eq!(summary.strengths.len(), 4);
        assert_eq!(summary.level, SecurityLevel::High);
    }

    #[test]
    fn two_misses_rate_medium() {
        let summary = summarize(96, 8, 16, 0.02);
        assert_eq!(summary.weaknesses.len(), 2);
        assert_eq!(summary.level, SecurityLevel::Medium);
    }

    #[test]
    fn broken_metrics_rate_low() {
        let summary = summarize(0, 256, 128, 0.5);
        assert_eq!(summary.level, SecurityLevel::Low);
        assert!(summary
            .weaknesses
            .iter()
            .any(|w| w == "Low nonlinearity"));
        assert!(summary
            .weaknesses
            .iter()
            .any(|w| w == "High differential uniformity"));
    }
}
