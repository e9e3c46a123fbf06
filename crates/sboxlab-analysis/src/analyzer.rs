//! The analyzer façade with its at-most-once table caches.

use once_cell::sync::OnceCell;

use sbox_core::{Error, SBox};

use crate::boolean::{BooleanFunction, WalshSpectrum};
use crate::metrics::{self, Report};
use crate::summary::{summarize, SecuritySummary};
use crate::tables::{Ddt, Lat};

/// Computes all metrics for a single S-box.
///
/// The S-box is copied at construction and the analyzer is logically
/// immutable afterwards: the truth tables, Walsh spectra, LAT, and DDT are
/// materialised at most once, on first use, behind [`OnceCell`] fields, so
/// a shared reference can be published across threads safely.
pub struct Analyzer {
    sbox: SBox,
    bits: [OnceCell<BooleanFunction>; 8],
    spectra: [OnceCell<WalshSpectrum>; 8],
    lat: OnceCell<Lat>,
    ddt: OnceCell<Ddt>,
}

impl Analyzer {
    /// Creates an analyzer for a validated S-box.
    pub fn new(sbox: SBox) -> Self {
        Self {
            sbox,
            bits: Default::default(),
            spectra: Default::default(),
            lat: OnceCell::new(),
            ddt: OnceCell::new(),
        }
    }

    /// Validates a byte slice and creates an analyzer for it.
    pub fn from_slice(values: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(SBox::from_slice(values)?))
    }

    /// Returns the S-box under analysis.
    pub fn sbox(&self) -> &SBox {
        &self.sbox
    }

    fn bit(&self, i: usize) -> &BooleanFunction {
        self.bits[i].get_or_init(|| BooleanFunction::output_bit(&self.sbox, i))
    }

    fn bits(&self) -> [BooleanFunction; 8] {
        core::array::from_fn(|i| self.bit(i).clone())
    }

    fn spectrum(&self, i: usize) -> &WalshSpectrum {
        self.spectra[i].get_or_init(|| WalshSpectrum::of(self.bit(i)))
    }

    /// The cached linear approximation table.
    pub fn lat(&self) -> &Lat {
        self.lat.get_or_init(|| Lat::build(&self.sbox))
    }

    /// The cached difference distribution table.
    pub fn ddt(&self) -> &Ddt {
        self.ddt.get_or_init(|| Ddt::build(&self.sbox))
    }

    /// Nonlinearity: `128 − max_i max_{w≠0} |W_i[w]| / 2`.
    pub fn nonlinearity(&self) -> u32 {
        let worst = (0..8)
            .map(|i| self.spectrum(i).max_abs_nontrivial())
            .max()
            .expect("eight output bits");
        (128 - worst / 2) as u32
    }

    /// Largest algebraic degree across output bits.
    pub fn algebraic_degree(&self) -> u32 {
        (0..8)
            .map(|i| self.bit(i).algebraic_degree())
            .max()
            .expect("eight output bits")
    }

    /// Largest correlation immunity order across output bits.
    pub fn correlation_immunity(&self) -> u32 {
        (0..8)
            .map(|i| self.spectrum(i).correlation_immunity())
            .max()
            .expect("eight output bits")
    }

    /// Transparency order, chi-squared contingency variant.
    pub fn transparency_order(&self) -> f64 {
        metrics::transparency_order(&self.sbox)
    }

    /// Transparency order after Prouff (CHES 2005).
    pub fn transparency_order_prouff(&self) -> f64 {
        metrics::transparency_order_prouff(&self.sbox)
    }

    /// Qualitative summary of the headline metrics.
    pub fn summary(&self) -> SecuritySummary {
        let sac = metrics::sac_report(&self.sbox);
        summarize(
            self.nonlinearity(),
            self.ddt().differential_uniformity(),
            self.lat().max_abs_bias() as u32,
            sac.score,
        )
    }

    /// Runs every metric and assembles the full report.
    pub fn report(&self) -> Report {
        let bits = self.bits();
        let sac = metrics::sac_report(&self.sbox);
        let bic_nl = metrics::bic_nl_report(&bits);
        let bic_sac = metrics::bic_sac_report(&bits);
        let linear = metrics::linear_report(self.lat());
        let differential = metrics::differential_report(self.ddt());
        let nonlinearity = self.nonlinearity();
        let uniform = metrics::is_uniform(self.sbox.as_array());
        let summary = summarize(
            nonlinearity,
            differential.uniformity,
            linear.max_bias,
            sac.score,
        );

        Report {
            nonlinearity,
            sac,
            bic_nl,
            bic_sac,
            linear,
            differential,
            algebraic_degree: self.algebraic_degree(),
            transparency_order: self.transparency_order(),
            correlation_immunity: self.correlation_immunity(),
            balanced: uniform,
            bijective: uniform,
            summary,
        }
    }
}

/// Validates a byte slice and computes the full report for it.
pub fn analyze(values: &[u8]) -> Result<Report, Error> {
    Ok(Analyzer::from_slice(values)?.report())
}
