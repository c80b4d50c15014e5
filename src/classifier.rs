
use derive_builder::Builder;

use crate::data_types::classification::{Classification, Outcome};
use crate::data_types::variant_site::VariantSite;
use crate::parsing::mask::PositionMask;

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ClassifyError {
    #[error("paired records are at different sites: {chrom_a}:{position_a} vs {chrom_b}:{position_b}")]
    PositionMismatch {
        chrom_a: String,
        position_a: u64,
        chrom_b: String,
        position_b: u64
    }
}

/// Classifies aligned record pairs into the outcome taxonomy.
/// Holds only immutable configuration, so one instance is shared across the whole pass.
#[derive(Builder, Clone, Debug, Default)]
#[builder(default)]
pub struct Classifier {
    /// Positions excluded from comparison
    mask: PositionMask,
    /// If true, records with failing filters override the genotype outcome
    apply_filter: bool,
}

impl Classifier {
    /// Classifies one aligned pair of records into their per-side classifications and the joint outcome.
    /// A `None` side means that pipeline produced no record at this site.
    /// The rules below are evaluated top-down and the first match wins:
    /// masked site, then uncallable A side, then filter failures (when enforced), then the genotype combination.
    /// # Arguments
    /// * `variant_a` - pipeline A's record at the site, if any
    /// * `variant_b` - pipeline B's record at the site, if any
    /// # Errors
    /// * if the two records do not describe the same site, which indicates the input streams desynchronized
    pub fn classify(&self, variant_a: Option<&VariantSite>, variant_b: Option<&VariantSite>)
        -> Result<(Classification, Classification, Outcome), ClassifyError> {
        let (chrom, position) = match (variant_a, variant_b) {
            (Some(record_a), Some(record_b)) => {
                if record_a.chrom() != record_b.chrom() || record_a.position() != record_b.position() {
                    return Err(ClassifyError::PositionMismatch {
                        chrom_a: record_a.chrom().to_string(),
                        position_a: record_a.position(),
                        chrom_b: record_b.chrom().to_string(),
                        position_b: record_b.position()
                    });
                }
                (record_a.chrom(), record_a.position())
            },
            (Some(record_a), None) => (record_a.chrom(), record_a.position()),
            (None, Some(record_b)) => (record_b.chrom(), record_b.position()),
            // neither pipeline has a record here, there is no site to look up
            (None, None) => return Ok((Classification::Missing, Classification::Missing, Outcome::MissingPos))
        };

        let classification_a = variant_a.map_or(Classification::Missing, |record| record.classification());
        let classification_b = variant_b.map_or(Classification::Missing, |record| record.classification());

        // rule 1: masked sites always report Masked, whatever was called
        if self.mask.contains(chrom, position) {
            return Ok((classification_a, classification_b, Outcome::Masked));
        }

        // rule 2: an uncallable A side invalidates the comparison outright
        if classification_a == Classification::Null {
            return Ok((classification_a, classification_b, Outcome::Null));
        }

        // rule 3: filter failures override the genotype outcome when enforcement is on
        if self.apply_filter {
            let a_failed = variant_a.is_some_and(|record| record.fails_filter());
            let b_failed = variant_b.is_some_and(|record| record.fails_filter());
            match (a_failed, b_failed) {
                (true, true) => return Ok((classification_a, classification_b, Outcome::BothFailFilter)),
                (true, false) => return Ok((classification_a, classification_b, Outcome::AFailFilter)),
                (false, true) => return Ok((classification_a, classification_b, Outcome::BFailFilter)),
                (false, false) => {}
            }
        }

        // rule 4: the genotype combination decides
        let outcome = match (classification_a, classification_b) {
            // rule 2 already fired for these; kept so the table stays total
            (Classification::Null, _) => Outcome::Null,
            (Classification::Missing, _) | (_, Classification::Missing) => Outcome::MissingPos,
            (Classification::Het, _) | (_, Classification::Het) => Outcome::Het,
            (_, Classification::Null) => Outcome::FalseNull,
            (Classification::Ref, Classification::Ref) => Outcome::TrueRef,
            (Classification::Ref, Classification::Alt) => Outcome::FalseAlt,
            (Classification::Alt, Classification::Ref) => Outcome::FalseRef,
            (Classification::Alt, Classification::Alt) => {
                // both committed to an ALT, so the allele identity decides
                match (variant_a.and_then(|r| r.called_alt()), variant_b.and_then(|r| r.called_alt())) {
                    (Some(alt_a), Some(alt_b)) if alt_a == alt_b => Outcome::TrueAlt,
                    _ => Outcome::DiffAlt
                }
            }
        };

        Ok((classification_a, classification_b, outcome))
    }
}
