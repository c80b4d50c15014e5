
/// Single-site genotype category for one pipeline's call
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::AsRefStr)]
pub enum Classification {
    /// All called alleles are the reference allele
    #[strum(serialize = "REF")]
    Ref,
    /// All called alleles are the same non-reference allele
    #[strum(serialize = "ALT")]
    Alt,
    /// Called alleles disagree; a REF/ALT mix or multiple distinct ALTs
    #[strum(serialize = "HET")]
    Het,
    /// Every allele in the call is the no-call sentinel
    #[strum(serialize = "NULL")]
    Null,
    /// The pipeline produced no record at this site
    #[strum(serialize = "MISSING")]
    Missing
}

impl Classification {
    /// Derives the classification from the allele-index calls of a genotype.
    /// `None` entries are no-calls; phasing is expected to be stripped upstream.
    /// # Arguments
    /// * `calls` - the allele-index calls, one per ploid
    pub fn from_allele_calls(calls: &[Option<usize>]) -> Classification {
        let mut called = calls.iter().flatten().copied();
        let first = match called.next() {
            Some(allele) => allele,
            // nothing was resolved, including the degenerate empty call
            None => return Classification::Null
        };

        if called.any(|allele| allele != first) {
            Classification::Het
        } else if first == 0 {
            Classification::Ref
        } else {
            Classification::Alt
        }
    }
}

/// Joint taxonomy assigned to a compared site; exactly one per site pair
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::AsRefStr)]
pub enum Outcome {
    /// Both pipelines called the reference allele
    #[strum(serialize = "TRUE_REF")]
    TrueRef,
    /// Pipeline A called ALT, pipeline B called REF
    #[strum(serialize = "FALSE_REF")]
    FalseRef,
    /// Both pipelines called the identical alternate allele
    #[strum(serialize = "TRUE_ALT")]
    TrueAlt,
    /// Pipeline A called REF, pipeline B called ALT
    #[strum(serialize = "FALSE_ALT")]
    FalseAlt,
    /// Both pipelines called ALT but disagree on the allele
    #[strum(serialize = "DIFF_ALT")]
    DiffAlt,
    /// Pipeline B produced no usable call where pipeline A called REF or ALT
    #[strum(serialize = "FALSE_NULL")]
    FalseNull,
    /// Pipeline A produced no usable call, invalidating the comparison
    #[strum(serialize = "NULL")]
    Null,
    /// At least one side is heterozygous
    #[strum(serialize = "HET")]
    Het,
    /// At least one side has no record at this site
    #[strum(serialize = "MISSING_POS")]
    MissingPos,
    /// The site is in the exclusion mask
    #[strum(serialize = "MASKED")]
    Masked,
    /// Only pipeline A's record failed its filters
    #[strum(serialize = "A_FAIL_FILTER")]
    AFailFilter,
    /// Only pipeline B's record failed its filters
    #[strum(serialize = "B_FAIL_FILTER")]
    BFailFilter,
    /// Both records failed their filters
    #[strum(serialize = "BOTH_FAIL_FILTER")]
    BothFailFilter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_call() {
        assert_eq!(Classification::from_allele_calls(&[None]), Classification::Null);
        assert_eq!(Classification::from_allele_calls(&[None, None]), Classification::Null);
    }

    #[test]
    fn test_hom_ref_call() {
        assert_eq!(Classification::from_allele_calls(&[Some(0), Some(0)]), Classification::Ref);
        // a partial no-call does not change the resolved alleles
        assert_eq!(Classification::from_allele_calls(&[Some(0), None]), Classification::Ref);
    }

    #[test]
    fn test_het_call() {
        assert_eq!(Classification::from_allele_calls(&[Some(1), Some(0)]), Classification::Het);
        // two distinct ALTs disagree just like a REF/ALT mix
        assert_eq!(Classification::from_allele_calls(&[Some(1), Some(2)]), Classification::Het);
    }

    #[test]
    fn test_hom_alt_call() {
        assert_eq!(Classification::from_allele_calls(&[Some(1), Some(1)]), Classification::Alt);
        assert_eq!(Classification::from_allele_calls(&[Some(3)]), Classification::Alt);
        assert_eq!(Classification::from_allele_calls(&[Some(1), None]), Classification::Alt);
    }

    #[test]
    fn test_empty_call() {
        assert_eq!(Classification::from_allele_calls(&[]), Classification::Null);
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!(Classification::Ref.as_ref(), "REF");
        assert_eq!(Classification::Missing.as_ref(), "MISSING");
        assert_eq!(Outcome::TrueAlt.as_ref(), "TRUE_ALT");
        assert_eq!(Outcome::BothFailFilter.as_ref(), "BOTH_FAIL_FILTER");
    }
}
