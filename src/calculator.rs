
use crate::data_types::classification::{Classification, Outcome};
use crate::data_types::classified_site::ClassifiedSite;
use crate::data_types::summary_metrics::{ConcordanceSummary, RateCounts};

/// Returns true for outcomes at sites that were never evaluated; these are dropped
/// from every statistic, unlike filter failures which stay in scope.
fn is_unevaluated(outcome: Outcome) -> bool {
    matches!(outcome, Outcome::Masked | Outcome::MissingPos)
}

/// Returns true for outcomes where pipeline B produced a matching-direction genotype call.
/// Filter failures count: the call was made and merely failed quality filtering.
fn is_called(outcome: Outcome) -> bool {
    matches!(outcome,
        Outcome::TrueRef | Outcome::TrueAlt | Outcome::DiffAlt |
        Outcome::AFailFilter | Outcome::BFailFilter | Outcome::BothFailFilter
    )
}

/// Returns true for outcomes where both pipelines committed to a definite,
/// filter-passing REF or ALT call.
fn is_definite_call(outcome: Outcome) -> bool {
    matches!(outcome,
        Outcome::TrueRef | Outcome::FalseRef | Outcome::TrueAlt | Outcome::FalseAlt | Outcome::DiffAlt
    )
}

/// Returns true for outcomes where both pipelines called the identical allele.
fn is_exact_agreement(outcome: Outcome) -> bool {
    matches!(outcome, Outcome::TrueRef | Outcome::TrueAlt)
}

/// Restricts the table to the requested scope and drops unevaluated sites.
/// Local scope keeps pipeline A's ALT calls; genome-wide keeps REF and ALT calls.
fn scoped(table: &[ClassifiedSite], genome_wide: bool) -> impl Iterator<Item = &ClassifiedSite> {
    table.iter()
        .filter(move |site| {
            let in_scope = if genome_wide {
                matches!(site.classification_a(), Classification::Ref | Classification::Alt)
            } else {
                site.classification_a() == Classification::Alt
            };
            in_scope && !is_unevaluated(site.outcome())
        })
}

/// Tallies how often pipeline B produced a genotype call matching pipeline A's call direction.
/// # Arguments
/// * `table` - the accumulated classified sites
/// * `genome_wide` - if true, scopes to pipeline A's REF and ALT calls instead of ALT only
pub fn call_rate_counts(table: &[ClassifiedSite], genome_wide: bool) -> RateCounts {
    let mut counts = RateCounts::default();
    for site in scoped(table, genome_wide) {
        counts.total += 1;
        if is_called(site.outcome()) {
            counts.matching += 1;
        }
    }
    counts
}

/// Calculates the call rate in [0, 1]; an empty scope is vacuously 1.0.
pub fn call_rate(table: &[ClassifiedSite], genome_wide: bool) -> f64 {
    call_rate_counts(table, genome_wide).rate()
}

/// Tallies how often the two pipelines agree on the exact allele, among sites where
/// both committed to a definite filter-passing call.
/// # Arguments
/// * `table` - the accumulated classified sites
/// * `genome_wide` - if true, scopes to pipeline A's REF and ALT calls instead of ALT only
pub fn concordance_counts(table: &[ClassifiedSite], genome_wide: bool) -> RateCounts {
    let mut counts = RateCounts::default();
    for site in scoped(table, genome_wide) {
        if is_definite_call(site.outcome()) {
            counts.total += 1;
            if is_exact_agreement(site.outcome()) {
                counts.matching += 1;
            }
        }
    }
    counts
}

/// Calculates the concordance in [0, 1]; an empty scope is vacuously 1.0.
pub fn concordance(table: &[ClassifiedSite], genome_wide: bool) -> f64 {
    concordance_counts(table, genome_wide).rate()
}

/// Computes all four headline statistics for a table in one pass per statistic.
pub fn summarize(table: &[ClassifiedSite]) -> ConcordanceSummary {
    ConcordanceSummary {
        call_rate: call_rate_counts(table, false),
        genome_wide_call_rate: call_rate_counts(table, true),
        concordance: concordance_counts(table, false),
        genome_wide_concordance: concordance_counts(table, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    use crate::data_types::classification::Classification::{Alt, Het, Missing, Null, Ref};

    fn row(id: u64, a: Classification, b: Classification, outcome: Outcome) -> ClassifiedSite {
        ClassifiedSite::new(id, a, b, outcome)
    }

    /// Every reachable (a, b, outcome) permutation, including masked and filter-failure variants.
    fn fixture_table() -> Vec<ClassifiedSite> {
        vec![
            row(1, Ref, Ref, Outcome::TrueRef),
            row(31, Ref, Ref, Outcome::BFailFilter),
            row(2, Ref, Ref, Outcome::Masked),
            row(3, Ref, Alt, Outcome::FalseAlt),
            row(43, Ref, Alt, Outcome::BothFailFilter),
            row(4, Ref, Null, Outcome::FalseNull),
            row(5, Ref, Het, Outcome::Het),
            row(6, Ref, Missing, Outcome::MissingPos),
            row(7, Alt, Ref, Outcome::FalseRef),
            row(37, Alt, Ref, Outcome::Masked),
            row(8, Alt, Alt, Outcome::TrueAlt),
            row(48, Alt, Alt, Outcome::AFailFilter),
            row(38, Alt, Alt, Outcome::BFailFilter),
            row(9, Alt, Alt, Outcome::DiffAlt),
            row(10, Alt, Null, Outcome::FalseNull),
            row(11, Alt, Het, Outcome::Het),
            row(12, Alt, Missing, Outcome::MissingPos),
            row(13, Null, Ref, Outcome::Null),
            row(14, Null, Alt, Outcome::Null),
            row(15, Null, Null, Outcome::Null),
            row(16, Null, Het, Outcome::Null),
            row(17, Null, Missing, Outcome::Null),
            row(18, Het, Ref, Outcome::Het),
            row(19, Het, Alt, Outcome::Het),
            row(20, Het, Null, Outcome::Het),
            row(21, Het, Het, Outcome::Het),
            row(22, Het, Missing, Outcome::MissingPos),
            row(23, Missing, Ref, Outcome::MissingPos),
            row(24, Missing, Alt, Outcome::MissingPos),
            row(25, Missing, Null, Outcome::MissingPos),
            row(26, Missing, Het, Outcome::MissingPos),
            row(27, Missing, Missing, Outcome::MissingPos),
        ]
    }

    #[test]
    fn test_call_rate_no_alt_in_a_returns_one() {
        let table: Vec<ClassifiedSite> = fixture_table().into_iter()
            .filter(|site| site.classification_a() != Alt)
            .collect();

        assert_approx_eq!(call_rate(&table, false), 1.0);
    }

    #[test]
    fn test_call_rate_all_permutations() {
        let table = fixture_table();
        assert_approx_eq!(call_rate(&table, false), 4.0 / 7.0);
    }

    #[test]
    fn test_genome_wide_call_rate_no_ref_or_alt_in_a_returns_one() {
        let table: Vec<ClassifiedSite> = fixture_table().into_iter()
            .filter(|site| site.classification_a() != Alt && site.classification_a() != Ref)
            .collect();

        assert_approx_eq!(call_rate(&table, true), 1.0);
    }

    #[test]
    fn test_genome_wide_call_rate_all_permutations() {
        let table = fixture_table();
        assert_approx_eq!(call_rate(&table, true), 7.0 / 13.0);
    }

    #[test]
    fn test_concordance_no_alt_in_a_returns_one() {
        let table: Vec<ClassifiedSite> = fixture_table().into_iter()
            .filter(|site| site.classification_a() != Alt)
            .collect();

        assert_approx_eq!(concordance(&table, false), 1.0);
    }

    #[test]
    fn test_concordance_all_permutations() {
        let table = fixture_table();
        assert_approx_eq!(concordance(&table, false), 1.0 / 3.0);
    }

    #[test]
    fn test_genome_wide_concordance_no_ref_or_alt_in_a_returns_one() {
        let table: Vec<ClassifiedSite> = fixture_table().into_iter()
            .filter(|site| site.classification_a() != Alt && site.classification_a() != Ref)
            .collect();

        assert_approx_eq!(concordance(&table, true), 1.0);
    }

    #[test]
    fn test_genome_wide_concordance_all_permutations() {
        let table = fixture_table();
        assert_approx_eq!(concordance(&table, true), 2.0 / 5.0);
    }

    #[test]
    fn test_empty_table_is_vacuously_concordant() {
        let table = vec![];
        assert_approx_eq!(call_rate(&table, false), 1.0);
        assert_approx_eq!(call_rate(&table, true), 1.0);
        assert_approx_eq!(concordance(&table, false), 1.0);
        assert_approx_eq!(concordance(&table, true), 1.0);
    }

    #[test]
    fn test_sharded_counts_sum_to_the_joint_counts() {
        let table = fixture_table();
        let (shard_a, shard_b) = table.split_at(table.len() / 2);

        let mut call_counts = call_rate_counts(shard_a, true);
        call_counts += call_rate_counts(shard_b, true);
        assert_eq!(call_counts, call_rate_counts(&table, true));

        let mut conc_counts = concordance_counts(shard_a, false);
        conc_counts += concordance_counts(shard_b, false);
        assert_eq!(conc_counts, concordance_counts(&table, false));
    }
}
