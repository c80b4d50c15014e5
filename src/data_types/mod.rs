/// Contains the genotype classification and outcome vocabulary
pub mod classification;
/// Contains the classified result rows that feed aggregation
pub mod classified_site;
/// Contains tally types for the call rate and concordance statistics
pub mod summary_metrics;
/// Contains the per-pipeline variant record representation
pub mod variant_site;
