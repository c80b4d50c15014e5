
use serde::Serialize;
use std::ops::AddAssign;

/// Numerator/denominator tally behind a single summary statistic
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RateCounts {
    /// Number of in-scope sites satisfying the statistic
    pub matching: u64,
    /// Number of in-scope sites eligible for the statistic
    pub total: u64,
}

impl AddAssign for RateCounts {
    // Enables += with shard tallies
    fn add_assign(&mut self, rhs: Self) {
        self.matching += rhs.matching;
        self.total += rhs.total;
    }
}

impl RateCounts {
    /// Constructor
    pub fn new(matching: u64, total: u64) -> Self {
        Self {
            matching, total
        }
    }

    /// Calculates the rate; an empty tally has no opportunity to disagree and scores 1.0
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matching as f64 / self.total as f64
        }
    }
}

/// The headline statistics for a full comparison run
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ConcordanceSummary {
    /// Call rate restricted to pipeline A's ALT calls
    pub call_rate: RateCounts,
    /// Call rate over pipeline A's REF and ALT calls
    pub genome_wide_call_rate: RateCounts,
    /// Allele agreement restricted to pipeline A's ALT calls
    pub concordance: RateCounts,
    /// Allele agreement over pipeline A's REF and ALT calls
    pub genome_wide_concordance: RateCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_rate() {
        let counts = RateCounts::new(4, 7);
        assert_approx_eq!(counts.rate(), 4.0 / 7.0);
    }

    #[test]
    fn test_empty_rate_is_vacuously_full() {
        let counts = RateCounts::default();
        assert_approx_eq!(counts.rate(), 1.0);
    }

    #[test]
    fn test_add_assign() {
        let mut counts = RateCounts::new(3, 5);
        counts += RateCounts::new(1, 8);
        assert_eq!(counts, RateCounts::new(4, 13));
    }
}
