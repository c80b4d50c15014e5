
use crate::data_types::classification::Classification;

/// One pipeline's record at a single genomic site, reduced to the fields the comparison needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantSite {
    /// Chromosome the record is on
    chrom: String,
    /// The coordinate of the record, 0-based
    position: u64,
    /// Filters the record failed; empty means the record passed
    failing_filters: Vec<String>,
    /// Allele-index calls for the selected sample; `None` is a no-call
    genotype: Vec<Option<usize>>,
    /// Alternate allele sequences, in ALT column order
    alt_alleles: Vec<String>
}

impl VariantSite {
    /// Constructor. Pass markers ("PASS", ".") in the filter list are dropped, they are not failures.
    /// # Arguments
    /// * `chrom` - chromosome the record is on
    /// * `position` - the coordinate of the record, 0-based
    /// * `filters` - raw FILTER tokens from the record
    /// * `genotype` - allele-index calls for the selected sample
    /// * `alt_alleles` - alternate allele sequences
    pub fn new(chrom: String, position: u64, filters: Vec<String>, genotype: Vec<Option<usize>>, alt_alleles: Vec<String>) -> Self {
        let failing_filters: Vec<String> = filters.into_iter()
            .filter(|token| token != "PASS" && token != ".")
            .collect();

        Self {
            chrom,
            position,
            failing_filters,
            genotype,
            alt_alleles
        }
    }

    /// Returns true if the record failed at least one filter
    pub fn fails_filter(&self) -> bool {
        !self.failing_filters.is_empty()
    }

    /// Derives the genotype classification for this record
    pub fn classification(&self) -> Classification {
        Classification::from_allele_calls(&self.genotype)
    }

    /// Returns the alternate allele sequence this record calls, if the call is a single consistent ALT.
    /// Returns `None` for REF/HET/NULL calls and for allele indices outside the ALT list.
    pub fn called_alt(&self) -> Option<&str> {
        let mut called = self.genotype.iter().flatten().copied();
        let first = called.next()?;
        if first == 0 || called.any(|allele| allele != first) {
            return None;
        }

        self.alt_alleles.get(first - 1).map(|allele| allele.as_str())
    }

    // getters
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn genotype(&self) -> &[Option<usize>] {
        &self.genotype
    }

    pub fn alt_alleles(&self) -> &[String] {
        &self.alt_alleles
    }
}
