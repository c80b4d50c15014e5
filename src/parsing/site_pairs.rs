
use anyhow::{anyhow, bail, Context};
use indexmap::IndexMap;
use itertools::{EitherOrBoth, Itertools};
use log::{debug, info};
use noodles::vcf;
use noodles::vcf::variant::record::samples::keys::key as vcf_key;
use noodles_util::variant::io::reader::Builder as VcfBuilder;
use rustc_hash::FxHashSet;
use std::path::Path;

use crate::data_types::variant_site::VariantSite;

/// An aligned pair of records at one site; a `None` side means that pipeline has no record there.
pub type SitePair = (Option<VariantSite>, Option<VariantSite>);

/// All aligned site pairs on one chromosome, in position order.
#[derive(Clone, Debug)]
pub struct ChromSitePairs {
    /// The chromosome both record lists came from
    pub chrom: String,
    /// The aligned pairs
    pub pairs: Vec<SitePair>,
}

/// This will open a VCF file and retrieve the sample name at the given index
/// # Arguments
/// * `vcf_fn` - the VCF filename to open
/// * `index` - the index of the sample to return; 0 = first sample
pub fn get_vcf_sample_name(vcf_fn: &Path, index: usize) -> anyhow::Result<String> {
    let mut vcf_reader = VcfBuilder::default()
        .build_from_path(vcf_fn)
        .with_context(|| format!("Error while opening {vcf_fn:?}:"))?;

    let vcf_header = vcf_reader.read_header()
        .with_context(|| format!("Error while reading header of {vcf_fn:?}:"))?;

    let sample_name = vcf_header.sample_names().get_index(index)
        .ok_or(anyhow!("Sample index {index} does not exist."))?
        .clone();

    Ok(sample_name)
}

/// Loads every record of one sample from a VCF into per-chromosome site lists.
/// Chromosome blocks must be contiguous and positions sorted within each block;
/// anything else means the stream cannot be position-aligned and is an error.
/// # Arguments
/// * `vcf_fn` - the VCF filename to open
/// * `sample_name` - the sample whose genotypes are read
pub fn load_variant_sites(vcf_fn: &Path, sample_name: &str) -> anyhow::Result<IndexMap<String, Vec<VariantSite>>> {
    let mut vcf_reader = VcfBuilder::default()
        .build_from_path(vcf_fn)
        .with_context(|| format!("Error while opening {vcf_fn:?}:"))?;
    let vcf_header = vcf_reader.read_header()
        .with_context(|| format!("Error while reading header of {vcf_fn:?}:"))?;

    let sample_index = vcf_header.sample_names().get_index_of(sample_name)
        .ok_or(anyhow!("Sample name {sample_name:?} was not found in {vcf_fn:?}"))?;

    let mut chrom_sites: IndexMap<String, Vec<VariantSite>> = Default::default();
    let mut finished_chroms: FxHashSet<String> = Default::default();
    let mut current_chrom: Option<String> = None;
    for result in vcf_reader.records(&vcf_header) {
        let record: Box<dyn vcf::variant::Record> = result?;
        let record_buf = vcf::variant::RecordBuf::try_from_variant_record(&vcf_header, record.as_ref())?;
        let site = parse_site(&record_buf, sample_index)
            .with_context(|| format!("Error while parsing record in {vcf_fn:?}: {record_buf:?}"))?;

        if current_chrom.as_deref() != Some(site.chrom()) {
            if let Some(finished) = current_chrom.take() {
                finished_chroms.insert(finished);
            }
            if finished_chroms.contains(site.chrom()) {
                bail!("Records for {} in {vcf_fn:?} are not contiguous by chromosome", site.chrom());
            }
            current_chrom = Some(site.chrom().to_string());
        }

        let entry = chrom_sites.entry(site.chrom().to_string()).or_default();
        if let Some(previous) = entry.last() {
            if previous.position() > site.position() {
                bail!(
                    "Records for {} in {vcf_fn:?} are not position-sorted ({} follows {})",
                    site.chrom(), site.position(), previous.position()
                );
            }
        }
        entry.push(site);
    }

    Ok(chrom_sites)
}

/// Converts a pre-parsed record into a `VariantSite` for one sample.
/// # Arguments
/// * `record` - the record to convert
/// * `sample_index` - index of the sample to pull the genotype from
fn parse_site(record: &vcf::variant::RecordBuf, sample_index: usize) -> anyhow::Result<VariantSite> {
    let chrom = record.reference_sequence_name().to_string();
    let pos = record.variant_start().ok_or(anyhow!("Missing POS"))?; // 1-based
    let position = (pos.get() - 1) as u64; // convert to 0-based

    let alt_alleles: Vec<String> = record.alternate_bases().as_ref().to_vec();
    let filters: Vec<String> = record.filters().as_ref().iter().cloned().collect();

    // sample specific information
    let all_samples = record.samples();
    let sample = all_samples.get_index(sample_index)
        .ok_or(anyhow!("Sample index {sample_index} does not exist"))?;
    let gt = sample.get(vcf_key::GENOTYPE)
        .ok_or(anyhow!("Missing GT"))?
        .ok_or(anyhow!("Sample missing GT"))?;
    let genotype = parse_allele_calls(gt)?;

    Ok(VariantSite::new(chrom, position, filters, genotype, alt_alleles))
}

/// Parses the GT field of a record into allele-index calls.
/// Phasing does not affect site classification, so only the indices are kept.
/// # Arguments
/// * `gt` - the GT field from the record
fn parse_allele_calls(gt: &vcf::variant::record_buf::samples::sample::Value) -> anyhow::Result<Vec<Option<usize>>> {
    if let vcf::variant::record_buf::samples::sample::Value::Genotype(genotype) = gt {
        Ok(genotype.as_ref().iter().map(|allele| allele.position()).collect())
    } else {
        bail!("GT field is not a genotype: {gt:?}");
    }
}

/// Merge-joins two per-chromosome site collections into aligned pairs by position.
/// A position present on only one side produces a pair with an absent other side.
/// Chromosomes follow pipeline A's order, with B-only chromosomes appended after.
/// # Arguments
/// * `a_sites` - pipeline A's sites, per chromosome
/// * `b_sites` - pipeline B's sites, per chromosome
pub fn pair_sites(a_sites: IndexMap<String, Vec<VariantSite>>, mut b_sites: IndexMap<String, Vec<VariantSite>>) -> Vec<ChromSitePairs> {
    let mut ret = Vec::with_capacity(a_sites.len());
    for (chrom, a_list) in a_sites {
        let b_list = b_sites.shift_remove(&chrom).unwrap_or_default();
        let pairs: Vec<SitePair> = a_list.into_iter()
            .merge_join_by(b_list, |record_a, record_b| record_a.position().cmp(&record_b.position()))
            .map(|joined| match joined {
                EitherOrBoth::Both(record_a, record_b) => (Some(record_a), Some(record_b)),
                EitherOrBoth::Left(record_a) => (Some(record_a), None),
                EitherOrBoth::Right(record_b) => (None, Some(record_b)),
            })
            .collect();
        debug!("Aligned {} site pairs on {chrom}.", pairs.len());
        ret.push(ChromSitePairs { chrom, pairs });
    }

    // anything left was only seen by the B pipeline
    for (chrom, b_list) in b_sites {
        debug!("Found {} records on {chrom} from pipeline B only.", b_list.len());
        let pairs = b_list.into_iter()
            .map(|record_b| (None, Some(record_b)))
            .collect();
        ret.push(ChromSitePairs { chrom, pairs });
    }

    ret
}

/// Loads both pipelines' VCFs and aligns them into per-chromosome site pairs.
/// # Arguments
/// * `a_vcf_fn` - pipeline A's VCF filename
/// * `a_sample` - the sample to read from pipeline A's VCF
/// * `b_vcf_fn` - pipeline B's VCF filename
/// * `b_sample` - the sample to read from pipeline B's VCF
pub fn load_paired_sites(a_vcf_fn: &Path, a_sample: &str, b_vcf_fn: &Path, b_sample: &str) -> anyhow::Result<Vec<ChromSitePairs>> {
    let a_sites = load_variant_sites(a_vcf_fn, a_sample)?;
    let a_count: usize = a_sites.values().map(Vec::len).sum();
    info!("Loaded {} pipeline A records across {} chromosomes.", a_count, a_sites.len());

    let b_sites = load_variant_sites(b_vcf_fn, b_sample)?;
    let b_count: usize = b_sites.values().map(Vec::len).sum();
    info!("Loaded {} pipeline B records across {} chromosomes.", b_count, b_sites.len());

    Ok(pair_sites(a_sites, b_sites))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn site(chrom: &str, position: u64, genotype: &[Option<usize>]) -> VariantSite {
        VariantSite::new(chrom.to_string(), position, vec![], genotype.to_vec(), vec!["C".to_string()])
    }

    #[test]
    fn test_pair_sites_alignment() {
        let a_sites: IndexMap<String, Vec<VariantSite>> = [(
            "chr1".to_string(),
            vec![site("chr1", 1, &[Some(0)]), site("chr1", 4, &[Some(1)]), site("chr1", 9, &[Some(0)])]
        )].into_iter().collect();
        let b_sites: IndexMap<String, Vec<VariantSite>> = [(
            "chr1".to_string(),
            vec![site("chr1", 1, &[Some(0)]), site("chr1", 6, &[Some(1)]), site("chr1", 9, &[Some(1)])]
        )].into_iter().collect();

        let paired = pair_sites(a_sites, b_sites);
        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].chrom, "chr1");

        let pairs = &paired[0].pairs;
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (Some(site("chr1", 1, &[Some(0)])), Some(site("chr1", 1, &[Some(0)]))));
        assert_eq!(pairs[1], (Some(site("chr1", 4, &[Some(1)])), None));
        assert_eq!(pairs[2], (None, Some(site("chr1", 6, &[Some(1)]))));
        assert_eq!(pairs[3], (Some(site("chr1", 9, &[Some(0)])), Some(site("chr1", 9, &[Some(1)]))));
    }

    #[test]
    fn test_pair_sites_chromosome_handling() {
        let a_sites: IndexMap<String, Vec<VariantSite>> = [
            ("chr1".to_string(), vec![site("chr1", 1, &[Some(0)])]),
            ("chr2".to_string(), vec![site("chr2", 2, &[Some(1)])])
        ].into_iter().collect();
        let b_sites: IndexMap<String, Vec<VariantSite>> = [
            ("chr3".to_string(), vec![site("chr3", 3, &[Some(1)])]),
            ("chr1".to_string(), vec![site("chr1", 1, &[Some(1)])])
        ].into_iter().collect();

        let paired = pair_sites(a_sites, b_sites);
        let chroms: Vec<&str> = paired.iter().map(|cp| cp.chrom.as_str()).collect();
        assert_eq!(chroms, vec!["chr1", "chr2", "chr3"]);

        // chr2 is A-only, chr3 is B-only
        assert_eq!(paired[1].pairs, vec![(Some(site("chr2", 2, &[Some(1)])), None)]);
        assert_eq!(paired[2].pairs, vec![(None, Some(site("chr3", 3, &[Some(1)])))]);
    }

    #[test]
    fn test_load_variant_sites() {
        let vcf_fn = PathBuf::from("test_data/example_compare/pipeline_a.vcf");
        let chrom_sites = load_variant_sites(&vcf_fn, "sample1").unwrap();

        let chroms: Vec<&String> = chrom_sites.keys().collect();
        assert_eq!(chroms, vec!["chr1", "chr2"]);

        let chr1_sites = &chrom_sites["chr1"];
        assert_eq!(chr1_sites.len(), 4);

        // positions are converted to 0-based
        assert_eq!(chr1_sites[0].position(), 4);
        assert_eq!(chr1_sites[0].genotype(), &[Some(1), Some(1)]);
        assert_eq!(chr1_sites[0].alt_alleles(), &["C".to_string()]);
        assert!(!chr1_sites[0].fails_filter());

        // phased genotype, only the indices survive
        assert_eq!(chr1_sites[1].position(), 7);
        assert_eq!(chr1_sites[1].genotype(), &[Some(0), Some(1)]);

        // a failing FILTER column is kept as a failure
        assert_eq!(chr1_sites[2].position(), 10);
        assert!(chr1_sites[2].fails_filter());

        // no-calls map to None
        assert_eq!(chr1_sites[3].position(), 12);
        assert_eq!(chr1_sites[3].genotype(), &[None, None]);

        let chr2_sites = &chrom_sites["chr2"];
        assert_eq!(chr2_sites.len(), 1);
        assert_eq!(chr2_sites[0].position(), 5);
        assert_eq!(chr2_sites[0].genotype(), &[Some(0), Some(0)]);
    }

    #[test]
    fn test_get_vcf_sample_name() {
        let vcf_fn = PathBuf::from("test_data/example_compare/pipeline_a.vcf");
        assert_eq!(get_vcf_sample_name(&vcf_fn, 0).unwrap(), "sample1");
        assert!(get_vcf_sample_name(&vcf_fn, 1).is_err());
    }

    #[test]
    fn test_load_paired_sites() {
        let a_fn = PathBuf::from("test_data/example_compare/pipeline_a.vcf");
        let b_fn = PathBuf::from("test_data/example_compare/pipeline_b.vcf");
        let paired = load_paired_sites(&a_fn, "sample1", &b_fn, "sample1").unwrap();

        assert_eq!(paired.len(), 2);
        let chr1_pairs = &paired[0].pairs;
        assert_eq!(chr1_pairs.len(), 5);

        // A has 4, 7, 10, 12; B has 4, 8, 12
        assert!(chr1_pairs[0].0.is_some() && chr1_pairs[0].1.is_some());
        assert!(chr1_pairs[1].0.is_some() && chr1_pairs[1].1.is_none());
        assert!(chr1_pairs[2].0.is_none() && chr1_pairs[2].1.is_some());
        assert!(chr1_pairs[3].0.is_some() && chr1_pairs[3].1.is_none());
        assert!(chr1_pairs[4].0.is_some() && chr1_pairs[4].1.is_some());

        let chr2_pairs = &paired[1].pairs;
        assert_eq!(chr2_pairs.len(), 1);
        assert!(chr2_pairs[0].0.is_some() && chr2_pairs[0].1.is_some());
    }

    #[test]
    fn test_load_variant_sites_unknown_sample() {
        let vcf_fn = PathBuf::from("test_data/example_compare/pipeline_a.vcf");
        assert!(load_variant_sites(&vcf_fn, "no_such_sample").is_err());
    }

    #[test]
    fn test_load_variant_sites_unsorted_is_an_error() {
        let vcf_fn = PathBuf::from("test_data/example_compare/unsorted.vcf");
        let result = load_variant_sites(&vcf_fn, "sample1");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_variant_sites_split_chromosome_is_an_error() {
        let vcf_fn = PathBuf::from("test_data/example_compare/split_chrom.vcf");
        let result = load_variant_sites(&vcf_fn, "sample1");
        assert!(result.is_err());
    }
}
