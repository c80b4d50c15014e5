
use anyhow::Context;
use coitrees::{COITree, Interval, IntervalTree};
use indexmap::IndexMap;
use log::debug;
use noodles::bed::io::reader::Builder as BedBuilder;
use noodles::bed::{io::Reader as BedReader, Record as BedRecord};
use std::io::BufReader;
use std::path::Path;

/// Wrapper function that handles both bgzip compressed and uncompressed BED files
/// # Arguments
/// * `filename` - path to the .bed(.gz) file to open
fn open_bed_file(filename: &Path) -> anyhow::Result<BedReader<3, BufReader<Box<dyn std::io::Read>>>> {
    let is_compressed = match filename.extension() {
        Some(extension) => {
            extension == "gz"
        },
        None => false
    };

    let buf_reader: Box<dyn std::io::Read> = if is_compressed {
        #[allow(clippy::default_constructed_unit_structs)]
        let bgzf_reader = noodles::bgzf::io::reader::Builder::default()
            .build_from_path(filename)
            .with_context(|| format!("Error while loading {filename:?}:"))?;
        Box::new(bgzf_reader)
    } else {
        Box::new(std::fs::File::open(filename)?)
    };

    #[allow(clippy::default_constructed_unit_structs)]
    let bed_reader = BedBuilder::<3>::default()
        .build_from_reader(buf_reader);
    Ok(bed_reader)
}

/// Set of genomic positions excluded from comparison, queried one site at a time.
#[derive(Clone, Default)]
pub struct PositionMask {
    /// Lookup from a chromosome to a COITree, which has 0-based inclusive ranges
    lookup_trees: IndexMap<String, COITree<(), usize>>
}

impl std::fmt::Debug for PositionMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // COITree does not have Debug, so lets just convert it to a length for simplicity
        let lookup_counts: IndexMap<String, usize> = self.lookup_trees.iter()
            .map(|(chrom, tree)| {
                (chrom.clone(), tree.len())
            })
            .collect();
        f.debug_struct("PositionMask").field("lookup_trees_len", &lookup_counts).finish()
    }
}

impl PositionMask {
    /// Loads a BED file of masked regions and converts the entries into search trees.
    /// # Arguments
    /// * `bed_fn` - path to the .bed(.gz) file to load
    pub fn from_bed(bed_fn: &Path) -> anyhow::Result<Self> {
        debug!("Pre-loading {bed_fn:?}...");
        let mut bed_handle = open_bed_file(bed_fn)
            .with_context(|| format!("Error while opening {bed_fn:?}:"))?;

        let mut record = BedRecord::<3>::default();
        let mut chrom_intervals: IndexMap<String, Vec<Interval<()>>> = Default::default();
        while bed_handle.read_record(&mut record)? > 0 {
            let chrom = record.reference_sequence_name().to_string();
            let start = record.feature_start()
                .with_context(|| format!("Error while parsing start for record: {record:?}"))?;
            let end = record.feature_end()
                .unwrap_or(Err(std::io::Error::other("Missing end")))
                .with_context(|| format!("Error while parsing end for record: {record:?}"))?;

            // the parsed positions are 1-based inclusive, convert to 0-based inclusive
            let first = start.get() as i32 - 1;
            let last = end.get() as i32 - 1;
            let entry = chrom_intervals.entry(chrom).or_default();
            entry.push(Interval::new(first, last, ()));
        }

        let lookup_trees = chrom_intervals.into_iter()
            .map(|(chrom, intervals)| (chrom, COITree::new(&intervals)))
            .collect();
        Ok(Self {
            lookup_trees
        })
    }

    /// Builds a mask directly from per-chromosome position lists, 0-based.
    /// # Arguments
    /// * `positions` - pairs of chromosome and the masked positions on it
    pub fn from_positions(positions: &[(&str, &[u64])]) -> Self {
        let lookup_trees = positions.iter()
            .map(|(chrom, chrom_positions)| {
                let intervals: Vec<Interval<()>> = chrom_positions.iter()
                    .map(|&position| Interval::new(position as i32, position as i32, ()))
                    .collect();
                (chrom.to_string(), COITree::new(&intervals))
            })
            .collect();
        Self {
            lookup_trees
        }
    }

    /// Returns true if the given position is masked. Lookups are 0-based.
    /// # Arguments
    /// * `chrom` - the chromosome of the site
    /// * `position` - the coordinate of the site, 0-based
    pub fn contains(&self, chrom: &str, position: u64) -> bool {
        match self.lookup_trees.get(chrom) {
            Some(tree) => {
                tree.query_count(position as i32, position as i32) > 0
            },
            None => false
        }
    }
}
