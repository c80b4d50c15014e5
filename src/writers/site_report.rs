
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data_types::classified_site::ClassifiedSite;

/// This is a wrapper for writing the per-site classification table
pub struct SiteReportWriter {
    /// Handle on the writer
    csv_writer: csv::Writer<Box<dyn Write>>,
}

/// Contains all the data written to each row of the site table
#[derive(Serialize)]
struct SiteRow {
    /// Unique site identifier
    id: u64,
    /// Chromosome of the site
    chrom: String,
    /// Coordinate of the site, 0-based
    position: u64,
    /// Pipeline A's classification
    a_classification: String,
    /// Pipeline B's classification
    b_classification: String,
    /// The joint outcome for the pair
    outcome: String
}

impl SiteReportWriter {
    /// Creates a new writer; output is gzip-compressed when the filename ends with .gz
    /// # Arguments
    /// * `filename` - path to the filename that will get opened, tab-delimited output
    pub fn new(filename: &Path) -> anyhow::Result<Self> {
        let handle: Box<dyn Write> = if filename.extension().unwrap_or_default() == "gz" {
            Box::new(
                flate2::write::GzEncoder::new(
                    File::create(filename)?,
                    flate2::Compression::best()
                )
            )
        } else {
            Box::new(File::create(filename)?)
        };

        let csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(handle);
        Ok(Self {
            csv_writer
        })
    }

    /// Adds one classified site to the report
    /// # Arguments
    /// * `chrom` - chromosome of the site
    /// * `position` - coordinate of the site, 0-based
    /// * `site` - the classified result for the site
    pub fn write_site(&mut self, chrom: &str, position: u64, site: &ClassifiedSite) -> csv::Result<()> {
        let row = SiteRow {
            id: site.id(),
            chrom: chrom.to_string(),
            position,
            a_classification: site.classification_a().as_ref().to_string(),
            b_classification: site.classification_b().as_ref().to_string(),
            outcome: site.outcome().as_ref().to_string()
        };
        self.csv_writer.serialize(&row)
    }

    /// Flushes everything to the file
    pub fn finish(&mut self) -> csv::Result<()> {
        self.csv_writer.flush()?;
        Ok(())
    }
}
