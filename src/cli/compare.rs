
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename};
use crate::parsing::site_pairs::get_vcf_sample_name;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about)]
pub struct CompareSettings {
    /// Pipeline A variant call file (VCF), the reference side of the comparison
    #[clap(required = true)]
    #[clap(short = 'a')]
    #[clap(long = "vcf-a")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub a_vcf_filename: PathBuf,

    /// Pipeline B variant call file (VCF), the comparison side
    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "vcf-b")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub b_vcf_filename: PathBuf,

    /// Positions to exclude from the comparison (BED)
    #[clap(short = 'm')]
    #[clap(long = "mask")]
    #[clap(value_name = "BED")]
    #[clap(help_heading = Some("Input/Output"))]
    pub mask: Option<PathBuf>,

    /// Output directory containing the summary and per-site tables
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Optional comparison label for the summary output
    #[clap(long = "label")]
    #[clap(value_name = "LABEL")]
    #[clap(help_heading = Some("Input/Output"))]
    #[clap(default_value = "concordance")]
    pub compare_label: String,

    /// The sample name to use in pipeline A's VCF [default: first sample]
    #[clap(long = "a-sample")]
    #[clap(value_name = "SAMPLE")]
    #[clap(help_heading = Some("Input/Output"))]
    #[clap(default_value = "", hide_default_value = true)]
    pub a_sample: String,

    /// The sample name to use in pipeline B's VCF [default: first sample]
    #[clap(long = "b-sample")]
    #[clap(value_name = "SAMPLE")]
    #[clap(help_heading = Some("Input/Output"))]
    #[clap(default_value = "", hide_default_value = true)]
    pub b_sample: String,

    /// Treat records with a non-passing FILTER as filter failures
    #[clap(long = "apply-filter")]
    #[clap(help_heading = Some("Compare parameters"))]
    pub apply_filter: bool,

    /// Number of threads to use in the comparison step
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_compare_settings(mut settings: CompareSettings) -> anyhow::Result<CompareSettings> {
    info!("Varcord version: {:?}", env!("CARGO_PKG_VERSION"));
    info!("Sub-command: compare");
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.a_vcf_filename, "Pipeline A VCF")?;
    check_required_filename(&settings.b_vcf_filename, "Pipeline B VCF")?;
    check_optional_filename(settings.mask.as_deref(), "Mask")?;

    // dump stuff to the logger
    info!("\tPipeline A VCF: {:?}", &settings.a_vcf_filename);
    if settings.a_sample.is_empty() {
        settings.a_sample = get_vcf_sample_name(&settings.a_vcf_filename, 0)?;
    }
    info!("\tPipeline A sample: {:?}", &settings.a_sample);
    info!("\tPipeline B VCF: {:?}", &settings.b_vcf_filename);
    if settings.b_sample.is_empty() {
        settings.b_sample = get_vcf_sample_name(&settings.b_vcf_filename, 0)?;
    }
    info!("\tPipeline B sample: {:?}", &settings.b_sample);
    if let Some(mask_fn) = settings.mask.as_deref() {
        info!("\tMask: {mask_fn:?}");
    } else {
        info!("\tMask: None");
    }

    // outputs
    info!("Outputs:");
    info!("\tCompare label: {:?}", &settings.compare_label);
    info!("\tOutput folder: {:?}", &settings.output_folder);

    // other misc parameters
    info!("Compare parameters:");
    info!("\tFilter enforcement: {}", if settings.apply_filter { "ENABLED" } else { "DISABLED" });

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}
