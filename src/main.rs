
use anyhow::Context;
use indicatif::ParallelProgressIterator;
use log::{LevelFilter, error, info, trace};
use rayon::prelude::*;
use std::time::Instant;

use varcord::calculator;
use varcord::classifier::ClassifierBuilder;
use varcord::cli::compare::{CompareSettings, check_compare_settings};
use varcord::cli::core::{Commands, get_cli};
use varcord::data_types::classification::{Classification, Outcome};
use varcord::data_types::classified_site::ClassifiedSite;
use varcord::parsing::mask::PositionMask;
use varcord::parsing::site_pairs::{ChromSitePairs, load_paired_sites};
use varcord::util::progress_bar::get_progress_style;
use varcord::writers::site_report::SiteReportWriter;
use varcord::writers::summary::SummaryWriter;

/// One chromosome's classified sites: (chromosome, [(position, class A, class B, outcome)])
type ClassifiedShard = (String, Vec<(u64, Classification, Classification, Outcome)>);

fn run_compare(settings: CompareSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_compare_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // load the mask if one was provided
    let mask = match settings.mask.as_deref() {
        Some(mask_fn) => {
            info!("Pre-loading mask into memory...");
            match PositionMask::from_bed(mask_fn) {
                Ok(m) => m,
                Err(e) => {
                    error!("Error while loading mask: {e:#}");
                    std::process::exit(exitcode::IOERR);
                }
            }
        },
        None => PositionMask::default()
    };

    // load both VCFs and align their records by position
    info!("Loading variant records...");
    let all_pairs: Vec<ChromSitePairs> = match load_paired_sites(
        &settings.a_vcf_filename, &settings.a_sample,
        &settings.b_vcf_filename, &settings.b_sample
    ) {
        Ok(p) => p,
        Err(e) => {
            error!("Error while loading variant records: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // build the classifier, which is shared read-only across the workers
    let classifier = match ClassifierBuilder::default()
        .mask(mask)
        .apply_filter(settings.apply_filter)
        .build() {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building classifier: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // classify each chromosome shard in parallel; a position mismatch halts the pass
    let style = get_progress_style();
    info!("Classifying site pairs...");
    let shard_results: anyhow::Result<Vec<ClassifiedShard>> = all_pairs.into_par_iter()
        .map(|chrom_pairs| {
            let ChromSitePairs { chrom, pairs } = chrom_pairs;
            let mut classified = Vec::with_capacity(pairs.len());
            for (record_a, record_b) in pairs.iter() {
                let position = record_a.as_ref().or(record_b.as_ref())
                    .map(|record| record.position())
                    .unwrap_or_default();
                let result = classifier.classify(record_a.as_ref(), record_b.as_ref())
                    .with_context(|| format!("Error while classifying pair at {chrom}:{position}:"))?;
                trace!("{chrom}:{position} => {result:?}");

                let (classification_a, classification_b, outcome) = result;
                classified.push((position, classification_a, classification_b, outcome));
            }
            Ok((chrom, classified))
        })
        .progress_with_style(style)
        .collect();

    let all_shards = match shard_results {
        Ok(s) => s,
        Err(e) => {
            error!("Error during classification: {e:#}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    // flatten the shards in chromosome order, assigning site identifiers and writing the report
    let report_fn = settings.output_folder.join("classifications.tsv.gz");
    info!("Saving per-site classifications to {report_fn:?}...");
    let mut site_writer = match SiteReportWriter::new(&report_fn) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while creating site report writer: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let mut table: Vec<ClassifiedSite> = vec![];
    for (chrom, classified) in all_shards.into_iter() {
        for (position, classification_a, classification_b, outcome) in classified.into_iter() {
            let site = ClassifiedSite::new(table.len() as u64, classification_a, classification_b, outcome);
            if let Err(e) = site_writer.write_site(&chrom, position, &site) {
                error!("Error while writing site report: {e}");
                std::process::exit(exitcode::IOERR);
            }
            table.push(site);
        }
    }
    if let Err(e) = site_writer.finish() {
        error!("Error while finishing site report: {e}");
        std::process::exit(exitcode::IOERR);
    }
    info!("Classified {} total site pairs.", table.len());

    // aggregate into the headline statistics
    let summary = calculator::summarize(&table);
    info!("Call rate (local): {:.6} ({} / {})",
        summary.call_rate.rate(), summary.call_rate.matching, summary.call_rate.total);
    info!("Call rate (genome-wide): {:.6} ({} / {})",
        summary.genome_wide_call_rate.rate(), summary.genome_wide_call_rate.matching, summary.genome_wide_call_rate.total);
    info!("Concordance (local): {:.6} ({} / {})",
        summary.concordance.rate(), summary.concordance.matching, summary.concordance.total);
    info!("Concordance (genome-wide): {:.6} ({} / {})",
        summary.genome_wide_concordance.rate(), summary.genome_wide_concordance.matching, summary.genome_wide_concordance.total);

    // now write things
    let summary_writer = SummaryWriter::new(settings.compare_label.clone(), summary);
    let summary_fn = settings.output_folder.join("summary.tsv");
    info!("Saving output summary to {summary_fn:?}...");
    if let Err(e) = summary_writer.write_summary(&summary_fn) {
        error!("Error while saving summary file: {e}");
        std::process::exit(exitcode::IOERR);
    }

    let json_fn = settings.output_folder.join("summary.json");
    info!("Saving JSON summary to {json_fn:?}...");
    if let Err(e) = summary_writer.write_json(&settings, &json_fn) {
        error!("Error while saving JSON summary: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Comparison completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Compare(settings) => {
            run_compare(*settings);
        }
    }

    info!("Process finished successfully.");
}
