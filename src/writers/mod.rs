/*!
# Writers module
Contains the logic for writing the output files for the compare command.
*/
/// Generates the large per-site classification file; each line corresponds to a compared site
pub mod site_report;
/// Generates the summary files
pub mod summary;
