/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Parser for the masked-position BED file that enables lookups afterwards
pub mod mask;
/// Handles loading the two VCFs and aligning their records into site pairs
pub mod site_pairs;
