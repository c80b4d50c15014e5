
/// Aggregates classified sites into the call rate and concordance statistics
pub mod calculator;
/// Contains the core decision procedure that turns aligned record pairs into outcomes
pub mod classifier;
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
