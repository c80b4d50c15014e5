/// Helper functions for generating the progress bars
pub mod progress_bar;
