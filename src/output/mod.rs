//! Output module for writing harvested tables and run summaries
//!
//! This module handles:
//! - Writing per-subject and merged CSV tables
//! - Generating a markdown summary of each run
//! - Printing batch statistics to the console

mod csv_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::{CsvOutput, MERGED_PREFIX};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, BatchStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
