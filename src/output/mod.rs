//! Output formatting for calculator results.
//!
//! This module handles formatting and outputting results:
//! - [`csv`] - CSV output of VLSM allocations
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{allocation_csv, escape_csv_field, print_allocation_csv, CSV_HEADER};
pub use terminal::{format_field, render_allocation, render_descriptor, render_path_analysis};
