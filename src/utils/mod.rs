//! Utility functions

pub mod streams;

pub use streams::{open_input, open_output, write_file};
