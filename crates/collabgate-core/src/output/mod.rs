//! Output formatting module

pub mod gha;

pub use gha::{error_annotation, safe_output_escape, write_outputs, RunSummary};
