//! Output of the consolidated rankings document.

pub mod writer;

pub use writer::write_rankings;
