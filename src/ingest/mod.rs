pub mod errors;
pub mod parser;
pub mod slices;
pub mod writer;

#[cfg(test)]
mod ingest_tests;

pub use errors::*;
pub use parser::*;
pub use slices::*;
pub use writer::*;
