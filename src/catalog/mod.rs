pub mod source;
pub mod tables;


pub use source::*;
pub use tables::*;
