pub mod errors;
pub mod features;
pub mod grouped;
pub mod popular;
pub mod popularity;
pub mod recommender;
pub mod sampling;
pub mod settings;

#[cfg(test)]
mod popularity_tests;

pub use errors::*;
pub use features::*;
pub use popularity::*;
pub use recommender::*;
pub use settings::*;
